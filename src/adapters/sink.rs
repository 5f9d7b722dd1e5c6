use crate::config::FormConfig;
use crate::core::report::{AuditReport, REPORT_FIELDS};
use crate::domain::ports::ReportSink;
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Appends one row per report to a local CSV file.
///
/// Submits are serialized so concurrent audits write one header at most.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl ReportSink for CsvReportSink {
    fn name(&self) -> &str {
        "csv"
    }

    async fn submit(&self, report: &AuditReport) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        // 空檔案才寫標題列
        let write_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if write_header {
            writer.write_record(REPORT_FIELDS)?;
        }
        writer.write_record(report.fields().iter().map(|(_, value)| value.as_str()))?;
        writer.flush()?;

        tracing::debug!("Appended report row to {}", self.path.display());
        Ok(())
    }
}

/// Posts mapped report fields to a web form that feeds a spreadsheet.
#[derive(Debug, Clone)]
pub struct FormSubmissionSink {
    client: Client,
    config: FormConfig,
}

impl FormSubmissionSink {
    pub fn new(config: FormConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    /// `(entry_name, value)` pairs for every mapped report field.
    pub fn form_pairs(&self, report: &AuditReport) -> Vec<(String, String)> {
        report
            .fields()
            .into_iter()
            .filter_map(|(key, value)| {
                self.config
                    .fields
                    .get(key)
                    .map(|entry| (entry.clone(), value))
            })
            .collect()
    }
}

#[async_trait]
impl ReportSink for FormSubmissionSink {
    fn name(&self) -> &str {
        "form"
    }

    async fn submit(&self, report: &AuditReport) -> Result<()> {
        let pairs = self.form_pairs(report);
        if pairs.is_empty() {
            tracing::warn!("⚠️ No form fields mapped, nothing submitted for '{}'", report.query);
            return Ok(());
        }

        let response = self.client.post(&self.config.url).form(&pairs).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::SubmissionError {
                sink: self.name().to_string(),
                message: format!("form endpoint returned {}", status),
            });
        }

        Ok(())
    }
}
