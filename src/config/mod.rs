pub mod toml_config;

pub use toml_config::{AuditConfig, AuditSettings, FormConfig, ReportConfig, SerpApiConfig};

#[cfg(feature = "cli")]
use crate::domain::model::SortOrder;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "review-audit")]
#[command(about = "Look up a business and audit its map reviews for pizza and alcohol mentions")]
pub struct CliConfig {
    /// Business name and address, e.g. "Joe's Pizza 7 Carmine St 10014" (repeatable)
    #[arg(short, long = "query", required = true)]
    pub queries: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of reviews to sample per business
    #[arg(long)]
    pub max_reviews: Option<usize>,

    /// SerpApi key (falls back to the config file, then SERP_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub locale: Option<String>,

    /// qualityScore, newestFirst, ratingHigh or ratingLow
    #[arg(long)]
    pub sort_order: Option<SortOrder>,

    /// Append each report to this CSV file
    #[arg(long)]
    pub csv: Option<String>,

    /// Number of audits to run at the same time
    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    /// Skip the form submission configured in the config file
    #[arg(long)]
    pub no_submit: bool,

    /// Show what would be audited without calling any service
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut AuditConfig) {
        if let Some(max_reviews) = self.max_reviews {
            config.audit.max_reviews = max_reviews;
        }
        if let Some(api_key) = &self.api_key {
            config.serpapi.api_key = api_key.clone();
        }
        if let Some(locale) = &self.locale {
            config.serpapi.locale = locale.clone();
        }
        if let Some(sort_order) = self.sort_order {
            config.serpapi.sort_order = sort_order;
        }
        if let Some(csv) = &self.csv {
            config.report.csv_path = Some(csv.clone());
        }
        if let Some(concurrent) = self.concurrent_requests {
            config.audit.concurrent_requests = concurrent;
        }
        if self.no_submit {
            config.report.form = None;
        }
    }
}
