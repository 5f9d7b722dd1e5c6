use crate::core::fetcher::FetchOptions;
use crate::domain::model::SortOrder;
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search.json";
pub const API_KEY_ENV: &str = "SERP_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub serpapi: SerpApiConfig,
    pub audit: AuditSettings,
    pub report: ReportConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerpApiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub locale: String,
    pub sort_order: SortOrder,
    pub timeout_seconds: u64,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            locale: "en".to_string(),
            sort_order: SortOrder::default(),
            timeout_seconds: 30,
        }
    }
}

// api_key 不可出現在日誌中
impl std::fmt::Debug for SerpApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("locale", &self.locale)
            .field("sort_order", &self.sort_order)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl SerpApiConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            locale: self.locale.clone(),
            sort_order: self.sort_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    pub max_reviews: usize,
    pub concurrent_requests: usize,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            max_reviews: 18,
            concurrent_requests: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub csv_path: Option<String>,
    pub form: Option<FormConfig>,
}

/// Form endpoint plus the mapping from report field key to form entry name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub url: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl AuditConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AuditError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有指定路徑就讀檔，否則使用預設值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${SERP_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AuditError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Falls back to `SERP_API_KEY` when no key is configured.
    pub fn apply_env(&mut self) {
        if self.serpapi.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                self.serpapi.api_key = key;
            }
        }
    }

    pub fn max_reviews(&self) -> usize {
        self.audit.max_reviews
    }

    pub fn concurrent_requests(&self) -> usize {
        self.audit.concurrent_requests
    }

    /// Checks everything except the credential; enough for a dry run.
    pub fn validate_offline(&self) -> Result<()> {
        validation::validate_url("serpapi.endpoint", &self.serpapi.endpoint)?;
        validation::validate_non_empty_string("serpapi.locale", &self.serpapi.locale)?;
        validation::validate_range("serpapi.timeout_seconds", self.serpapi.timeout_seconds, 1, 300)?;
        validation::validate_positive_number(
            "audit.concurrent_requests",
            self.audit.concurrent_requests,
            1,
        )?;

        if let Some(path) = &self.report.csv_path {
            validation::validate_path("report.csv_path", path)?;
        }

        if let Some(form) = &self.report.form {
            validation::validate_url("report.form.url", &form.url)?;
            for key in form.fields.keys() {
                if !crate::core::report::REPORT_FIELDS.contains(&key.as_str()) {
                    return Err(AuditError::InvalidConfigValueError {
                        field: "report.form.fields".to_string(),
                        value: key.clone(),
                        reason: format!(
                            "Unknown report field. Valid fields: {}",
                            crate::core::report::REPORT_FIELDS.join(", ")
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for AuditConfig {
    fn validate(&self) -> Result<()> {
        self.validate_offline()?;
        validation::validate_secret("serpapi.api_key", &self.serpapi.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
[serpapi]
api_key = "secret-key"
locale = "en"
sort_order = "newestFirst"
timeout_seconds = 10

[audit]
max_reviews = 30
concurrent_requests = 4

[report]
csv_path = "./output/audits.csv"

[report.form]
url = "https://docs.google.com/forms/d/e/abc/formResponse"

[report.form.fields]
shop_name = "entry.1001"
pizza_percent = "entry.1002"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = AuditConfig::from_toml_str(FULL_CONFIG).unwrap();

        assert_eq!(config.serpapi.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.serpapi.sort_order, SortOrder::NewestFirst);
        assert_eq!(config.max_reviews(), 30);
        assert_eq!(config.concurrent_requests(), 4);
        let form = config.report.form.as_ref().unwrap();
        assert_eq!(form.fields.get("shop_name").map(String::as_str), Some("entry.1001"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AuditConfig::from_toml_str("").unwrap();

        assert_eq!(config.max_reviews(), 18);
        assert_eq!(config.concurrent_requests(), 1);
        assert_eq!(config.serpapi.locale, "en");
        assert_eq!(config.serpapi.sort_order, SortOrder::QualityScore);
        assert!(config.report.form.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REVIEW_AUDIT_TEST_KEY", "from-env");

        let config = AuditConfig::from_toml_str(
            r#"
[serpapi]
api_key = "${REVIEW_AUDIT_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.serpapi.api_key, "from-env");

        std::env::remove_var("REVIEW_AUDIT_TEST_KEY");
    }

    #[test]
    fn test_missing_api_key_fails_validation() {
        let mut config = AuditConfig::default();
        config.serpapi.api_key = "   ".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, AuditError::MissingConfigError { ref field } if field == "serpapi.api_key"));
    }

    #[test]
    fn test_offline_validation_ignores_missing_api_key() {
        let config = AuditConfig::default();

        assert!(config.validate_offline().is_ok());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_offline_validation_still_checks_endpoint() {
        let mut config = AuditConfig::default();
        config.serpapi.endpoint = "ftp://serpapi.example".to_string();

        assert!(config.validate_offline().is_err());
    }

    #[test]
    fn test_unknown_form_field_fails_validation() {
        let mut config = AuditConfig::from_toml_str(FULL_CONFIG).unwrap();
        if let Some(form) = config.report.form.as_mut() {
            form.fields.insert("favourite_colour".to_string(), "entry.9".to_string());
        }

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AuditConfig::from_toml_str(FULL_CONFIG).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = AuditConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.serpapi.timeout_seconds, 10);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AuditConfig::from_toml_str("[serpapi\napi_key = 1").unwrap_err();
        assert!(matches!(err, AuditError::ConfigError { .. }));
    }
}
