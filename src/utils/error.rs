use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("API request failed: {0}")]
    ApiError(reqwest::Error),

    #[error("API returned status {status}: {message}")]
    ApiStatusError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Report submission to {sink} failed: {message}")]
    SubmissionError { sink: String, message: String },
}

// 請求 URL 帶有 api_key，不能留在錯誤訊息裡
impl From<reqwest::Error> for AuditError {
    fn from(err: reqwest::Error) -> Self {
        AuditError::ApiError(err.without_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::ApiError(_)
            | AuditError::ApiStatusError { .. }
            | AuditError::SubmissionError { .. } => ErrorCategory::Network,
            AuditError::ConfigError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AuditError::SerializationError(_) | AuditError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            AuditError::CsvError(_) | AuditError::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            AuditError::ApiError(_) | AuditError::SubmissionError { .. } => ErrorSeverity::Medium,
            AuditError::ApiStatusError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            AuditError::ApiStatusError { .. } => ErrorSeverity::High,
            AuditError::SerializationError(_)
            | AuditError::ProcessingError { .. }
            | AuditError::CsvError(_) => ErrorSeverity::High,
            AuditError::ConfigError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AuditError::ApiError(_) => {
                "Check your network connection and retry the audit".to_string()
            }
            AuditError::ApiStatusError { status: 401, .. }
            | AuditError::ApiStatusError { status: 403, .. } => {
                "Verify the SerpApi key (serpapi.api_key or SERP_API_KEY)".to_string()
            }
            AuditError::ApiStatusError { status: 429, .. } => {
                "The search quota is exhausted; wait or upgrade the plan".to_string()
            }
            AuditError::ApiStatusError { .. } => {
                "Retry later; the search service rejected the request".to_string()
            }
            AuditError::SubmissionError { .. } => {
                "Check report.form.url and the field mapping in the config".to_string()
            }
            AuditError::CsvError(_) | AuditError::IoError(_) => {
                "Check that the report path exists and is writable".to_string()
            }
            AuditError::SerializationError(_) => {
                "The service returned an unexpected payload; retry or report it".to_string()
            }
            AuditError::ProcessingError { .. } => "Retry the audit for this query".to_string(),
            AuditError::ConfigError { .. } => "Fix the configuration file".to_string(),
            AuditError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            AuditError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the remote service: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Unexpected response data: {}", self),
            ErrorCategory::Storage => format!("Could not write the report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
