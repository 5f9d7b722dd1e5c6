use crate::utils::error::{AuditError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> AuditError {
    AuditError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// SerpApi and form endpoints must be absolute http(s) URLs.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "an endpoint URL is required"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("not a valid URL: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("endpoints must use http or https, got '{}'", scheme),
        )),
    }
}

/// Report file paths: non-empty and free of NUL bytes.
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "a report path is required"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path.escape_default(), "report path contains a NUL byte"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(field_name, value, format!("must be at least {}", min_value)));
    }
    Ok(())
}

/// Secrets are never echoed back in the error.
pub fn validate_secret(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AuditError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "cannot be blank"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field_name, value, format!("must be between {} and {}", min, max)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serpapi_endpoint_requires_http_scheme() {
        assert!(validate_url("serpapi.endpoint", "https://serpapi.com/search.json").is_ok());
        assert!(validate_url("serpapi.endpoint", "http://127.0.0.1:8080/search.json").is_ok());
        assert!(validate_url("serpapi.endpoint", "").is_err());
        assert!(validate_url("serpapi.endpoint", "serpapi.com/search.json").is_err());
        assert!(validate_url("report.form.url", "ftp://forms.example/formResponse").is_err());
    }

    #[test]
    fn test_report_path_rejects_nul_bytes() {
        assert!(validate_path("report.csv_path", "./output/audits.csv").is_ok());
        assert!(validate_path("report.csv_path", "").is_err());

        let err = validate_path("report.csv_path", "audits\0.csv").unwrap_err();
        assert!(!err.to_string().contains('\0'));
    }

    #[test]
    fn test_concurrent_audits_must_be_positive() {
        assert!(validate_positive_number("audit.concurrent_requests", 2, 1).is_ok());
        assert!(validate_positive_number("audit.concurrent_requests", 0, 1).is_err());
    }

    #[test]
    fn test_api_key_error_does_not_echo_value() {
        assert!(validate_secret("serpapi.api_key", "abc123").is_ok());

        let err = validate_secret("serpapi.api_key", "   ").unwrap_err();
        assert!(matches!(err, AuditError::MissingConfigError { .. }));
    }

    #[test]
    fn test_blank_locale_is_rejected() {
        assert!(validate_non_empty_string("serpapi.locale", "en").is_ok());
        assert!(validate_non_empty_string("serpapi.locale", " \t").is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        assert!(validate_range("serpapi.timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("serpapi.timeout_seconds", 0, 1, 300).is_err());
        assert!(validate_range("serpapi.timeout_seconds", 301, 1, 300).is_err());
    }
}
