use crate::utils::error::{WatchError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(WatchError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Config loading leaves `${VAR}` in place when the environment variable is
/// unset; such a value reaching validation means a missing secret.
pub fn validate_env_substituted(field_name: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(WatchError::MissingConfigError {
            field: format!("{} (environment variable {} is not set)", field_name, value),
        });
    }
    Ok(())
}

pub fn validate_id_range(field_name: &str, start: u32, end: u32) -> Result<()> {
    if start > end {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}..{}", start, end),
            reason: "Range start must not exceed range end".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("target.endpoint", "https://example.com").is_ok());
        assert!(validate_url("target.endpoint", "http://example.com").is_ok());
        assert!(validate_url("target.endpoint", "").is_err());
        assert!(validate_url("target.endpoint", "invalid-url").is_err());
        assert!(validate_url("target.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("scan.marker", "FOUND").is_ok());
        assert!(validate_non_empty_string("scan.marker", "").is_err());
        assert!(validate_non_empty_string("scan.marker", "   ").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("scan.cycle_sleep_seconds", 300, 1).is_ok());
        assert!(validate_positive_number("scan.cycle_sleep_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_env_substituted() {
        assert!(validate_env_substituted("telegram.bot_token", "123:abc").is_ok());
        assert!(validate_env_substituted("telegram.bot_token", "${TELEGRAM_BOT_TOKEN}").is_err());
    }

    #[test]
    fn test_validate_id_range() {
        assert!(validate_id_range("scan", 1120, 1500).is_ok());
        assert!(validate_id_range("scan", 7, 7).is_ok());
        assert!(validate_id_range("scan", 1500, 1120).is_err());
    }
}
