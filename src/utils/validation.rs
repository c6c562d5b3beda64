//! Input validation utilities
//!
//! Checks applied to endpoints at client construction and to facade
//! parameters before a request is built.

use crate::error::{ConfigError, ParamError};
use url::Url;

/// Validate that an endpoint is a usable http(s) base URL
pub fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: "endpoint".to_string(),
        });
    }

    let invalid = |reason: String| ConfigError::InvalidValue {
        field: "endpoint".to_string(),
        value: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("endpoint must start with http:// or https://".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("endpoint must not carry a query or fragment".to_string()));
    }

    Ok(())
}

/// Normalise a hex color such as `#FF00aa` to `ff00aa`.
pub fn normalize_hex_color(color: &str) -> Result<String, ParamError> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParamError::Invalid {
            field: "color".to_string(),
            reason: format!("'{}' is not a six digit hex color", color),
        });
    }
    Ok(hex.to_ascii_lowercase())
}

/// Validate that a required text parameter is present
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ParamError> {
    if value.trim().is_empty() {
        return Err(ParamError::Missing {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint_accepts_valid_urls() {
        assert!(validate_endpoint("http://visearch.visenze.com").is_ok());
        assert!(validate_endpoint("https://example.test/v1").is_ok());
        assert!(validate_endpoint("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn test_validate_endpoint_rejects_invalid_urls() {
        assert!(matches!(
            validate_endpoint(""),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(matches!(
            validate_endpoint("   "),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(validate_endpoint("visearch.visenze.com").is_err());
        assert!(validate_endpoint("ftp://example.com").is_err());
        assert!(validate_endpoint("http://example.test?x=1").is_err());
    }

    #[test]
    fn test_normalize_hex_color() {
        assert_eq!(normalize_hex_color("FF00aa").unwrap(), "ff00aa");
        assert_eq!(normalize_hex_color("#123abc").unwrap(), "123abc");
        assert!(normalize_hex_color("12345").is_err());
        assert!(normalize_hex_color("gg0000").is_err());
        assert!(normalize_hex_color("").is_err());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("im_name", "shoe-1").is_ok());
        assert!(matches!(
            require_non_empty("im_name", " "),
            Err(ParamError::Missing { field }) if field == "im_name"
        ));
    }
}
