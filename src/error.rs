use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViSearchError {
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("TransportError: {0}")]
    Transport(#[from] TransportError),
    #[error("ServiceError: {0}")]
    Service(#[from] ServiceError),
    #[error("MappingError: {0}")]
    Mapping(#[from] MappingError),
    #[error("ParamError: {0}")]
    Param(#[from] ParamError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration field '{field}' is missing")]
    MissingField { field: String },
    #[error("Invalid configuration value for '{field}': {value}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// The single error every transport-level failure surfaces as.
///
/// Carries the request method and URL alongside the underlying cause so a
/// failing call can be diagnosed without re-running it.
#[derive(Error, Debug)]
#[error("Failed to execute request {method} {url}: {cause}")]
pub struct TransportError {
    pub method: String,
    pub url: String,
    #[source]
    pub cause: TransportCause,
}

#[derive(Error, Debug)]
pub enum TransportCause {
    #[error("malformed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("unable to read image: {0}")]
    Image(#[from] std::io::Error),
    #[error("no pooled connection became available within {waited:?}")]
    PoolExhausted { waited: Duration },
}

impl TransportError {
    pub fn new(method: impl Into<String>, url: impl Into<String>, cause: TransportCause) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            cause,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match &self.cause {
            TransportCause::Http(e) => e.is_timeout(),
            TransportCause::PoolExhausted { .. } => true,
            _ => false,
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(&self.cause, TransportCause::Http(e) if e.is_connect())
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{method} returned status '{status}': {}", .messages.join("; "))]
    Failed {
        method: String,
        status: String,
        messages: Vec<String>,
    },
    #[error("{method} returned no result")]
    EmptyResult { method: String },
}

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Response from {endpoint} is not valid JSON: {source}")]
    Malformed {
        endpoint: String,
        source: serde_json::Error,
    },
    #[error("Response from {endpoint} does not match {type_name}: {source}")]
    Schema {
        endpoint: String,
        type_name: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Invalid parameter '{field}': {reason}")]
    Invalid { field: String, reason: String },
    #[error("Parameter '{field}' is required")]
    Missing { field: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Output failed: {0}")]
    Output(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl ViSearchError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ViSearchError::Config(_) => ErrorSeverity::Critical,
            ViSearchError::Transport(e) if e.is_timeout() => ErrorSeverity::Medium,
            ViSearchError::Transport(_) => ErrorSeverity::High,
            ViSearchError::Service(_) => ErrorSeverity::High,
            ViSearchError::Mapping(_) => ErrorSeverity::Medium,
            ViSearchError::Param(_) => ErrorSeverity::Medium,
            ViSearchError::Storage(_) => ErrorSeverity::Medium,
            ViSearchError::Cli(_) => ErrorSeverity::Low,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            ViSearchError::Config(ConfigError::MissingField { field }) => Some(format!(
                "'visearch config set {} <value>' or pass it on the command line",
                field
            )),
            ViSearchError::Transport(e) if e.is_timeout() => Some(
                "The service did not answer in time; check the endpoint and try again".to_string(),
            ),
            ViSearchError::Transport(e) if e.is_connect() => {
                Some("Check your network connection and the configured endpoint".to_string())
            }
            ViSearchError::Service(ServiceError::Failed { messages, .. })
                if messages.iter().any(|m| m.to_lowercase().contains("unauthorized")) =>
            {
                Some("Verify VISEARCH_ACCESS_KEY and VISEARCH_SECRET_KEY".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display_includes_method_and_url() {
        let err = TransportError::new(
            "GET",
            "http://example.test/search",
            TransportCause::PoolExhausted {
                waited: Duration::from_secs(5),
            },
        );
        let text = format!("{}", err);
        assert!(text.contains("GET"));
        assert!(text.contains("http://example.test/search"));
        assert!(err.is_timeout());
        assert!(!err.is_connect());
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.jpg");
        let err = TransportError::new("POST", "http://example.test/uploadsearch", io.into());
        let source = std::error::Error::source(&err).expect("source should be set");
        assert!(source.to_string().contains("missing.jpg"));
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::Failed {
            method: "search".to_string(),
            status: "fail".to_string(),
            messages: vec!["im_name not found".to_string(), "second".to_string()],
        };
        assert_eq!(
            format!("{}", err),
            "search returned status 'fail': im_name not found; second"
        );
    }

    #[test]
    fn test_visearch_error_display_config() {
        let err = ViSearchError::Config(ConfigError::MissingField {
            field: "endpoint".to_string(),
        });
        assert_eq!(
            format!("{}", err),
            "ConfigError: Configuration field 'endpoint' is missing"
        );
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.troubleshooting_hint().is_some());
    }

    #[test]
    fn test_param_error_display() {
        let err = ParamError::Invalid {
            field: "color".to_string(),
            reason: "expected six hex digits".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Invalid parameter 'color': expected six hex digits"
        );
        let app_err: ViSearchError = err.into();
        assert_eq!(app_err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_unauthorized_service_error_has_hint() {
        let err = ViSearchError::Service(ServiceError::Failed {
            method: "search".to_string(),
            status: "fail".to_string(),
            messages: vec!["Unauthorized".to_string()],
        });
        assert!(
            err.troubleshooting_hint()
                .is_some_and(|h| h.contains("VISEARCH_ACCESS_KEY"))
        );
    }
}
