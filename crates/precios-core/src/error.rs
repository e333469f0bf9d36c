//! Common error type for crawl pipelines

/// How much of a bad response body to keep for diagnosis.
const BODY_PREVIEW_LEN: usize = 2048;

/// Error from fetching and decoding a single API page.
///
/// `Schema` carries the (truncated) raw response body so a page that lacks
/// the expected records field can be diagnosed after the fact.
#[derive(Debug)]
pub enum FetchError {
    /// Invalid configuration (e.g. shard index out of range). Fatal at startup.
    Config(String),
    /// HTTP/transport failure with optional status code.
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Expected field missing or malformed in a response body.
    Schema { field: &'static str, body: String },
    /// Local I/O failure.
    Io(std::io::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration: {msg}"),
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Schema { field, .. } => write!(f, "response missing '{field}'"),
            Self::Io(e) => write!(f, "IO: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl FetchError {
    /// Create HTTP error from reqwest error.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    /// Schema error preserving (a truncated copy of) the raw response body.
    pub fn schema(field: &'static str, body: &str) -> Self {
        let cut = body
            .char_indices()
            .nth(BODY_PREVIEW_LEN)
            .map_or(body.len(), |(i, _)| i);
        Self::Schema {
            field,
            body: body[..cut].to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            // Rate limit and server errors are transient; 4xx client errors
            // and missing status (pure transport) follow the same rule as
            // the upstream: transport yes, hard client errors no.
            Self::Http { status, .. } => {
                matches!(status, Some(429) | Some(500..=599) | None)
            }
            Self::Io(e) => e.kind() != std::io::ErrorKind::StorageFull,
            // A malformed page stays malformed; re-fetching won't help.
            Self::Schema { .. } => false,
            Self::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    fn http_err(status: u16) -> FetchError {
        FetchError::Http {
            status: Some(status),
            message: "test".to_string(),
        }
    }

    #[test]
    fn http_429_retryable() {
        assert!(http_err(429).is_retryable());
    }

    #[test]
    fn http_500_retryable() {
        assert!(http_err(500).is_retryable());
    }

    #[test]
    fn http_404_not_retryable() {
        assert!(!http_err(404).is_retryable());
    }

    #[test]
    fn http_none_status_retryable() {
        // Network error without status code should be retryable
        let err = FetchError::Http {
            status: None,
            message: "connection refused".to_string(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn schema_not_retryable() {
        let err = FetchError::schema("productos", "{}");
        assert!(!err.is_retryable());
    }

    #[test]
    fn schema_preserves_body() {
        let err = FetchError::schema("sucursales", r#"{"error":"gone"}"#);
        match err {
            FetchError::Schema { field, body } => {
                assert_eq!(field, "sucursales");
                assert_eq!(body, r#"{"error":"gone"}"#);
            }
            other => panic!("unexpected variant: {other}"),
        }
    }

    #[test]
    fn schema_truncates_long_body() {
        let long = "x".repeat(10_000);
        match FetchError::schema("total", &long) {
            FetchError::Schema { body, .. } => assert_eq!(body.len(), 2048),
            other => panic!("unexpected variant: {other}"),
        }
    }

    #[test]
    fn io_storage_full_not_retryable() {
        let err = FetchError::Io(std::io::Error::new(ErrorKind::StorageFull, "disk full"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn io_other_retryable() {
        let err = FetchError::Io(std::io::Error::new(ErrorKind::BrokenPipe, "pipe"));
        assert!(err.is_retryable());
    }

    #[test]
    fn config_not_retryable() {
        assert!(!FetchError::Config("bad shard".into()).is_retryable());
    }

    #[test]
    fn display_http_with_status() {
        assert_eq!(format!("{}", http_err(404)), "HTTP 404: test");
    }

    #[test]
    fn display_schema_names_field() {
        let err = FetchError::schema("productos", "{}");
        assert_eq!(format!("{err}"), "response missing 'productos'");
    }
}
