//! Error types for insightly-api.

/// Result type alias for insightly-api operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for insightly-api operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is an authentication or authorization error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Unauthorized(_) | ErrorKind::Forbidden(_)
        )
    }

    /// Returns true if this error was raised client-side, before any
    /// network round-trip.
    pub fn is_validation_error(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidOperator(_))
    }

    /// Returns the HTTP status code associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Unauthorized(_) => Some(401),
            ErrorKind::Forbidden(_) => Some(403),
            ErrorKind::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Unsupported filter operator suffix. Raised before any I/O.
    #[error("'{0}' is not a supported filter operator")]
    InvalidOperator(String),

    /// Authentication failed (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Access denied (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any other non-success HTTP status.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Custom-field lookup miss with no default supplied.
    #[error("Custom field '{0}' not found")]
    FieldNotFound(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_decode() {
            ErrorKind::Json(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::RequestFailed {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ErrorKind::Connection(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_auth_error() {
        let err = Error::new(ErrorKind::Unauthorized("bad key".to_string()));
        assert!(err.is_auth_error());
        assert_eq!(err.status(), Some(401));

        let err = Error::new(ErrorKind::Forbidden("no access".to_string()));
        assert!(err.is_auth_error());
        assert_eq!(err.status(), Some(403));

        let err = Error::new(ErrorKind::Timeout);
        assert!(!err.is_auth_error());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_invalid_operator_is_validation_error() {
        let err = Error::new(ErrorKind::InvalidOperator("bogus".to_string()));
        assert!(err.is_validation_error());
        assert!(err.to_string().contains("bogus"));

        let err = Error::new(ErrorKind::RequestFailed {
            status: 500,
            body: "oops".to_string(),
        });
        assert!(!err.is_validation_error());
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_error_kind_display_messages() {
        let cases: Vec<(ErrorKind, &str)> = vec![
            (
                ErrorKind::InvalidOperator("like".into()),
                "'like' is not a supported filter operator",
            ),
            (
                ErrorKind::Unauthorized("invalid api key".into()),
                "Unauthorized: invalid api key",
            ),
            (
                ErrorKind::Forbidden("plan limit".into()),
                "Forbidden: plan limit",
            ),
            (
                ErrorKind::RequestFailed {
                    status: 500,
                    body: "Internal Server Error".into(),
                },
                "Request failed with status 500",
            ),
            (
                ErrorKind::FieldNotFound("ORGANISATION_FIELD_1".into()),
                "Custom field 'ORGANISATION_FIELD_1' not found",
            ),
            (ErrorKind::Timeout, "Request timeout"),
            (
                ErrorKind::Connection("refused".into()),
                "Connection error: refused",
            ),
            (
                ErrorKind::Json("unexpected EOF".into()),
                "JSON error: unexpected EOF",
            ),
            (
                ErrorKind::InvalidUrl("no scheme".into()),
                "Invalid URL: no scheme",
            ),
            (
                ErrorKind::Config("empty api key".into()),
                "Configuration error: empty api key",
            ),
        ];

        for (kind, expected_substring) in cases {
            let display = kind.to_string();
            assert!(
                display.contains(expected_substring),
                "Expected '{display}' to contain '{expected_substring}'"
            );
        }
    }

    #[test]
    fn test_error_with_source() {
        let source_err = std::io::Error::other("disk full");
        let err = Error::with_source(ErrorKind::Connection("write failed".into()), source_err);

        assert!(err.source.is_some());
        assert_eq!(err.to_string(), "Connection error: write failed");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("not valid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err.kind, ErrorKind::Json(_)));
        assert!(err.source.is_some());
    }

    #[test]
    fn test_from_url_parse_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
    }
}
