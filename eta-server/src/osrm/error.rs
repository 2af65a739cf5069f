//! OSRM client error types.

/// Errors from the OSRM HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum OsrmError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// OSRM answered with a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// OSRM answered 200 but with a `code` other than "Ok"
    #[error("OSRM error {code}: {message}")]
    NoRoute { code: String, message: String },

    /// Response body was not the expected shape
    #[error("malformed response: {message}")]
    Malformed {
        message: String,
        body: Option<String>,
    },
}

impl OsrmError {
    /// Whether this error is a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, OsrmError::Http(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OsrmError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");

        let err = OsrmError::NoRoute {
            code: "NoRoute".into(),
            message: "Impossible route between points".into(),
        };
        assert_eq!(
            err.to_string(),
            "OSRM error NoRoute: Impossible route between points"
        );

        let err = OsrmError::Malformed {
            message: "expected 3 durations, got 2".into(),
            body: None,
        };
        assert!(err.to_string().contains("malformed response"));
        assert!(!err.is_timeout());
    }
}
