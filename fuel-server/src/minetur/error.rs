//! Ministry API error types.

/// Errors from loading price data.
#[derive(Debug, thiserror::Error)]
pub enum MineturError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service refused the request
    #[error("unauthorized: the price service rejected the request")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The response carried no station list
    #[error("no station data in API response ({result})")]
    MissingData { result: String },

    /// An identifier that would not stay inside its URL path segment
    #[error("invalid identifier {id:?}: expected digits")]
    InvalidId { id: String },

    /// Disk cache operation failed
    #[error("cache error: {message}")]
    Cache { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MineturError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = MineturError::MissingData {
            result: "ERROR".into(),
        };
        assert_eq!(err.to_string(), "no station data in API response (ERROR)");

        let err = MineturError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("expected value"));

        let err = MineturError::InvalidId { id: "..".into() };
        assert_eq!(err.to_string(), "invalid identifier \"..\": expected digits");
    }
}
