//! Error types for the search library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
///
/// Only [`SearchError::InvalidQuery`] and [`SearchError::NoEngines`] are ever
/// returned from [`crate::Manager::search`]; the engine-level variants are
/// recorded per engine in [`crate::EngineOutcome`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Transport-level failure (connection refused, DNS, TLS, proxy).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The source answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Engine did not answer before its deadline.
    #[error("Search timeout exceeded")]
    Timeout,

    /// The request was cancelled before the engine answered.
    #[error("Search cancelled")]
    Cancelled,

    /// The participating engine set was empty.
    #[error("No search engines available")]
    NoEngines,

    /// Invalid query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// An engine name that is not in the registry.
    #[error("Unknown engine '{0}'")]
    UnknownEngine(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return SearchError::Timeout;
        }
        match err.status() {
            Some(status) => SearchError::Status(status.as_u16()),
            None => SearchError::Http(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let err = SearchError::Parse("empty response body".to_string());
        assert_eq!(err.to_string(), "Failed to parse response: empty response body");
    }

    #[test]
    fn test_error_display_status() {
        let err = SearchError::Status(503);
        assert_eq!(err.to_string(), "HTTP status 503");
    }

    #[test]
    fn test_error_display_timeout() {
        assert_eq!(SearchError::Timeout.to_string(), "Search timeout exceeded");
    }

    #[test]
    fn test_error_display_cancelled() {
        assert_eq!(SearchError::Cancelled.to_string(), "Search cancelled");
    }

    #[test]
    fn test_error_display_no_engines() {
        assert_eq!(SearchError::NoEngines.to_string(), "No search engines available");
    }

    #[test]
    fn test_error_display_invalid_query() {
        let err = SearchError::InvalidQuery("empty query".to_string());
        assert_eq!(err.to_string(), "Invalid query: empty query");
    }

    #[test]
    fn test_error_display_unknown_engine() {
        let err = SearchError::UnknownEngine("nope".to_string());
        assert_eq!(err.to_string(), "Unknown engine 'nope'");
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: SearchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, SearchError::UrlParse(_)));
    }

    #[test]
    fn test_error_is_clone() {
        let err = SearchError::Http("connection reset".to_string());
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
