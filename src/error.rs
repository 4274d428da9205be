//! Error type shared by every stage of the archiver.
//!
//! Parse anomalies are not errors: malformed rows are skipped by the
//! extractor. Everything in [`Error`] aborts the current run.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: &'static str, reason: String },

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The login form post came back with a non-success status.
    #[error("Login failed, unexpected status code: {status}")]
    Login { status: StatusCode },

    /// An entry point that exists but has no implementation yet.
    #[error("{0} is not supported yet")]
    Unsupported(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_mentions_status() {
        let err = Error::Login {
            status: StatusCode::FORBIDDEN,
        };
        assert_eq!(
            err.to_string(),
            "Login failed, unexpected status code: 403 Forbidden"
        );
    }

    #[test]
    fn test_unsupported_is_distinct() {
        let err = Error::Unsupported("comment scraping");
        assert!(matches!(err, Error::Unsupported(_)));
        assert_eq!(err.to_string(), "comment scraping is not supported yet");
    }
}
