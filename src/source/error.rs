//! Error types for stats polling.

use thiserror::Error;

/// Errors that can occur during one poll cycle.
///
/// None of these stop the poll loop; they are logged and surfaced in the
/// status bar until the next successful cycle.
#[derive(Debug, Error)]
pub enum PollError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status.
    #[error("Endpoint returned status {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for PollError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PollError::Timeout
        } else if err.is_connect() {
            PollError::Connection(err.to_string())
        } else {
            PollError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PollError {
    fn from(err: serde_json::Error) -> Self {
        PollError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(PollError::Status(503).to_string(), "Endpoint returned status 503");
        assert_eq!(PollError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(PollError::from(err), PollError::Parse(_)));
    }
}
