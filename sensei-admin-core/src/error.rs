//! Error types for the admin console
//!
//! Errors are grouped by the boundary they come from so each one can be
//! surfaced by the smallest component that owns it:
//!
//! - `Fetch` - the listing could not be loaded; the list shows a failure
//!   state and offers a retry
//! - `Command` - a stop/start command failed; the row and the confirmation or
//!   form that issued it show the failure
//! - `Clipboard` - copying is unavailable; the copy degrades to a no-op

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Failed to fetch nodes: {message}")]
    Fetch {
        message: String,
        /// Response status when the server answered
        status: Option<u16>,
        /// Connection or timeout failure; the request never got an answer
        transient: bool,
    },

    #[error("Command '{operation}' failed for node {pubkey}: {message}")]
    Command {
        operation: String,
        pubkey: String,
        message: String,
    },

    #[error("Clipboard unavailable: {message}")]
    Clipboard { message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
    pub fn fetch(message: impl Into<String>) -> Self {
        AdminError::Fetch {
            message: message.into(),
            status: None,
            transient: false,
        }
    }

    /// The request never got an answer (connect failure or timeout).
    pub fn fetch_unreachable(message: impl Into<String>) -> Self {
        AdminError::Fetch {
            message: message.into(),
            status: None,
            transient: true,
        }
    }

    /// The server answered with a non-success status.
    pub fn fetch_status(status: u16, message: impl Into<String>) -> Self {
        AdminError::Fetch {
            message: message.into(),
            status: Some(status),
            transient: false,
        }
    }

    pub fn command(
        operation: impl Into<String>,
        pubkey: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AdminError::Command {
            operation: operation.into(),
            pubkey: pubkey.into(),
            message: message.into(),
        }
    }

    pub fn clipboard(message: impl Into<String>) -> Self {
        AdminError::Clipboard {
            message: message.into(),
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, AdminError::Fetch { .. })
    }

    pub fn is_command(&self) -> bool {
        matches!(self, AdminError::Command { .. })
    }

    /// Whether retrying the same request could succeed.
    ///
    /// Only unanswered requests, 5xx responses, 408 and 429 qualify. Other
    /// 4xx responses and malformed bodies fail the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            AdminError::Http(e) => e.is_timeout() || e.is_connect(),
            AdminError::Fetch {
                status: Some(status),
                ..
            } => *status >= 500 || *status == 408 || *status == 429,
            AdminError::Fetch { transient, .. } => *transient,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_display() {
        let err = AdminError::command("stop", "02abc", "node not found");
        assert_eq!(
            err.to_string(),
            "Command 'stop' failed for node 02abc: node not found"
        );
        assert!(err.is_command());
        assert!(!err.is_fetch());
    }

    #[test]
    fn test_fetch_error_transience() {
        assert!(AdminError::fetch_status(503, "HTTP 503").is_transient());
        assert!(AdminError::fetch_status(429, "HTTP 429").is_transient());
        assert!(AdminError::fetch_unreachable("connection refused").is_transient());

        let bad_request = AdminError::fetch_status(400, "HTTP 400");
        assert!(bad_request.is_fetch());
        assert!(!bad_request.is_transient());
        assert!(!AdminError::fetch("Parse error").is_transient());
        assert!(!AdminError::clipboard("no tty").is_transient());
    }
}
