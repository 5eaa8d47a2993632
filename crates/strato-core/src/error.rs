//! Strato error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the Strato SDK.
#[derive(Debug, Error)]
pub enum StratoError {
    /// HTTP transport error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The management API answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command needs a project but none could be resolved.
    #[error("no current project detected; pass --project or run inside a directory with a .stratorc")]
    NoProject,

    /// A command needs credentials but none are configured.
    #[error("not authenticated; set STRATO_TOKEN or add a token to the config file")]
    NotAuthenticated,

    /// None of the debug log candidates could be opened.
    #[error("unable to obtain permissions for {}", .0.display())]
    LogFileUnavailable(PathBuf),

    /// Invalid input supplied by the user.
    #[error("{0}")]
    Invalid(String),
}

impl StratoError {
    /// Process exit code for this error.
    ///
    /// User-level failures exit with 1; a log file we cannot open means the
    /// CLI could not start at all and exits with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            StratoError::LogFileUnavailable(_) => 2,
            _ => 1,
        }
    }
}

/// Strato Result type alias.
pub type StratoResult<T> = Result<T, StratoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(StratoError::NoProject.exit_code(), 1);
        assert_eq!(
            StratoError::Api {
                status: 404,
                message: "not found".into()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            StratoError::LogFileUnavailable(PathBuf::from("strato-debug.log")).exit_code(),
            2
        );
    }

    #[test]
    fn test_log_file_message_names_path() {
        let err = StratoError::LogFileUnavailable(PathBuf::from("strato-debug.log"));
        assert_eq!(
            err.to_string(),
            "unable to obtain permissions for strato-debug.log"
        );
    }
}
