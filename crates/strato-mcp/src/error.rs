//! MCP error types.

use thiserror::Error;

/// Errors raised while listing or calling tools.
#[derive(Debug, Error)]
pub enum McpError {
    /// No tool is registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not match the tool's input schema.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An input line was not valid UTF-8. The line has been consumed.
    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Reading or writing the transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// MCP Result type alias.
pub type McpResult<T> = Result<T, McpError>;
