//! Error types for the AI Bank Tool MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the AI Bank Tool MCP Server
#[derive(Error, Debug)]
pub enum BankToolError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port in {var}: {value}")]
    InvalidPort { var: String, value: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },
}

/// Result type alias for AI Bank Tool operations
pub type Result<T> = std::result::Result<T, BankToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = McpError::InvalidArguments {
            tool: "execute_transfer".to_string(),
            message: "missing field `amountJPY`".to_string(),
        };
        assert!(err.to_string().contains("execute_transfer"));
        assert!(err.to_string().contains("amountJPY"));
    }

    #[test]
    fn test_error_conversion() {
        let mcp_err = McpError::UnknownTool {
            name: "close_account".to_string(),
        };
        let err: BankToolError = mcp_err.into();
        assert!(matches!(err, BankToolError::Mcp(_)));
    }
}
