//! Error types for vadm
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using AdminError
pub type Result<T> = std::result::Result<T, AdminError>;

/// Unified error type for management protocol operations
#[derive(Debug, Error)]
pub enum AdminError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Connect failed for {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    /// A read or connect deadline elapsed. The connection must be discarded;
    /// the stream position after a timeout is unknown.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A command received a non-200 reply. Carries the echoed command text
    /// and the reply body for diagnostics.
    #[error("Command `{command}` failed with status {status}: {body}")]
    Command {
        status: u32,
        command: String,
        body: String,
    },

    #[error("Unknown command verb: {0}")]
    UnknownCommand(String),

    // -------------------------------------------------------------------------
    // Auth Errors
    // -------------------------------------------------------------------------
    #[error("Authentication failed: {0}")]
    Auth(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Manager is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // HTTP Errors
    // -------------------------------------------------------------------------
    #[error("HTTP purge failed: {0}")]
    Http(String),
}

impl AdminError {
    /// Normalize an IO error into the crate taxonomy.
    ///
    /// Read deadlines surface as `WouldBlock` on Unix and `TimedOut` on
    /// Windows; both become [`AdminError::Timeout`].
    pub fn from_io(err: std::io::Error, context: &str) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                AdminError::Timeout(context.to_string())
            }
            _ => AdminError::Io(err),
        }
    }
}
