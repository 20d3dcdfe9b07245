//! Error types for rconkit
//!
//! Provides a unified error type for all client operations.

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for RCON operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed reading packet header: {0}")]
    ReadFailure(#[source] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Authentication unsuccessful")]
    AuthFailed,

    #[error("Payload exceeded maximum allowed size of {max} ({size} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RconError {
    /// Whether the connection behind this error can no longer be used.
    ///
    /// A session that fails this way can be recovered with `Session::reconnect`.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, RconError::Io(_) | RconError::ReadFailure(_))
    }
}
