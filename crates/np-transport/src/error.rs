//! Transport error types.

use thiserror::Error;

/// Errors that can occur on the device command channel.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("command timed out after {0}s")]
    Timeout(u64),

    #[error("channel closed by peer")]
    ChannelClosed,

    #[error("I/O error: {0}")]
    Io(String),
}

/// Convenience alias for transport results.
pub type TransportResult<T> = Result<T, TransportError>;
