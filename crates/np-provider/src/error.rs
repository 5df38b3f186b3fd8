//! Provider error types.

use thiserror::Error;

/// Errors from reasoning provider selection and calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A pinned provider id is unknown or failed its availability probe.
    #[error("provider not available: {0}")]
    Unavailable(String),

    /// No provider at all passed its availability probe.
    #[error("no reasoning provider available")]
    NoneAvailable,

    /// The call itself failed (HTTP error, malformed body, empty reply).
    #[error("provider call failed: {0}")]
    Call(String),

    /// The call exceeded the per-call timeout.
    #[error("provider call timed out after {0}s")]
    Timeout(u64),
}
