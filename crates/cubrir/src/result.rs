//! Result and error types for Cubrir.

use thiserror::Error;

/// Result type for Cubrir operations
pub type CubrirResult<T> = Result<T, CubrirError>;

/// Errors that can occur in Cubrir
///
/// The core is a pure transform with no I/O surface of its own; the only
/// failures it can report are contract violations by the instrumentation
/// collaborator that hands it run payloads.
#[derive(Debug, Error)]
pub enum CubrirError {
    /// A run payload delivered by the instrumentation collaborator could
    /// not be decoded into a coverage tree
    #[error("malformed coverage run payload: {0}")]
    MalformedRun(#[from] serde_json::Error),
}
