//! Error types for agentsmith-dialogue

use thiserror::Error;

/// Result type alias using the dialogue Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a `send` can report. Both leave the session unchanged; no
/// other operation in this crate can fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input was empty or whitespace-only
    #[error("message is empty")]
    InvalidInput,

    /// A previous send is still being processed
    #[error("a message is already being processed")]
    Busy,
}
