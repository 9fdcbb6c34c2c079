//! Interpreter abstraction for turning utterances into intents.
//!
//! The trait is the seam where a real language-understanding backend
//! would plug in. The shipped implementation is the deterministic
//! script with a configurable artificial latency.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::intent::{self, Intent, Slot};

/// Errors from the interpretation backend. The session controller
/// absorbs all of these into the `Unclear` fallback.
#[derive(Error, Debug)]
pub enum InterpretError {
    /// The call was cancelled from outside
    #[error("interpretation cancelled")]
    Cancelled,

    /// The backend failed (network, provider, malformed response)
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type alias for interpreter calls
pub type InterpretResult<T> = std::result::Result<T, InterpretError>;

/// Maps an utterance to an intent, given the slot the dialogue is
/// currently trying to fill.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(
        &self,
        text: &str,
        slot: Slot,
        cancel: CancellationToken,
    ) -> InterpretResult<Intent>;
}

/// The scripted stand-in for a real inference call: waits the
/// configured latency, then classifies deterministically.
pub struct ScriptedInterpreter {
    latency: Duration,
}

impl ScriptedInterpreter {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for ScriptedInterpreter {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl Interpreter for ScriptedInterpreter {
    async fn interpret(
        &self,
        text: &str,
        slot: Slot,
        cancel: CancellationToken,
    ) -> InterpretResult<Intent> {
        tokio::select! {
            _ = cancel.cancelled() => Err(InterpretError::Cancelled),
            _ = tokio::time::sleep(self.latency) => Ok(intent::classify(text, slot)),
        }
    }
}
