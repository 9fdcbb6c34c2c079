//! agentsmith-dialogue: slot-filling dialogue engine
//!
//! This crate turns free-form chat messages into a structured agent plan
//! through a fixed sequence of clarifying questions. It owns the session
//! state, the intent classifier, and the transition script; rendering and
//! agent persistence live with the caller.

pub mod dialogue;
pub mod error;
pub mod events;
pub mod handle;
pub mod intent;
pub mod interpreter;
pub mod plan;
pub mod script;
pub mod session;
pub mod types;

pub use dialogue::{Dialogue, DialogueConfig};
pub use error::{Error, Result};
pub use events::DialogueEvent;
pub use handle::DialogueHandle;
pub use intent::{Intent, Slot, classify};
pub use interpreter::{InterpretError, Interpreter, ScriptedInterpreter};
pub use plan::{AgentPlan, PlanPatch, merge};
pub use script::{Resolution, resolve};
pub use session::Session;
pub use types::{Message, Role};
