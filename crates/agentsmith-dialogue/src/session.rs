//! Session state: transcript, turn counter, accumulated plan, flags.

use serde::{Deserialize, Serialize};

use crate::plan::AgentPlan;
use crate::script;
use crate::types::Message;

/// The observable state of one dialogue session.
///
/// Held behind the controller's single mutation entry point (`send`);
/// callers get read-only projections for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier
    pub id: String,
    /// Append-only conversation transcript
    pub transcript: Vec<Message>,
    /// Count of accepted user messages
    pub turn_index: u32,
    /// The plan accumulated so far, absent until the goal is known
    pub plan: Option<AgentPlan>,
    /// Latched true once the plan is complete; never reverts
    pub completion: bool,
    /// True only while a send is being processed
    pub pending: bool,
}

impl Session {
    /// A fresh session seeded with the assistant greeting.
    pub fn new(greeting: Option<&str>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            transcript: vec![Message::assistant(greeting.unwrap_or(script::GREETING))],
            turn_index: 0,
            plan: None,
            completion: false,
            pending: false,
        }
    }

    /// The most recent assistant reply, if any.
    pub fn last_reply(&self) -> Option<&Message> {
        self.transcript.iter().rev().find(|m| !m.is_user())
    }
}
