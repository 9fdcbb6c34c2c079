//! Dialogue event types

use serde::{Deserialize, Serialize};

use crate::plan::AgentPlan;
use crate::types::Message;

/// Events broadcast while a session advances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueEvent {
    /// The session was reset to the seeded greeting
    SessionReset,

    /// A user message was accepted into the transcript
    UserMessage { message: Message },

    /// The assistant reply was appended
    AssistantMessage { message: Message },

    /// The plan changed this turn
    PlanUpdated { plan: AgentPlan },

    /// The plan is complete and awaiting the user's verdict
    Completed { plan: AgentPlan },
}

impl DialogueEvent {
    /// Check if this event carries the finished plan
    pub fn is_completion(&self) -> bool {
        matches!(self, DialogueEvent::Completed { .. })
    }
}
