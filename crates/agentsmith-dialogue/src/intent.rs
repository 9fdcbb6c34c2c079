//! Intent classification against the current unfilled slot.
//!
//! The dialogue tracks which semantic slot it is trying to fill and
//! classifies each utterance against that slot, not against a raw turn
//! counter. On the happy path the slots line up with turns 0/1/2.

use serde::{Deserialize, Serialize};

/// The next unfilled slot of the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// What should the agent do (first recognized intent sets the goal)
    Goal,
    /// How often should it run
    Frequency,
    /// Where should results be delivered
    Channel,
    /// Plan presented, waiting for the user's verdict
    Confirmation,
}

/// The classified purpose of a user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Monitor,
    Summarize,
    Unclear,
    AnswerFrequency,
    AnswerChannel,
    Confirm,
    Refine,
}

const MONITOR_MARKERS: &[&str] = &["alert", "notify", "tell me when"];
const SUMMARIZE_MARKERS: &[&str] = &["email", "summary", "report"];
const CONFIRM_MARKERS: &[&str] = &["yes", "confirm", "looks good", "perfect", "correct"];

/// Classify an utterance against the slot the dialogue is trying to
/// fill. Pure function of its inputs; unrecognized text always maps to
/// `Unclear` (or `Refine` at confirmation), never an error.
pub fn classify(text: &str, slot: Slot) -> Intent {
    let lower = text.to_lowercase();
    match slot {
        Slot::Goal => {
            if MONITOR_MARKERS.iter().any(|m| lower.contains(m)) {
                Intent::Monitor
            } else if SUMMARIZE_MARKERS.iter().any(|m| lower.contains(m)) {
                Intent::Summarize
            } else {
                Intent::Unclear
            }
        }
        // Scripted stand-in for real understanding: once a goal is
        // known, the next two answers fill their slots regardless of
        // content.
        Slot::Frequency => Intent::AnswerFrequency,
        Slot::Channel => Intent::AnswerChannel,
        Slot::Confirmation => {
            if CONFIRM_MARKERS.iter().any(|m| lower.contains(m)) {
                Intent::Confirm
            } else {
                Intent::Refine
            }
        }
    }
}
