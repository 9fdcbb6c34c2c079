//! The scripted transition table driving the dialogue.
//!
//! `resolve` is a deterministic, total function of (slot, intent, raw
//! text): it produces the assistant reply, an optional plan patch, a
//! completion flag, and the next slot to fill. Substituting a real
//! language-understanding backend changes how intents are produced,
//! not this table.

use crate::intent::{Intent, Slot};
use crate::plan::PlanPatch;

/// The seeded greeting for a fresh session.
pub const GREETING: &str = "Hi! I'll help you create an AI agent. Just tell me what you \
want to automate in plain English. For example: 'Alert me when sneakers drop below \
$100 on my favorite store'";

const ASK_FREQUENCY: &str = "Got it! I understand you want to receive alerts. How often \
should I check? (e.g., 'daily', 'every hour', 'every 6 hours')";

const ASK_DELIVERY_TIME: &str = "Perfect! I'll set up an email summary for you. What time \
should I send it? (e.g., '9 AM', 'every morning')";

const ASK_CLARIFICATION: &str = "I'd love to help! Could you tell me more about what you \
want to happen? For example, do you want alerts, summaries, or something else?";

const ASK_CHANNEL: &str = "Great! And where should I send the results? I can use \
WhatsApp, email, or both.";

const ASK_CONFIRMATION: &str = "Let me summarize what I understood. Does this look correct?";

const AGENT_READY: &str = "Perfect! Your agent is ready to go. I'll start monitoring \
right away.";

const OFFER_REFINE: &str = "No problem! Tell me what to change, or start a new \
conversation to rebuild the plan from scratch.";

/// Result of resolving one user turn against the script.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Assistant reply to append to the transcript
    pub reply: String,
    /// Plan update for this turn, if any
    pub patch: Option<PlanPatch>,
    /// Whether this turn completes the plan
    pub completes: bool,
    /// Slot the dialogue moves on to
    pub next: Slot,
}

impl Resolution {
    fn new(reply: &str, patch: Option<PlanPatch>, completes: bool, next: Slot) -> Self {
        Self {
            reply: reply.to_string(),
            patch,
            completes,
            next,
        }
    }
}

fn monitor_patch() -> PlanPatch {
    PlanPatch {
        goal: Some("Monitor and alert".into()),
        inputs: vec!["Price threshold".into(), "Target websites".into()],
        actions: vec!["Check prices".into(), "Compare values".into()],
        tools: vec!["Web scraper".into(), "Notifier".into()],
        output: Some("Alert notification".into()),
    }
}

fn summarize_patch() -> PlanPatch {
    PlanPatch {
        goal: Some("Generate and send summary".into()),
        inputs: vec!["Data source".into(), "Time preference".into()],
        actions: vec!["Gather data".into(), "Summarize".into(), "Send email".into()],
        tools: vec![
            "Data fetcher".into(),
            "AI summarizer".into(),
            "Email sender".into(),
        ],
        output: Some("Daily email summary".into()),
    }
}

/// Pick the output channel from the user's raw channel answer.
fn output_for_channel(raw: &str) -> PlanPatch {
    let lower = raw.to_lowercase();
    let output = if lower.contains("both") {
        "WhatsApp + Email"
    } else if lower.contains("whatsapp") {
        "WhatsApp notification"
    } else {
        "Email notification"
    };
    PlanPatch::set_output(output)
}

/// Resolve one user turn: reply text, plan patch, completion, next slot.
///
/// Total over the full (slot, intent) domain. Combinations the
/// classifier never produces for a slot (including the `Unclear`
/// fallback used on backend timeout) re-ask the current slot's
/// question and leave the plan alone.
pub fn resolve(slot: Slot, intent: Intent, raw_text: &str) -> Resolution {
    match (slot, intent) {
        (Slot::Goal, Intent::Monitor) => {
            Resolution::new(ASK_FREQUENCY, Some(monitor_patch()), false, Slot::Frequency)
        }
        (Slot::Goal, Intent::Summarize) => Resolution::new(
            ASK_DELIVERY_TIME,
            Some(summarize_patch()),
            false,
            Slot::Frequency,
        ),
        (Slot::Frequency, Intent::AnswerFrequency) => Resolution::new(
            ASK_CHANNEL,
            Some(PlanPatch::add_tool("Scheduler")),
            false,
            Slot::Channel,
        ),
        (Slot::Channel, Intent::AnswerChannel) => Resolution::new(
            ASK_CONFIRMATION,
            Some(output_for_channel(raw_text)),
            true,
            Slot::Confirmation,
        ),
        (Slot::Confirmation, Intent::Confirm) => {
            Resolution::new(AGENT_READY, None, false, Slot::Confirmation)
        }
        (Slot::Confirmation, Intent::Refine) => {
            Resolution::new(OFFER_REFINE, None, false, Slot::Confirmation)
        }
        // Unclear (including the interpreter-failure fallback) and any
        // off-script combination: re-ask, no plan movement.
        (slot, _) => Resolution::new(reprompt_for(slot), None, false, slot),
    }
}

/// The question to re-ask when a turn did not fill its slot.
fn reprompt_for(slot: Slot) -> &'static str {
    match slot {
        Slot::Goal => ASK_CLARIFICATION,
        Slot::Frequency => ASK_FREQUENCY,
        Slot::Channel => ASK_CHANNEL,
        Slot::Confirmation => ASK_CONFIRMATION,
    }
}
