//! Dialogue controller: the single mutation entry point over a session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::events::DialogueEvent;
use crate::handle::DialogueHandle;
use crate::intent::{Intent, Slot};
use crate::interpreter::{Interpreter, ScriptedInterpreter};
use crate::plan::merge;
use crate::script;
use crate::session::Session;
use crate::types::Message;

/// Dialogue configuration
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Greeting seeded into a fresh session (`None` uses the default)
    pub greeting: Option<String>,
    /// Hard ceiling on one interpreter call. On expiry the turn falls
    /// back to the Unclear branch; the session never stays pending.
    pub backend_timeout: Duration,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            greeting: None,
            backend_timeout: Duration::from_secs(10),
        }
    }
}

/// The controller that owns a session and advances it one send at a
/// time. All state mutation flows through [`Dialogue::send`] and
/// [`Dialogue::reset`].
pub struct Dialogue {
    config: DialogueConfig,
    session: Session,
    slot: Slot,
    interpreter: Arc<dyn Interpreter>,
    event_tx: broadcast::Sender<DialogueEvent>,
    handle: DialogueHandle,
}

impl Dialogue {
    /// Create a new dialogue with the given interpreter.
    pub fn new(config: DialogueConfig, interpreter: Arc<dyn Interpreter>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        let session = Session::new(config.greeting.as_deref());
        Self {
            config,
            session,
            slot: Slot::Goal,
            interpreter,
            event_tx,
            handle: DialogueHandle::new(),
        }
    }

    /// Create a dialogue backed by the scripted interpreter.
    pub fn scripted(config: DialogueConfig, latency: Duration) -> Self {
        Self::new(config, Arc::new(ScriptedInterpreter::new(latency)))
    }

    /// Subscribe to dialogue events.
    pub fn subscribe(&self) -> broadcast::Receiver<DialogueEvent> {
        self.event_tx.subscribe()
    }

    /// Read-only projection of the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get a cloneable handle for observing or aborting from outside.
    pub fn handle(&self) -> DialogueHandle {
        self.handle.clone()
    }

    /// Accept one user message and advance the session.
    ///
    /// Rejects whitespace-only input with [`Error::InvalidInput`] and a
    /// send racing an in-flight one with [`Error::Busy`]; both leave
    /// the session untouched. All other paths succeed: interpreter
    /// timeout or failure is absorbed into the Unclear branch.
    pub async fn send(&mut self, text: &str) -> Result<&Session> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput);
        }
        if !self.handle.try_begin() {
            return Err(Error::Busy);
        }
        self.session.pending = true;

        let user_message = Message::user(trimmed);
        self.session.transcript.push(user_message.clone());
        let _ = self.event_tx.send(DialogueEvent::UserMessage {
            message: user_message,
        });

        let intent = self.interpret(trimmed).await;
        let resolution = script::resolve(self.slot, intent, trimmed);

        self.session.turn_index += 1;

        if let Some(ref patch) = resolution.patch {
            let plan = merge(self.session.plan.as_ref(), patch);
            let _ = self.event_tx.send(DialogueEvent::PlanUpdated { plan: plan.clone() });
            self.session.plan = Some(plan);
        }

        let reply = Message::assistant(&resolution.reply);
        self.session.transcript.push(reply.clone());
        let _ = self
            .event_tx
            .send(DialogueEvent::AssistantMessage { message: reply });

        if resolution.completes && !self.session.completion {
            self.session.completion = true;
            if let Some(ref plan) = self.session.plan {
                let _ = self.event_tx.send(DialogueEvent::Completed { plan: plan.clone() });
            }
        }

        self.slot = resolution.next;
        self.session.pending = false;
        self.handle.finish();

        Ok(&self.session)
    }

    /// Discard all state and start over from the seeded greeting.
    pub fn reset(&mut self) -> &Session {
        self.session = Session::new(self.config.greeting.as_deref());
        self.slot = Slot::Goal;
        let _ = self.event_tx.send(DialogueEvent::SessionReset);
        &self.session
    }

    /// Run the interpreter under the configured timeout, falling back
    /// to Unclear on timeout, cancellation, or backend failure.
    async fn interpret(&self, text: &str) -> Intent {
        let cancel = self.handle.fresh_cancel_token();
        let call = self.interpreter.interpret(text, self.slot, cancel);
        match tokio::time::timeout(self.config.backend_timeout, call).await {
            Ok(Ok(intent)) => intent,
            Ok(Err(e)) => {
                tracing::warn!("interpreter failed, treating turn as unclear: {e}");
                Intent::Unclear
            }
            Err(_) => {
                tracing::warn!(
                    "interpreter timed out after {:?}, treating turn as unclear",
                    self.config.backend_timeout
                );
                Intent::Unclear
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{InterpretError, InterpretResult};
    use crate::types::Role;
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    fn make_dialogue() -> Dialogue {
        Dialogue::scripted(DialogueConfig::default(), Duration::ZERO)
    }

    /// Interpreter that always fails, for fallback tests.
    struct FailingInterpreter;

    #[async_trait]
    impl Interpreter for FailingInterpreter {
        async fn interpret(
            &self,
            _text: &str,
            _slot: Slot,
            _cancel: CancellationToken,
        ) -> InterpretResult<Intent> {
            Err(InterpretError::Backend("provider unreachable".into()))
        }
    }

    #[tokio::test]
    async fn test_monitor_path_whatsapp() {
        let mut dlg = make_dialogue();
        dlg.send("Alert me when price drops").await.unwrap();
        dlg.send("every hour").await.unwrap();
        let session = dlg.send("whatsapp").await.unwrap();

        assert!(session.completion);
        assert_eq!(session.turn_index, 3);
        let plan = session.plan.as_ref().unwrap();
        assert_eq!(plan.goal, "Monitor and alert");
        assert_eq!(plan.output, "WhatsApp notification");
        assert_eq!(
            plan.tools,
            vec!["Web scraper", "Notifier", "Scheduler"]
        );
        // greeting + 3 exchanges
        assert_eq!(session.transcript.len(), 7);
    }

    #[tokio::test]
    async fn test_channel_both_sets_combined_output() {
        let mut dlg = make_dialogue();
        dlg.send("notify me about drops").await.unwrap();
        dlg.send("daily").await.unwrap();
        let session = dlg.send("use both please").await.unwrap();
        assert_eq!(session.plan.as_ref().unwrap().output, "WhatsApp + Email");
    }

    #[tokio::test]
    async fn test_summarize_path() {
        let mut dlg = make_dialogue();
        dlg.send("email me a summary of my orders").await.unwrap();
        let plan = dlg.session().plan.as_ref().unwrap();
        assert_eq!(plan.goal, "Generate and send summary");
        assert_eq!(plan.output, "Daily email summary");
        assert!(!dlg.session().completion);
    }

    #[tokio::test]
    async fn test_empty_input_rejected_without_state_change() {
        let mut dlg = make_dialogue();
        let before = dlg.session().clone();

        assert_eq!(dlg.send("").await.unwrap_err(), Error::InvalidInput);
        assert_eq!(dlg.send("   \n\t ").await.unwrap_err(), Error::InvalidInput);

        let after = dlg.session();
        assert_eq!(after.turn_index, before.turn_index);
        assert_eq!(after.transcript.len(), before.transcript.len());
        assert!(!after.pending);
    }

    #[tokio::test]
    async fn test_busy_rejected_while_pending() {
        let mut dlg = make_dialogue();
        // Claim the pending flag as an in-flight send would.
        assert!(dlg.handle().try_begin());

        let before_len = dlg.session().transcript.len();
        assert_eq!(dlg.send("alert me").await.unwrap_err(), Error::Busy);
        assert_eq!(dlg.session().transcript.len(), before_len);
        assert_eq!(dlg.session().turn_index, 0);

        dlg.handle().finish();
        dlg.send("alert me").await.unwrap();
        assert_eq!(dlg.session().turn_index, 1);
    }

    #[tokio::test]
    async fn test_pending_cleared_after_send() {
        let mut dlg = make_dialogue();
        dlg.send("alert me").await.unwrap();
        assert!(!dlg.session().pending);
        assert!(!dlg.handle().is_pending());
    }

    #[tokio::test]
    async fn test_repeated_unclear_never_builds_plan() {
        let mut dlg = make_dialogue();
        for i in 1..=4 {
            let session = dlg.send("do a thing").await.unwrap();
            assert_eq!(session.turn_index, i);
            assert!(session.plan.is_none());
            assert!(!session.completion);
        }
        // A recognized intent still works afterwards.
        let session = dlg.send("alert me when it drops").await.unwrap();
        assert_eq!(session.plan.as_ref().unwrap().goal, "Monitor and alert");
    }

    #[tokio::test]
    async fn test_reset_reseeds_session() {
        let mut dlg = make_dialogue();
        dlg.send("alert me").await.unwrap();
        dlg.send("hourly").await.unwrap();

        let session = dlg.reset();
        assert_eq!(session.turn_index, 0);
        assert!(session.plan.is_none());
        assert!(!session.completion);
        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.transcript[0].role, Role::Assistant);

        // The slot cursor restarts too: the next send is a goal turn.
        dlg.send("email me a report").await.unwrap();
        assert_eq!(
            dlg.session().plan.as_ref().unwrap().goal,
            "Generate and send summary"
        );
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back_to_unclear() {
        let mut dlg = Dialogue::new(DialogueConfig::default(), Arc::new(FailingInterpreter));
        let session = dlg.send("alert me when price drops").await.unwrap();

        assert_eq!(session.turn_index, 1);
        assert!(session.plan.is_none(), "failed turn must not build a plan");
        assert!(!session.pending, "session must not stay pending");
        // Next send with a working flag claim still goes through.
        assert!(!dlg.handle().is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_backend_timeout_falls_back_to_unclear() {
        let config = DialogueConfig {
            backend_timeout: Duration::from_millis(50),
            ..DialogueConfig::default()
        };
        let mut dlg = Dialogue::scripted(config, Duration::from_secs(60));

        let session = dlg.send("alert me when price drops").await.unwrap();
        assert!(session.plan.is_none());
        assert!(!session.pending);
        assert_eq!(session.turn_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_falls_back_to_unclear() {
        let mut dlg = Dialogue::scripted(DialogueConfig::default(), Duration::from_secs(5));
        let handle = dlg.handle();

        let (session, _) = tokio::join!(dlg.send("alert me"), async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.abort();
        });
        let session = session.unwrap();
        assert!(session.plan.is_none());
        assert!(!session.pending);
    }

    #[tokio::test]
    async fn test_completion_latches() {
        let mut dlg = make_dialogue();
        dlg.send("alert me").await.unwrap();
        dlg.send("daily").await.unwrap();
        dlg.send("whatsapp").await.unwrap();
        assert!(dlg.session().completion);

        // Post-completion sends never revert completion or move the plan.
        let plan_before = dlg.session().plan.clone();
        dlg.send("actually change everything").await.unwrap();
        assert!(dlg.session().completion);
        assert_eq!(dlg.session().plan, plan_before);
    }

    #[tokio::test]
    async fn test_confirm_after_completion() {
        let mut dlg = make_dialogue();
        dlg.send("alert me").await.unwrap();
        dlg.send("daily").await.unwrap();
        dlg.send("whatsapp").await.unwrap();

        let session = dlg.send("Yes, looks perfect!").await.unwrap();
        let reply = session.last_reply().unwrap();
        assert!(reply.content.contains("ready"), "got: {}", reply.content);
    }

    #[tokio::test]
    async fn test_event_sequence_for_one_send() {
        let mut dlg = make_dialogue();
        let mut rx = dlg.subscribe();

        dlg.send("alert me when price drops").await.unwrap();

        assert!(matches!(rx.try_recv().unwrap(), DialogueEvent::UserMessage { .. }));
        assert!(matches!(rx.try_recv().unwrap(), DialogueEvent::PlanUpdated { .. }));
        assert!(matches!(
            rx.try_recv().unwrap(),
            DialogueEvent::AssistantMessage { .. }
        ));
        assert!(rx.try_recv().is_err(), "no completion event on turn 1");
    }

    #[tokio::test]
    async fn test_completion_event_emitted_once() {
        let mut dlg = make_dialogue();
        let mut rx = dlg.subscribe();

        dlg.send("alert me").await.unwrap();
        dlg.send("daily").await.unwrap();
        dlg.send("whatsapp and email, both").await.unwrap();
        dlg.send("yes").await.unwrap();

        let mut completions = 0;
        while let Ok(event) = rx.try_recv() {
            if event.is_completion() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }
}
