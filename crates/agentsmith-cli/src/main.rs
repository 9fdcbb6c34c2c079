//! agentsmith - conversational agent builder CLI

mod commands;
mod config;
mod sink;

use std::time::Duration;

use agentsmith_dialogue::{Dialogue, DialogueConfig, DialogueEvent, Error, Intent, Slot, classify};
use clap::Parser;
use tokio::sync::broadcast;

use crate::sink::{ConsoleNavigator, ConsoleNotifier, Navigator, Notifier, NotifyKind};

/// agentsmith - build an automation agent by chatting
#[derive(Parser, Debug)]
#[command(name = "agentsmith")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Artificial interpreter latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Interpreter timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Send one or more messages non-interactively, then exit
    #[arg(short = 'c', long = "command", action = clap::ArgAction::Append)]
    commands: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.init_config {
        let path = config::Config::init()?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let cfg = config::Config::load();

    // CLI args take precedence over the config file.
    let latency = Duration::from_millis(args.latency_ms.or(cfg.latency_ms).unwrap_or(1000));
    let timeout = Duration::from_millis(args.timeout_ms.or(cfg.timeout_ms).unwrap_or(10_000));
    let route = cfg
        .dashboard_route
        .clone()
        .unwrap_or_else(|| "/dashboard".to_string());

    let dialogue_config = DialogueConfig {
        greeting: cfg.greeting.clone(),
        backend_timeout: timeout,
    };
    let mut dialogue = Dialogue::scripted(dialogue_config, latency);

    if !args.commands.is_empty() {
        return run_commands(&mut dialogue, &args.commands).await;
    }

    run_interactive(&mut dialogue, &route).await
}

/// Non-interactive mode: play the given messages through the dialogue.
async fn run_commands(dialogue: &mut Dialogue, messages: &[String]) -> anyhow::Result<()> {
    for text in messages {
        match dialogue.send(text).await {
            Ok(session) => {
                if let Some(reply) = session.last_reply() {
                    println!("{}", reply.content);
                }
            }
            Err(e) => eprintln!("rejected: {}", e),
        }
    }
    println!();
    println!("{}", commands::render_plan(dialogue.session()));
    Ok(())
}

/// Drives the hand-off once the plan is complete: on the user's
/// confirming reply, notify success exactly once and navigate to the
/// dashboard. The verdict comes from the engine's own confirmation
/// classification, so the CLI and the scripted replies always agree.
struct CreateFlow<'a> {
    notifier: &'a dyn Notifier,
    navigator: &'a dyn Navigator,
    route: &'a str,
    awaiting_confirm: bool,
}

impl<'a> CreateFlow<'a> {
    fn new(notifier: &'a dyn Notifier, navigator: &'a dyn Navigator, route: &'a str) -> Self {
        Self {
            notifier,
            navigator,
            route,
            awaiting_confirm: false,
        }
    }

    /// Record that the plan just completed and is awaiting a verdict.
    fn plan_completed(&mut self) {
        self.awaiting_confirm = true;
    }

    /// Forget the pending verdict (session was reset).
    fn reset(&mut self) {
        self.awaiting_confirm = false;
    }

    /// Handle one accepted user turn. Returns `true` when the agent
    /// was created and the loop should exit.
    fn on_turn(&mut self, input: &str) -> bool {
        if !self.awaiting_confirm || classify(input, Slot::Confirmation) != Intent::Confirm {
            return false;
        }
        self.awaiting_confirm = false;
        self.notifier
            .notify(NotifyKind::Success, "Agent created successfully!");
        self.navigator.navigate(self.route);
        true
    }
}

/// Interactive chat loop: the external collaborator of the engine.
async fn run_interactive(dialogue: &mut Dialogue, dashboard_route: &str) -> anyhow::Result<()> {
    use std::io::{self, Write};

    let notifier = ConsoleNotifier;
    let navigator = ConsoleNavigator;
    let mut flow = CreateFlow::new(&notifier, &navigator, dashboard_route);
    let mut events = dialogue.subscribe();

    println!("agentsmith (session {})", &dialogue.session().id[..8]);
    println!();
    if let Some(greeting) = dialogue.session().last_reply() {
        println!("{}", greeting.content);
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(result) = commands::execute_command(input, dialogue.session()) {
            match result {
                commands::CommandResult::Reset => {
                    dialogue.reset();
                    flow.reset();
                    println!("Started a new conversation.");
                    if let Some(greeting) = dialogue.session().last_reply() {
                        println!("{}", greeting.content);
                    }
                }
                commands::CommandResult::Exit => break,
                commands::CommandResult::Message(msg) => println!("{}", msg),
                commands::CommandResult::Unknown(cmd) => {
                    println!("Unknown command: /{}", cmd);
                    println!("Type /help for available commands.");
                }
            }
            continue;
        }

        match dialogue.send(input).await {
            Ok(session) => {
                if let Some(reply) = session.last_reply() {
                    println!("{}", reply.content);
                }
            }
            Err(Error::InvalidInput) => {
                println!("Please type a message first.");
                continue;
            }
            Err(Error::Busy) => {
                println!("Still working on your last message.");
                continue;
            }
        }

        if drain_completion(&mut events) {
            flow.plan_completed();
            println!();
            println!("{}", commands::render_plan(dialogue.session()));
            println!();
            println!("Reply 'yes' to confirm and create the agent.");
            continue;
        }

        if flow.on_turn(input) {
            break;
        }
    }

    Ok(())
}

/// Drain pending events, reporting whether the plan just completed.
fn drain_completion(events: &mut broadcast::Receiver<DialogueEvent>) -> bool {
    let mut completed = false;
    while let Ok(event) = events.try_recv() {
        tracing::debug!(?event, "dialogue event");
        if event.is_completion() {
            completed = true;
        }
    }
    completed
}
