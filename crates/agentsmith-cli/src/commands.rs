//! Slash command handling for the interactive loop

use agentsmith_dialogue::Session;

/// Result of executing a slash command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Reset the session
    Reset,
    /// Exit the loop
    Exit,
    /// Print a message
    Message(String),
    /// Unknown command
    Unknown(String),
}

/// Execute a slash command. Returns `None` if the input is not a
/// command and should go to the dialogue instead.
pub fn execute_command(input: &str, session: &Session) -> Option<CommandResult> {
    let input = input.strip_prefix('/')?;
    let command = input.split_whitespace().next().unwrap_or("");

    Some(match command {
        "reset" | "new" => CommandResult::Reset,
        "quit" | "exit" => CommandResult::Exit,
        "plan" => CommandResult::Message(render_plan(session)),
        "help" => CommandResult::Message(help_text()),
        other => CommandResult::Unknown(other.to_string()),
    })
}

fn help_text() -> String {
    [
        "Commands:",
        "  /plan   Show the plan built so far",
        "  /reset  Start a new conversation",
        "  /help   Show this help",
        "  /quit   Exit",
    ]
    .join("\n")
}

/// Render the accumulated plan as the sidebar panel text.
pub fn render_plan(session: &Session) -> String {
    let Some(ref plan) = session.plan else {
        return "Start chatting to build your agent plan.".to_string();
    };

    let mut out = String::new();
    let header = if session.completion {
        "Agent Created"
    } else {
        "Agent Plan"
    };
    out.push_str(header);
    out.push('\n');
    out.push_str(&format!("  Goal:    {}\n", plan.goal));
    out.push_str(&format!("  Inputs:  {}\n", plan.inputs.join(", ")));
    out.push_str(&format!("  Actions: {}\n", plan.actions.join(" -> ")));
    out.push_str(&format!("  Tools:   {}\n", plan.tools.join(", ")));
    out.push_str(&format!("  Output:  {}", plan.output));
    out
}
