use anyhow::{anyhow, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use supportchat_core::{ConversationController, RequestError, SupportWidget};

use super::render::render_message;

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    History,
    Clear,
    Delete(String),
    List,
    Session,
    Error,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        if !line.starts_with('/') {
            return ReplCommand::Ask(line.to_string());
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "/history" => ReplCommand::History,
            "/clear" => ReplCommand::Clear,
            "/delete" if !arg.is_empty() => ReplCommand::Delete(arg.to_string()),
            "/list" => ReplCommand::List,
            "/session" => ReplCommand::Session,
            "/error" => ReplCommand::Error,
            "/help" => ReplCommand::Help,
            "/quit" | "/exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  /history        reload the conversation from the server");
    println!("  /clear          start over with a new session");
    println!("  /delete <id>    remove one message (ids are shown by /list)");
    println!("  /list           show the transcript with message ids");
    println!("  /session        show the current session id");
    println!("  /error          show and dismiss the last error");
    println!("  /quit           exit");
}

fn print_transcript(widget: &SupportWidget, show_ids: bool) {
    let messages = widget.controller().messages();
    if messages.is_empty() {
        println!("{}", widget.welcome_message().bright_black());
        return;
    }
    for message in &messages {
        println!("{}", render_message(message, show_ids));
    }
}

/// Print everything appended since the transcript had `seen` entries
fn print_new_messages(widget: &SupportWidget, seen: usize) {
    for message in widget.controller().messages().iter().skip(seen) {
        println!("{}", render_message(message, false));
    }
}

/// Reload the transcript from the server, returning only an error raised by this reload
pub async fn reload_history(controller: &ConversationController) -> Option<RequestError> {
    controller.clear_error();
    controller.load_history().await;
    controller.error()
}

/// Run interactive REPL mode
pub async fn run_repl_mode(widget: &mut SupportWidget) -> Result<()> {
    println!("{}", "💬 Customer Support".bright_cyan().bold());
    println!("{}", format!("Backend: {}", widget.config().base_url()).bright_black());
    println!("{}", "Type '/help' for commands or '/quit' to exit\n".bright_black());

    widget.toggle();
    print_transcript(widget, false);

    let mut rl = DefaultEditor::new()?;
    let prompt = format!("{} ", ">".bright_blue());
    println!("{}", widget.placeholder().bright_black());

    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            rl.add_history_entry(line.as_str())?;
        }

        let controller = widget.controller().clone();
        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Ask(question) => {
                // The question itself is already on screen
                let seen = controller.messages().len() + 1;
                println!("{}", "…".bright_black());
                controller.send_message(&question).await;
                print_new_messages(widget, seen);
            }
            ReplCommand::History => {
                match reload_history(&controller).await {
                    Some(err) => println!("{}", format!("Could not load history: {}", err).red()),
                    None => print_transcript(widget, false),
                }
            }
            ReplCommand::Clear => {
                controller.clear_history();
                println!("{}", format!("Started new session {}", controller.session_id()).bright_black());
            }
            ReplCommand::Delete(id) => {
                if controller.delete_message(&id) {
                    println!("{}", format!("Deleted {}", id).bright_black());
                } else {
                    println!("{}", format!("No message with id {}", id).yellow());
                }
            }
            ReplCommand::List => print_transcript(widget, true),
            ReplCommand::Session => println!("{}", controller.session_id()),
            ReplCommand::Error => match controller.error() {
                Some(err) => {
                    println!("{}", format!("Last error: {}", err).red());
                    controller.clear_error();
                }
                None => println!("{}", "No error".bright_black()),
            },
            ReplCommand::Help => print_help(),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(input) => {
                println!("{}", format!("Unknown command: {} (try /help)", input).yellow());
            }
        }
    }

    widget.close();
    widget.controller().shutdown();
    Ok(())
}

/// Ask one question non-interactively; fails if the exchange failed
pub async fn ask_once(widget: &SupportWidget, question: &str) -> Result<()> {
    let controller = widget.controller();
    if question.trim().is_empty() {
        return Err(anyhow!("Question must not be empty"));
    }

    controller.send_message(question).await;

    if let Some(err) = controller.error() {
        return Err(anyhow!("Support request failed: {}", err));
    }
    if let Some(reply) = controller.messages().last() {
        println!("{}", render_message(reply, false));
    }
    Ok(())
}
