//! Slash commands for interactive mode

mod lang;
mod pick;

pub use lang::LangCommand;
pub use pick::PickCommand;

use guidechat_api::SuggestionSet;
use guidechat_core::{Command, LanguageCatalog};

/// Result of executing a slash command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Forward a command to the controller
    Dispatch(Command),
    /// Show a message to the user (not sent to the backend)
    Message(String),
    /// Open the language picker (TUI only)
    OpenLanguagePicker,
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// What a command may look at
pub struct CommandContext<'a> {
    pub languages: &'a LanguageCatalog,
    /// Suggestions currently on offer
    pub suggestions: Option<&'a SuggestionSet>,
}

/// Parse and execute a slash command. Returns `None` for ordinary questions.
pub fn execute_command(input: &str, ctx: &CommandContext<'_>) -> Option<CommandResult> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next().unwrap_or_default().to_lowercase();
    let args = parts.next().map(str::trim).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "clear" | "c" => CommandResult::Dispatch(Command::Clear),

        "quit" | "exit" | "q" => CommandResult::Exit,

        "lang" | "l" => LangCommand::execute(args, ctx.languages),

        "pick" | "p" => PickCommand::execute(args, ctx.suggestions),

        "search" | "s" => CommandResult::Dispatch(Command::TriggerSearch),

        _ => CommandResult::Unknown(command),
    })
}

pub fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?        Show this help message
  /lang, /l [code]     List languages or switch to one
  /pick, /p <n>        Ask suggested question number n
  /search, /s          Search the web for the last unanswered question
  /clear, /c           Start a fresh conversation
  /quit, /exit, /q     Exit guidechat

Examples:
  /lang                List available languages
  /lang hi             Switch to Hindi
  /lang tamil          Switch to the first language named "tamil"
  /pick 2              Ask the second related question"#
        .to_string()
}
