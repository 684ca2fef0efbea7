//! Line mode: a plain stdin/stdout chat

use crate::commands::{self, CommandContext, CommandResult, LangCommand};
use guidechat_api::{Gateway, SuggestionSet};
use guidechat_core::{
    Command, Controller, ControllerConfig, InputGate, Message, Role, SuggestionPanel, Transcript,
    format_reply, markup_to_plain,
};
use std::io::{self, Write};

/// Surface that prints each transcript entry as it is appended
pub struct PlainSurface<W: Write> {
    out: W,
    /// Print the user's own question back (one-shot mode)
    echo_user: bool,
    /// Print the entry a cleared transcript starts with
    show_cleared: bool,
    /// Mention the slash commands that act on suggestions and search
    command_hints: bool,
}

impl<W: Write> PlainSurface<W> {
    /// Interactive mode: the user's input is already on screen
    pub fn new(out: W) -> Self {
        Self {
            out,
            echo_user: false,
            show_cleared: true,
            command_hints: true,
        }
    }

    /// One-shot mode: echo the question, skip the greeting and command hints
    pub fn one_shot(out: W) -> Self {
        Self {
            out,
            echo_user: true,
            show_cleared: false,
            command_hints: false,
        }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|()| self.out.flush()) {
            tracing::debug!("failed to write output: {}", e);
        }
    }
}

impl<W: Write> Transcript for PlainSurface<W> {
    fn append_message(&mut self, message: &Message) {
        let text = match message.role {
            Role::User if !self.echo_user => return,
            Role::User => format!("> {}", message.text),
            Role::Assistant => format!("{}\n", markup_to_plain(&format_reply(&message.text))),
            Role::System => format!("[{}]", message.text),
        };
        self.write(&text);
    }

    // Line mode blocks on the reply, so there is nothing to animate
    fn append_typing(&mut self) {}

    fn remove_typing(&mut self) {}

    fn clear(&mut self, first: &Message) {
        if self.show_cleared {
            self.append_message(first);
        }
    }
}

impl<W: Write> InputGate for PlainSurface<W> {
    // Input is only read between turns
    fn lock(&mut self) {}

    fn unlock(&mut self) {}
}

impl<W: Write> SuggestionPanel for PlainSurface<W> {
    fn show_suggestions(&mut self, suggestions: &SuggestionSet) {
        let mut text = String::from("Related questions:\n");
        for (i, question) in suggestions.iter().enumerate() {
            text.push_str(&format!("  {}. {}\n", i + 1, question));
        }
        if self.command_hints {
            text.push_str("Ask one with /pick <n>\n");
        }
        self.write(&text);
    }

    fn dismiss_suggestions(&mut self) {}

    fn show_search_trigger(&mut self, query: &str) {
        if !self.command_hints {
            return;
        }
        self.write(&format!(
            "Search the web for \"{}\" with /search\n",
            query
        ));
    }

    fn disable_search_trigger(&mut self) {}

    fn remove_search_trigger(&mut self) {}
}

/// Ask a single question and exit
pub async fn run_once(
    config: ControllerConfig,
    gateway: &dyn Gateway,
    question: &str,
) -> anyhow::Result<()> {
    let mut controller = Controller::new(config, PlainSurface::one_shot(io::stdout()));
    ask_once(&mut controller, gateway, question).await
}

/// Run one primary turn; a failed backend call is returned instead of printed
async fn ask_once<W: Write>(
    controller: &mut Controller<PlainSurface<W>>,
    gateway: &dyn Gateway,
    question: &str,
) -> anyhow::Result<()> {
    let Some(request) = controller.dispatch(Command::Submit(question.to_string()))? else {
        return Ok(());
    };

    match request.send(gateway).await {
        Ok(reply) => {
            controller.resolve(Ok(reply))?;
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("{} request failed: {}", request.endpoint(), e)),
    }
}

/// Read questions and slash commands from stdin until EOF or /quit
pub async fn run_interactive(config: ControllerConfig, gateway: &dyn Gateway) -> anyhow::Result<()> {
    let mut controller = Controller::new(config, PlainSurface::new(io::stdout()));

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let ctx = CommandContext {
            languages: controller.languages(),
            suggestions: controller.active_suggestions(),
        };
        let command = match commands::execute_command(input, &ctx) {
            None => Command::Submit(input.to_string()),
            Some(CommandResult::Dispatch(command)) => command,
            Some(CommandResult::Message(msg)) => {
                println!("{}", msg);
                continue;
            }
            Some(CommandResult::OpenLanguagePicker) => {
                println!(
                    "{}",
                    LangCommand::list_languages_text(controller.language(), controller.languages())
                );
                continue;
            }
            Some(CommandResult::Exit) => break,
            Some(CommandResult::Unknown(cmd)) => {
                println!(
                    "Unknown command: /{}\nType /help for available commands.",
                    cmd
                );
                continue;
            }
        };

        if let Err(rejection) = controller.handle(command, gateway).await {
            if !rejection.is_silent() {
                println!("{}", rejection);
            }
        }
    }

    Ok(())
}
