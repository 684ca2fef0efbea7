//! TUI implementation for guidechat

use crate::commands::{self, CommandContext, CommandResult};
use crossterm::event::EventStream;
use futures::{FutureExt, StreamExt, future::BoxFuture};
use guidechat_api::Gateway;
use guidechat_core::{Command, Controller, ControllerConfig, Message, Reply, Request, Transcript};
use guidechat_tui::{App, ChatView, Intent, input::{Action, event_to_action}};
use std::sync::Arc;
use std::time::Duration;

/// The backend call currently awaited
type PendingCall = BoxFuture<'static, guidechat_api::Result<Reply>>;

/// One turn of the event loop
enum Step {
    Resolved(guidechat_api::Result<Reply>),
    Event(Option<std::io::Result<crossterm::event::Event>>),
    Tick,
}

/// Run the TUI application
pub async fn run_tui(config: ControllerConfig, gateway: Arc<dyn Gateway>) -> anyhow::Result<()> {
    let view = ChatView::new(config.languages.clone(), config.language.clone());
    let mut controller = Controller::new(config, view);

    let mut app = App::new()?;
    let mut event_stream = EventStream::new();

    // Tick interval for animations (80ms for smooth spinner)
    let mut tick_interval = tokio::time::interval(Duration::from_millis(80));

    let mut pending: Option<PendingCall> = None;

    loop {
        app.draw(controller.surface_mut())?;
        let width = app.width()?;

        // The gateway call is polled alongside input, so the screen keeps
        // animating while a reply is outstanding
        let step = match pending.as_mut() {
            Some(call) => tokio::select! {
                biased;
                outcome = call => Step::Resolved(outcome),
                event = event_stream.next() => Step::Event(event),
                _ = tick_interval.tick() => Step::Tick,
            },
            None => tokio::select! {
                event = event_stream.next() => Step::Event(event),
                _ = tick_interval.tick() => Step::Tick,
            },
        };

        match step {
            Step::Resolved(outcome) => {
                pending = None;
                if let Err(rejection) = controller.resolve(outcome) {
                    tracing::warn!("reply dropped: {}", rejection);
                }
            }
            Step::Event(Some(Ok(event))) => {
                let Some(action) = event_to_action(event) else {
                    continue;
                };
                let Some(intent) = controller.surface_mut().handle_action(action, width) else {
                    continue;
                };
                let command = match intent {
                    Intent::Quit => break,
                    Intent::Command(command) => command,
                    Intent::Input(text) => match slash_command(&mut controller, &text) {
                        Flow::Dispatch(command) => command,
                        Flow::Continue => continue,
                        Flow::Exit => break,
                    },
                };
                if let Some(call) = dispatch(&mut controller, command, &gateway) {
                    pending = Some(call);
                }
            }
            Step::Event(Some(Err(e))) => {
                return Err(anyhow::anyhow!("Event error: {}", e));
            }
            Step::Event(None) => break,
            Step::Tick => {}
        }
    }

    Ok(())
}

enum Flow {
    Dispatch(Command),
    Continue,
    Exit,
}

/// Interpret typed text: a slash command, or a question to submit
fn slash_command(controller: &mut Controller<ChatView>, text: &str) -> Flow {
    let ctx = CommandContext {
        languages: controller.languages(),
        suggestions: controller.active_suggestions(),
    };
    let Some(result) = commands::execute_command(text, &ctx) else {
        return Flow::Dispatch(Command::Submit(text.to_string()));
    };

    let view = controller.surface_mut();
    match result {
        CommandResult::Dispatch(command) => return Flow::Dispatch(command),
        CommandResult::Message(msg) => view.append_message(&Message::system(msg)),
        CommandResult::OpenLanguagePicker => {
            view.handle_action(Action::LanguageSelect, 0);
        }
        CommandResult::Exit => return Flow::Exit,
        CommandResult::Unknown(cmd) => view.append_message(&Message::system(format!(
            "Unknown command: /{}\nType /help for available commands.",
            cmd
        ))),
    }
    Flow::Continue
}

/// Apply a command; returns the backend call to start, if any
fn dispatch(
    controller: &mut Controller<ChatView>,
    command: Command,
    gateway: &Arc<dyn Gateway>,
) -> Option<PendingCall> {
    let result = controller.dispatch(command);
    let language = controller.language().clone();
    let view = controller.surface_mut();
    view.set_language(language);

    match result {
        Ok(request) => request.map(|request| start_call(request, gateway.clone())),
        Err(rejection) => {
            if !rejection.is_silent() {
                view.set_status(rejection.to_string());
            }
            None
        }
    }
}

fn start_call(request: Request, gateway: Arc<dyn Gateway>) -> PendingCall {
    async move { request.send(gateway.as_ref()).await }.boxed()
}
