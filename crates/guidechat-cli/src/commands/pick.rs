//! /pick command - ask one of the suggested questions

use super::CommandResult;
use guidechat_api::SuggestionSet;
use guidechat_core::Command;

pub struct PickCommand;

impl PickCommand {
    /// Pick suggestion `args` (1-based) from the panel on offer
    pub fn execute(args: &str, suggestions: Option<&SuggestionSet>) -> CommandResult {
        let Some(suggestions) = suggestions else {
            return CommandResult::Message("No suggested questions to pick from".to_string());
        };

        let question = args
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| suggestions.get(i));

        match question {
            Some(question) => {
                CommandResult::Dispatch(Command::SelectSuggestion(question.to_string()))
            }
            None => CommandResult::Message(format!(
                "Pick a number between 1 and {}",
                suggestions.len()
            )),
        }
    }
}
