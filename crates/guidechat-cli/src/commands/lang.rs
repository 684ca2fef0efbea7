//! /lang command - list and switch languages

use super::CommandResult;
use guidechat_api::LanguageCode;
use guidechat_core::{Command, Language, LanguageCatalog};

pub struct LangCommand;

impl LangCommand {
    /// Opens the picker with no args, or switches to the matching language
    pub fn execute(args: &str, languages: &LanguageCatalog) -> CommandResult {
        if args.is_empty() {
            return CommandResult::OpenLanguagePicker;
        }

        match find_language(args, languages) {
            Some(language) => CommandResult::Dispatch(Command::SetLanguage(language.code.clone())),
            None => CommandResult::Message(format!(
                "No language found matching '{}'\nUse /lang to list available languages",
                args
            )),
        }
    }

    /// List languages as text (for line mode)
    pub fn list_languages_text(current: &LanguageCode, languages: &LanguageCatalog) -> String {
        let mut output = String::from("Available languages:\n");
        for language in languages.iter() {
            let marker = if &language.code == current { " *" } else { "" };
            output.push_str(&format!("  {:<4}{}{}\n", language.code, language.name, marker));
        }
        output.push_str("\nSwitch with: /lang <code>");
        output
    }
}

/// Exact code match first, then a case-insensitive name prefix
fn find_language<'a>(query: &str, languages: &'a LanguageCatalog) -> Option<&'a Language> {
    let query = query.to_lowercase();

    if let Some(language) = languages.iter().find(|l| l.code.as_str().to_lowercase() == query) {
        return Some(language);
    }

    languages
        .iter()
        .find(|l| l.name.to_lowercase().starts_with(&query))
}
