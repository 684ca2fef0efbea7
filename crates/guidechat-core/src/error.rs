//! Error types for guidechat-core

use guidechat_api::LanguageCode;
use thiserror::Error;

/// Result type alias for command dispatch
pub type Result<T> = std::result::Result<T, Rejection>;

/// Why a command was refused. A rejected command changes nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The question was empty after trimming
    #[error("question is empty")]
    EmptyQuestion,

    /// A request is already in flight
    #[error("still waiting for the previous reply")]
    Busy,

    /// The chosen suggestion is not part of the panel on screen
    #[error("no such suggestion: {0}")]
    UnknownSuggestion(String),

    /// There is no enabled search trigger to fire
    #[error("no web search is on offer")]
    NoSearchTrigger,

    /// The language is not in the configured list
    #[error("unknown language: {0}")]
    UnknownLanguage(LanguageCode),

    /// A reply arrived while nothing was awaited
    #[error("no request is in flight")]
    NotAwaiting,
}

impl Rejection {
    /// Whether the host should tell the user about this rejection.
    ///
    /// Empty input is silently ignored.
    pub fn is_silent(&self) -> bool {
        matches!(self, Rejection::EmptyQuestion)
    }
}
