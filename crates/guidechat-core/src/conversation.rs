//! Conversation state: transcript entries, active language, fallback controls.

use guidechat_api::{LanguageCode, SuggestionSet};
use std::fmt;

/// Who a transcript entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }
}

/// Where the controller is in its turn cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingPrimary,
    AwaitingFaq,
    AwaitingSearch,
}

impl Phase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }
}

/// One-shot control that escalates an unanswered question to web search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTrigger {
    pub query: String,
    pub enabled: bool,
}

impl SearchTrigger {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            enabled: true,
        }
    }
}

/// Per-widget conversation state, owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Language sent with every request
    pub language: LanguageCode,
    /// Whether a backend call is in flight
    pub pending: bool,
    /// The suggestion set currently on screen, if any
    pub active_suggestions: Option<SuggestionSet>,
}

impl ConversationState {
    pub fn new(language: LanguageCode) -> Self {
        Self {
            language,
            pending: false,
            active_suggestions: None,
        }
    }
}
