//! guidechat-core: Conversation controller for the guidechat client
//!
//! This crate owns the turn-taking state machine of a guideline Q&A chat:
//! primary questions, FAQ fallback suggestions, and web-search escalation.
//! Rendering is delegated to a host through the [`Surface`] traits.

pub mod command;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod format;
pub mod language;
pub mod surface;

pub use command::{Command, Reply, Request};
pub use controller::{Controller, ControllerConfig, DEFAULT_GREETING};
pub use conversation::{ConversationState, Message, Phase, Role, SearchTrigger};
pub use error::{Rejection, Result};
pub use format::{Segment, format_reply, markup_to_plain, parse_markup};
pub use language::{Language, LanguageCatalog};
pub use surface::{InputGate, SuggestionPanel, Surface, Transcript};
