//! Capability interface between the controller and whatever draws the chat.
//!
//! The controller never touches a terminal or a DOM directly; it calls these
//! traits, which keeps the state machine testable with a recording fake.

use crate::conversation::Message;
use guidechat_api::SuggestionSet;

/// The ordered, append-only view of the conversation
pub trait Transcript {
    /// Append an entry and scroll to it
    fn append_message(&mut self, message: &Message);

    /// Show the "assistant is typing" indicator
    fn append_typing(&mut self);

    /// Remove the typing indicator. Must be a no-op when none is shown.
    fn remove_typing(&mut self);

    /// Reset the transcript so that `first` is its only entry
    fn clear(&mut self, first: &Message);
}

/// Enables and disables text entry and the send/clear controls
pub trait InputGate {
    fn lock(&mut self);
    fn unlock(&mut self);
}

/// Fallback controls: the FAQ suggestion panel and the web-search trigger
pub trait SuggestionPanel {
    /// Replace any visible panel with one option per question, in order
    fn show_suggestions(&mut self, suggestions: &SuggestionSet);

    /// Remove the panel, if any
    fn dismiss_suggestions(&mut self);

    /// Offer a web search for `query`
    fn show_search_trigger(&mut self, query: &str);

    /// Grey out the search trigger so it cannot fire twice
    fn disable_search_trigger(&mut self);

    /// Remove the search trigger, if any
    fn remove_search_trigger(&mut self);
}

/// Everything a host must provide to run a controller
pub trait Surface: Transcript + InputGate + SuggestionPanel {}

impl<T: Transcript + InputGate + SuggestionPanel> Surface for T {}
