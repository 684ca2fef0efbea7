//! Custom widgets for the chat surface

pub mod input_box;
pub mod selector;
pub mod spinner;
pub mod suggestions;
pub mod transcript;

pub use input_box::InputBox;
pub use selector::{Selector, SelectorItem, SelectorState};
pub use spinner::Spinner;
pub use suggestions::{SearchOffer, SuggestionList};
pub use transcript::TranscriptView;
