//! guidechat-tui: Terminal chat surface
//!
//! Widgets and a [`ChatView`] surface for the guidechat controller, built on
//! ratatui and crossterm.

pub mod app;
pub mod chat_view;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use chat_view::{ChatView, Intent};
pub use theme::Theme;
