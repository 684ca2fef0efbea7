//! Color theme support

use guidechat_core::Role;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for the chat surface
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (user turns, highlights)
    pub accent: Color,
    /// Assistant turns
    pub assistant: Color,
    /// System notices
    pub system: Color,
    pub error: Color,
    pub border: Color,
    /// Highlighted suggestion background
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            assistant: Color::Green,
            system: Color::Yellow,
            error: Color::Red,
            border: Color::DarkGray,
            selection_bg: Color::DarkGray,
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn accent_bold(&self) -> Style {
        self.accent_style().add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style of a highlighted list row
    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Header style for a transcript entry
    pub fn role_style(&self, role: Role) -> Style {
        match role {
            Role::User => self.accent_bold(),
            Role::Assistant => Style::default()
                .fg(self.assistant)
                .add_modifier(Modifier::BOLD),
            Role::System => Style::default().fg(self.system),
        }
    }

    /// Body style for a transcript entry
    pub fn body_style(&self, role: Role) -> Style {
        match role {
            Role::System => Style::default().fg(self.system),
            Role::User | Role::Assistant => self.base_style(),
        }
    }
}
