//! Fallback controls: the FAQ suggestion list and the web-search offer

use crate::theme::Theme;
use guidechat_api::SuggestionSet;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Related questions the user can pick from
pub struct SuggestionList<'a> {
    suggestions: &'a SuggestionSet,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> SuggestionList<'a> {
    pub fn new(suggestions: &'a SuggestionSet, theme: &'a Theme) -> Self {
        Self {
            suggestions,
            selected: 0,
            theme,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    /// Rows the list needs, borders included
    pub fn height(suggestions: &SuggestionSet) -> u16 {
        suggestions.len() as u16 + 2
    }
}

impl Widget for SuggestionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Related questions · ↑↓ Enter ")
            .title_style(self.theme.accent_bold())
            .borders(Borders::ALL)
            .border_style(self.theme.accent_style());

        let lines: Vec<Line> = self
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let style = if i == self.selected {
                    self.theme.selected_style()
                } else {
                    self.theme.base_style()
                };
                Line::from(Span::styled(format!(" {}. {}", i + 1, question), style))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// One-line offer to search the web for an unanswered question
pub struct SearchOffer<'a> {
    query: &'a str,
    enabled: bool,
    theme: &'a Theme,
}

impl<'a> SearchOffer<'a> {
    pub fn new(query: &'a str, enabled: bool, theme: &'a Theme) -> Self {
        Self {
            query,
            enabled,
            theme,
        }
    }
}

impl Widget for SearchOffer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let line = if self.enabled {
            Line::from(vec![
                Span::styled(" Ctrl+G ", self.theme.accent_bold()),
                Span::styled(
                    format!("Search the web for \"{}\"", self.query),
                    self.theme.base_style(),
                ),
            ])
        } else {
            Line::from(Span::styled(
                format!(" Searching the web for \"{}\"", self.query),
                self.theme.dim_style(),
            ))
        };
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
