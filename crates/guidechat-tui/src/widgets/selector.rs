//! Selector popup widget for choosing from a list of options

use crate::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Maximum width for selector popups
const MAX_POPUP_WIDTH: u16 = 60;

/// Maximum height for selector popups
const MAX_POPUP_HEIGHT: u16 = 16;

/// An item in the selector
pub struct SelectorItem {
    pub label: String,
    /// Dimmed text after the label
    pub description: Option<String>,
    /// Whether this item is currently active
    pub is_current: bool,
}

/// A centered popup listing options, one highlighted
pub struct Selector<'a> {
    title: &'a str,
    items: Vec<SelectorItem>,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> Selector<'a> {
    pub fn new(title: &'a str, items: Vec<SelectorItem>, theme: &'a Theme) -> Self {
        let selected = items.iter().position(|item| item.is_current).unwrap_or(0);
        Self {
            title,
            items,
            selected,
            theme,
        }
    }

    /// Set the highlighted index
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = index.min(self.items.len().saturating_sub(1));
        self
    }

    fn popup_size(&self) -> (u16, u16) {
        let widest = self
            .items
            .iter()
            .map(|item| {
                item.label.width() + item.description.as_deref().map_or(0, |d| d.width() + 1) + 6
            })
            .max()
            .unwrap_or(0)
            .max(self.title.width() + 4);

        let width = (widest as u16).clamp(20, MAX_POPUP_WIDTH);
        let height = (self.items.len() as u16 + 2).min(MAX_POPUP_HEIGHT);
        (width, height)
    }

    /// Render the selector centered in the given area
    pub fn render_centered(&self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.popup_size();
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let popup = Rect::new(x, y, width.min(area.width), height.min(area.height));

        Clear.render(popup, buf);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| self.list_item(item, i == self.selected))
            .collect();

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(self.theme.accent_bold())
            .borders(Borders::ALL)
            .border_style(self.theme.accent_style());

        let list = List::new(items)
            .block(block)
            .highlight_spacing(HighlightSpacing::Always);

        let mut state = ListState::default();
        state.select(Some(self.selected));
        StatefulWidget::render(list, popup, buf, &mut state);
    }

    fn list_item(&self, item: &SelectorItem, is_selected: bool) -> ListItem<'static> {
        let prefix = if item.is_current { "● " } else { "  " };
        let style = if is_selected {
            self.theme.selected_style()
        } else if item.is_current {
            self.theme.accent_style()
        } else {
            self.theme.base_style()
        };

        let mut spans = vec![Span::styled(format!("{}{}", prefix, item.label), style)];
        if let Some(description) = &item.description {
            spans.push(Span::styled(format!(" {}", description), self.theme.dim_style()));
        }
        ListItem::new(Line::from(spans))
    }
}

/// Visibility and highlight of a popup or list
#[derive(Debug, Default)]
pub struct SelectorState {
    pub selected: usize,
    pub visible: bool,
}

impl SelectorState {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Move selection up, wrapping to the bottom
    pub fn up(&mut self, item_count: usize) {
        if item_count == 0 {
            return;
        }
        self.selected = if self.selected > 0 {
            self.selected - 1
        } else {
            item_count - 1
        };
    }

    /// Move selection down, wrapping to the top
    pub fn down(&mut self, item_count: usize) {
        if item_count == 0 {
            return;
        }
        self.selected = if self.selected + 1 < item_count {
            self.selected + 1
        } else {
            0
        };
    }
}
