//! Terminal chat surface
//!
//! [`ChatView`] is what the controller draws into. It implements the surface
//! traits over plain in-memory state and renders that state each frame; key
//! presses are turned into [`Intent`]s for the host to act on.

use crate::input::Action;
use crate::theme::Theme;
use crate::widgets::{
    InputBox, SearchOffer, Selector, SelectorItem, SelectorState, Spinner, SuggestionList,
    TranscriptView, transcript::transcript_height,
};
use guidechat_api::{LanguageCode, SuggestionSet};
use guidechat_core::{
    Command, InputGate, LanguageCatalog, Message, SearchTrigger, SuggestionPanel, Transcript,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::time::Instant;

/// What the user asked for, as far as the view can tell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Text entered in the input box; may be a question or a slash command
    Input(String),
    /// A direct controller command (suggestion pick, search, language, clear)
    Command(Command),
    Quit,
}

/// Scroll offset meaning "follow the newest entry"
const FOLLOW: usize = usize::MAX;

pub struct ChatView {
    messages: Vec<Message>,
    typing_since: Option<Instant>,
    busy_since: Option<Instant>,
    input: InputBox,
    suggestions: Option<SuggestionSet>,
    highlight: SelectorState,
    search: Option<SearchTrigger>,
    scroll: usize,
    /// Transcript rows visible in the last frame
    page: usize,
    languages: LanguageCatalog,
    language: LanguageCode,
    language_picker: SelectorState,
    status: String,
    theme: Theme,
}

impl ChatView {
    pub fn new(languages: LanguageCatalog, language: LanguageCode) -> Self {
        Self {
            messages: Vec::new(),
            typing_since: None,
            busy_since: None,
            input: InputBox::new()
                .with_placeholder("Type your question...")
                .with_locked_placeholder("Waiting for a reply..."),
            suggestions: None,
            highlight: SelectorState::default(),
            search: None,
            scroll: FOLLOW,
            page: 0,
            languages,
            language,
            language_picker: SelectorState::default(),
            status: "Ready".to_string(),
            theme: Theme::dark(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn suggestions(&self) -> Option<&SuggestionSet> {
        self.suggestions.as_ref()
    }

    pub fn search_trigger(&self) -> Option<&SearchTrigger> {
        self.search.as_ref()
    }

    pub fn is_typing(&self) -> bool {
        self.typing_since.is_some()
    }

    pub fn is_locked(&self) -> bool {
        !self.input.is_enabled()
    }

    pub fn input(&self) -> &str {
        self.input.content()
    }

    /// Shown in the status bar until replaced
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Language shown in the title and preselected in the picker
    pub fn set_language(&mut self, language: LanguageCode) {
        self.language = language;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll = FOLLOW;
    }

    fn highlighted_suggestion(&self) -> Option<String> {
        self.suggestions
            .as_ref()
            .and_then(|set| set.get(self.highlight.selected))
            .map(str::to_string)
    }

    /// Map an input action to an intent, applying purely visual effects directly
    pub fn handle_action(&mut self, action: Action, width: u16) -> Option<Intent> {
        if self.language_picker.visible {
            return self.handle_picker_action(action);
        }

        match action {
            Action::Interrupt | Action::Quit | Action::Escape => Some(Intent::Quit),
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.page.max(1));
                None
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(self.page.max(1));
                None
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(3);
                None
            }
            Action::ScrollDown => {
                self.scroll = self.scroll.saturating_add(3);
                None
            }
            Action::LanguageSelect => {
                self.language_picker.selected =
                    self.languages.position(&self.language).unwrap_or(0);
                self.language_picker.show();
                None
            }
            Action::Clear => Some(Intent::Command(Command::Clear)),
            Action::SearchWeb => match &self.search {
                Some(trigger) if trigger.enabled => Some(Intent::Command(Command::TriggerSearch)),
                _ => {
                    self.status = "No web search on offer".to_string();
                    None
                }
            },
            Action::Up | Action::Down => {
                if let Some(count) = self.suggestions.as_ref().map(SuggestionSet::len) {
                    if action == Action::Up {
                        self.highlight.up(count);
                    } else {
                        self.highlight.down(count);
                    }
                }
                None
            }
            Action::Submit => {
                if self.is_locked() {
                    None
                } else if self.input.is_empty() {
                    self.highlighted_suggestion()
                        .map(|q| Intent::Command(Command::SelectSuggestion(q)))
                } else {
                    Some(Intent::Input(self.input.take()))
                }
            }
            other => {
                self.input.handle_action(&other, width);
                None
            }
        }
    }

    fn handle_picker_action(&mut self, action: Action) -> Option<Intent> {
        match action {
            Action::Up => self.language_picker.up(self.languages.len()),
            Action::Down => self.language_picker.down(self.languages.len()),
            Action::Submit => {
                self.language_picker.hide();
                return self
                    .languages
                    .get(self.language_picker.selected)
                    .map(|l| Intent::Command(Command::SetLanguage(l.code.clone())));
            }
            Action::Escape | Action::LanguageSelect => self.language_picker.hide(),
            Action::Interrupt | Action::Quit => return Some(Intent::Quit),
            _ => {}
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let mut constraints = vec![Constraint::Min(1)];
        if let Some(set) = &self.suggestions {
            constraints.push(Constraint::Length(SuggestionList::height(set)));
        }
        if self.search.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Status
        constraints.push(Constraint::Length(3)); // Input

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(size);

        let mut next = 0;
        let mut area = || {
            let rect = chunks[next];
            next += 1;
            rect
        };

        let transcript_area = area();
        self.render_transcript(frame, transcript_area);

        if let Some(set) = &self.suggestions {
            let list = SuggestionList::new(set, &self.theme).selected(self.highlight.selected);
            frame.render_widget(list, area());
        }
        if let Some(trigger) = &self.search {
            let offer = SearchOffer::new(&trigger.query, trigger.enabled, &self.theme);
            frame.render_widget(offer, area());
        }

        let status_area = area();
        self.render_status(frame, status_area);

        let input_area = area();
        self.input.render(input_area, frame.buffer_mut(), &self.theme);

        if self.language_picker.visible {
            self.render_language_picker(frame, size);
        }
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let language = self
            .languages
            .find(&self.language)
            .map_or(self.language.as_str(), |l| l.name.as_str());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(format!(" guidechat │ {} ", language));

        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let content_height =
            transcript_height(&self.messages, self.is_typing(), inner.width as usize);
        let max_scroll = content_height.saturating_sub(inner.height as usize);
        self.scroll = self.scroll.min(max_scroll);
        self.page = inner.height as usize;

        let view = TranscriptView::new(&self.messages, &self.theme)
            .typing(self.typing_since)
            .scroll(self.scroll);
        frame.render_widget(view, inner);

        if content_height > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut scrollbar_state = ScrollbarState::new(content_height)
                .position(self.scroll)
                .viewport_content_length(inner.height as usize);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if let Some(since) = self.busy_since {
            let spinner = Spinner::new("Waiting for reply...", &self.theme).with_start_time(since);
            frame.render_widget(spinner, area);
            return;
        }

        let hints = if self.search.is_some() {
            "Ctrl+G: search │ Ctrl+K: language │ Ctrl+L: clear │ Ctrl+C: quit"
        } else {
            "Ctrl+K: language │ Ctrl+L: clear │ Ctrl+C: quit"
        };

        let left_width = self.status.chars().count();
        let right_width = hints.chars().count();
        let available = area.width as usize;

        let line = if left_width + right_width + 2 <= available {
            Line::from(vec![
                Span::styled(self.status.as_str(), self.theme.dim_style()),
                Span::raw(" ".repeat(available - left_width - right_width)),
                Span::styled(hints, self.theme.dim_style()),
            ])
        } else {
            Line::from(Span::styled(self.status.as_str(), self.theme.dim_style()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_language_picker(&self, frame: &mut Frame, area: Rect) {
        let items = self
            .languages
            .iter()
            .map(|l| SelectorItem {
                label: l.name.clone(),
                description: Some(l.code.to_string()),
                is_current: l.code == self.language,
            })
            .collect();

        Selector::new("Language", items, &self.theme)
            .with_selected(self.language_picker.selected)
            .render_centered(area, frame.buffer_mut());
    }
}

impl Transcript for ChatView {
    fn append_message(&mut self, message: &Message) {
        self.messages.push(message.clone());
        self.scroll_to_bottom();
    }

    fn append_typing(&mut self) {
        if self.typing_since.is_none() {
            self.typing_since = Some(Instant::now());
        }
        self.scroll_to_bottom();
    }

    fn remove_typing(&mut self) {
        self.typing_since = None;
    }

    fn clear(&mut self, first: &Message) {
        self.messages = vec![first.clone()];
        self.typing_since = None;
        self.suggestions = None;
        self.search = None;
        self.scroll_to_bottom();
    }
}

impl InputGate for ChatView {
    fn lock(&mut self) {
        self.input.set_enabled(false);
        self.busy_since = Some(Instant::now());
    }

    fn unlock(&mut self) {
        self.input.set_enabled(true);
        self.busy_since = None;
        self.status = "Ready".to_string();
    }
}

impl SuggestionPanel for ChatView {
    fn show_suggestions(&mut self, suggestions: &SuggestionSet) {
        self.suggestions = Some(suggestions.clone());
        self.highlight = SelectorState::default();
        self.scroll_to_bottom();
    }

    fn dismiss_suggestions(&mut self) {
        self.suggestions = None;
    }

    fn show_search_trigger(&mut self, query: &str) {
        self.search = Some(SearchTrigger::new(query));
    }

    fn disable_search_trigger(&mut self) {
        if let Some(trigger) = self.search.as_mut() {
            trigger.enabled = false;
        }
    }

    fn remove_search_trigger(&mut self) {
        self.search = None;
    }
}
