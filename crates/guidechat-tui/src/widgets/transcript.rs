//! Transcript widget for displaying the conversation

use crate::theme::Theme;
use crate::widgets::spinner::spinner_frame;
use guidechat_core::{Message, Role, Segment, format_reply, parse_markup};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::time::Instant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Left padding of message bodies
const INDENT: &str = "  ";

/// Widget for displaying transcript entries and the typing indicator
pub struct TranscriptView<'a> {
    messages: &'a [Message],
    typing: Option<Instant>,
    theme: &'a Theme,
    scroll: usize,
}

impl<'a> TranscriptView<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            typing: None,
            theme,
            scroll: 0,
        }
    }

    /// Show the typing indicator, animated from `since`
    pub fn typing(mut self, since: Option<Instant>) -> Self {
        self.typing = since;
        self
    }

    /// Set scroll offset
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let visible: Vec<Line> = transcript_lines(
            self.messages,
            self.typing,
            area.width as usize,
            self.theme,
        )
        .into_iter()
        .skip(self.scroll)
        .take(area.height as usize)
        .collect();

        Paragraph::new(visible).render(area, buf);
    }
}

/// Total rendered height of a transcript at `width` columns
pub fn transcript_height(messages: &[Message], typing: bool, width: usize) -> usize {
    let since = typing.then(Instant::now);
    transcript_lines(messages, since, width, &Theme::dark()).len()
}

/// Lay out every entry into display lines
pub fn transcript_lines(
    messages: &[Message],
    typing: Option<Instant>,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        lines.extend(message_lines(message, width, theme));
    }
    if let Some(since) = typing {
        lines.push(header(Role::Assistant, theme));
        lines.push(Line::from(Span::styled(
            format!("{INDENT}{} typing...", spinner_frame(since)),
            theme.dim_style(),
        )));
        lines.push(Line::from(""));
    }
    lines
}

fn header(role: Role, theme: &Theme) -> Line<'static> {
    let text = match role {
        Role::User => "▶ You",
        Role::Assistant => "◀ Assistant",
        Role::System => "● System",
    };
    Line::from(Span::styled(text, theme.role_style(role)))
}

fn message_lines(message: &Message, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![header(message.role, theme)];
    let content_width = width.saturating_sub(INDENT.len()).max(1);
    let style = theme.body_style(message.role);

    if message.role == Role::Assistant {
        // Replies carry bold headings and line breaks
        for markup_line in parse_markup(&format_reply(&message.text)) {
            for row in wrap_segments(&markup_line, content_width) {
                let mut spans = vec![Span::raw(INDENT)];
                spans.extend(row.into_iter().map(|segment| {
                    let style = if segment.bold {
                        style.add_modifier(Modifier::BOLD)
                    } else {
                        style
                    };
                    Span::styled(segment.text, style)
                }));
                lines.push(Line::from(spans));
            }
        }
    } else {
        for line in message.text.split('\n') {
            if line.is_empty() {
                lines.push(Line::from(""));
                continue;
            }
            for wrapped in textwrap::wrap(line, content_width) {
                lines.push(Line::from(Span::styled(
                    format!("{INDENT}{wrapped}"),
                    style,
                )));
            }
        }
    }

    // Empty line between messages
    lines.push(Line::from(""));
    lines
}

/// Word-wrap one line of styled segments to `width` columns.
///
/// Words wider than the line are broken between characters.
pub fn wrap_segments(segments: &[Segment], width: usize) -> Vec<Vec<Segment>> {
    let mut wrapper = SegmentWrapper {
        width: width.max(1),
        rows: vec![Vec::new()],
        used: 0,
    };
    for segment in segments {
        for word in segment.text.split_inclusive(' ') {
            wrapper.word(word, segment.bold);
        }
    }
    wrapper.rows
}

struct SegmentWrapper {
    width: usize,
    rows: Vec<Vec<Segment>>,
    used: usize,
}

impl SegmentWrapper {
    fn word(&mut self, word: &str, bold: bool) {
        let visible = word.trim_end_matches(' ').width();
        if self.used > 0 && self.used + visible > self.width {
            self.break_line();
        }

        if visible <= self.width {
            self.push(word, bold);
            self.used += word.width();
            return;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if self.used > 0 && self.used + ch_width > self.width {
                self.break_line();
            }
            let mut buf = [0u8; 4];
            self.push(ch.encode_utf8(&mut buf), bold);
            self.used += ch_width;
        }
    }

    fn break_line(&mut self) {
        self.rows.push(Vec::new());
        self.used = 0;
    }

    fn push(&mut self, text: &str, bold: bool) {
        let Some(row) = self.rows.last_mut() else {
            return;
        };
        match row.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(text),
            _ => row.push(Segment {
                text: text.to_string(),
                bold,
            }),
        }
    }
}

#[cfg(test)]
pub(crate) fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
fn line_has_bold(line: &Line<'_>) -> bool {
    line.spans
        .iter()
        .any(|s| s.style.add_modifier.contains(Modifier::BOLD))
}
