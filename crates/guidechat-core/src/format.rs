//! Reply formatting
//!
//! Assistant replies arrive as plain text with a few `**` bold markers. They
//! are turned into a tiny markup (`<b>`, `</b>`, `<br>`) that every host can
//! render. The backend is trusted, so nothing else is escaped.

const BOLD_OPEN: &str = "<b>";
const BOLD_CLOSE: &str = "</b>";
const LINE_BREAK: &str = "<br>";

/// Section headings the backend emphasises with `**`
const HEADINGS: &[&str] = &["Challenges:", "Solutions:"];

/// Convert a raw reply into display markup.
pub fn format_reply(raw: &str) -> String {
    let mut out = raw.to_string();
    for heading in HEADINGS {
        out = out.replace(
            &format!("**{heading}**"),
            &format!("{BOLD_OPEN}{heading}{BOLD_CLOSE}"),
        );
    }
    out.replace("**", "").replace('\n', LINE_BREAK)
}

/// A run of text with uniform emphasis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub bold: bool,
}

/// Split formatter markup into lines of segments.
///
/// Only the tags produced by [`format_reply`] are interpreted; anything else
/// that looks like a tag is kept as literal text.
pub fn parse_markup(markup: &str) -> Vec<Vec<Segment>> {
    let mut lines = vec![Vec::new()];
    let mut bold = false;
    let mut rest = markup;

    while !rest.is_empty() {
        let (tag, len) = if rest.starts_with(LINE_BREAK) {
            (Some(LINE_BREAK), LINE_BREAK.len())
        } else if rest.starts_with(BOLD_OPEN) {
            (Some(BOLD_OPEN), BOLD_OPEN.len())
        } else if rest.starts_with(BOLD_CLOSE) {
            (Some(BOLD_CLOSE), BOLD_CLOSE.len())
        } else {
            // Plain text up to the next '<' after the first character
            let first = rest.chars().next().map_or(1, char::len_utf8);
            let end = rest[first..]
                .find('<')
                .map(|i| i + first)
                .unwrap_or(rest.len());
            (None, end)
        };

        match tag {
            Some(LINE_BREAK) => lines.push(Vec::new()),
            Some(BOLD_OPEN) => bold = true,
            Some(_) => bold = false,
            None => push_text(lines.last_mut(), &rest[..len], bold),
        }
        rest = &rest[len..];
    }

    lines
}

/// Markup with tags removed and line breaks restored, for plain hosts
pub fn markup_to_plain(markup: &str) -> String {
    parse_markup(markup)
        .iter()
        .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(line: Option<&mut Vec<Segment>>, text: &str, bold: bool) {
    let Some(line) = line else { return };
    match line.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => line.push(Segment {
            text: text.to_string(),
            bold,
        }),
    }
}
