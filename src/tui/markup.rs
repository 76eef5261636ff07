//! # Markup
//!
//! A small subset of Pango-style markup, enough for header and tab labels:
//!
//! - `<b>…</b>`, `<i>…</i>`
//! - `<span size="small">…</span>` (rendered dim, terminals have one font size)
//! - entities `&amp; &lt; &gt; &quot; &apos;`
//!
//! Unknown tags are dropped; their content is kept. Text coming from contacts
//! must pass through [`escape`] before being substituted into a template.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Escape `& < > " '` so `text` renders literally inside markup.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Undo [`escape`]. Unknown entities are kept verbatim.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let entity = rest.find(';').map(|end| (&rest[..=end], end));
        let decoded = entity.and_then(|(e, end)| {
            let c = match e {
                "&amp;" => '&',
                "&lt;" => '<',
                "&gt;" => '>',
                "&quot;" => '"',
                "&apos;" => '\'',
                _ => return None,
            };
            Some((c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Style pushed by an opening tag.
fn tag_style(tag: &str) -> Style {
    let name = tag.split_whitespace().next().unwrap_or("");
    match name {
        "b" => Style::default().add_modifier(Modifier::BOLD),
        "i" => Style::default().add_modifier(Modifier::ITALIC),
        "u" => Style::default().add_modifier(Modifier::UNDERLINED),
        "s" => Style::default().add_modifier(Modifier::CROSSED_OUT),
        "span" | "small" if tag.contains("small") || name == "small" => {
            Style::default().add_modifier(Modifier::DIM)
        }
        _ => Style::default(),
    }
}

/// Parse markup into styled lines, patching each span onto `base`.
pub fn to_text(markup: &str, base: Style) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut stack: Vec<Style> = vec![base];
    let mut rest = markup;

    let flush_text = |text: &str, style: Style, lines: &mut Vec<Line<'static>>, current: &mut Vec<Span<'static>>| {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next()
            && !first.is_empty()
        {
            current.push(Span::styled(unescape(first), style));
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(current)));
            if !part.is_empty() {
                current.push(Span::styled(unescape(part), style));
            }
        }
    };

    while !rest.is_empty() {
        let style = stack.last().copied().unwrap_or(base);
        match rest.find('<') {
            Some(open) => {
                flush_text(&rest[..open], style, &mut lines, &mut current);
                let Some(close) = rest[open..].find('>') else {
                    // Unterminated tag: treat the remainder as text
                    flush_text(&rest[open..], style, &mut lines, &mut current);
                    break;
                };
                let tag = &rest[open + 1..open + close];
                if tag.starts_with('/') {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                } else {
                    stack.push(style.patch(tag_style(tag)));
                }
                rest = &rest[open + close + 1..];
            }
            None => {
                flush_text(rest, style, &mut lines, &mut current);
                break;
            }
        }
    }
    lines.push(Line::from(current));
    Text::from(lines)
}

/// Plain text content of `markup`, tags removed and entities decoded.
pub fn plain_text(markup: &str) -> String {
    to_text(markup, Style::default())
        .lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
