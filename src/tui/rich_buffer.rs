//! # Rich Buffer
//!
//! Text storage with per-run style attributes. Runs are appended with
//! [`RichBuffer::put_text`]; the whole contents can be read back as plain
//! text or as styled ratatui lines.
//!
//! Font family, font name and size are stored but have no terminal
//! rendering; color, weight and decorations map onto ratatui modifiers.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Formatting axes accepted by [`RichBuffer::put_text`]. `None`/`false`
/// means "inherit the default".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextFormat {
    /// `#rrggbb`
    pub color: Option<String>,
    pub family: Option<String>,
    pub font: Option<String>,
    pub size: Option<u16>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
}

impl TextFormat {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    /// Terminal style for this format.
    pub fn style(&self) -> Style {
        let mut style = Style::default();
        if let Some(color) = self.color.as_deref().and_then(parse_hex_color) {
            style = style.fg(color);
        }
        let flags = [
            (self.bold, Modifier::BOLD),
            (self.italic, Modifier::ITALIC),
            (self.underline, Modifier::UNDERLINED),
            (self.strike, Modifier::CROSSED_OUT),
        ];
        for (enabled, modifier) in flags {
            if enabled {
                style = style.add_modifier(modifier);
            }
        }
        style
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    crate::core::message::Color::from_hex(hex).map(|c| Color::Rgb(c.red, c.green, c.blue))
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    format: TextFormat,
}

#[derive(Debug, Clone, Default)]
pub struct RichBuffer {
    runs: Vec<Run>,
}

impl RichBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` at the end with `format`.
    pub fn put_text(&mut self, text: &str, format: &TextFormat) {
        if text.is_empty() {
            return;
        }
        // Coalesce with the previous run when the format matches
        if let Some(last) = self.runs.last_mut()
            && last.format == *format
        {
            last.text.push_str(text);
            return;
        }
        self.runs.push(Run {
            text: text.to_string(),
            format: format.clone(),
        });
    }

    /// Append unformatted text.
    pub fn insert_at_end(&mut self, text: &str) {
        self.put_text(text, &TextFormat::default());
    }

    /// Replace the whole contents with unformatted `text`.
    pub fn set_text(&mut self, text: &str) {
        self.runs.clear();
        self.insert_at_end(text);
    }

    /// Full contents as plain text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Styled lines, split on `\n`. A trailing newline yields an empty last line.
    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let mut current: Vec<Span<'static>> = Vec::new();
        for run in &self.runs {
            let style = run.format.style();
            let mut parts = run.text.split('\n');
            if let Some(first) = parts.next()
                && !first.is_empty()
            {
                current.push(Span::styled(first.to_string(), style));
            }
            for part in parts {
                lines.push(Line::from(std::mem::take(&mut current)));
                if !part.is_empty() {
                    current.push(Span::styled(part.to_string(), style));
                }
            }
        }
        lines.push(Line::from(current));
        lines
    }
}
