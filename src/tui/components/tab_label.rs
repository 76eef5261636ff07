//! # TabLabel Component
//!
//! The title shown for a conversation in the tab strip. Labels are stored as
//! markup; [`TabLabel::set_text`] escapes its argument so it shows literally.
//! Long labels are ellipsized at the end to the width they're given.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::tui::component::Component;
use crate::tui::markup;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq)]
pub struct TabLabel {
    markup: String,
}

impl TabLabel {
    pub fn new(text: &str) -> Self {
        Self {
            markup: markup::escape(text),
        }
    }

    /// Show `markup` as-is (tags interpreted).
    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    /// Show `text` literally.
    pub fn set_text(&mut self, text: &str) {
        self.markup = markup::escape(text);
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Label text without markup.
    pub fn text(&self) -> String {
        markup::plain_text(&self.markup)
    }

    /// First line of the label, cut to `width` columns with a trailing `…`.
    pub fn ellipsized(&self, width: u16) -> Line<'static> {
        let text = markup::to_text(&self.markup, Style::default());
        let line = text.lines.into_iter().next().unwrap_or_default();
        ellipsize(line, width as usize)
    }
}

fn ellipsize(line: Line<'static>, width: usize) -> Line<'static> {
    if line.width() <= width {
        return line;
    }
    if width == 0 {
        return Line::default();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut last_style = Style::default();
    'outer: for span in line.spans {
        let mut kept = String::new();
        last_style = span.style;
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                if !kept.is_empty() {
                    spans.push(Span::styled(kept, span.style));
                }
                break 'outer;
            }
            used += w;
            kept.push(c);
        }
        spans.push(Span::styled(kept, span.style));
    }
    spans.push(Span::styled(ELLIPSIS.to_string(), last_style));
    Line::from(spans)
}

impl Component for TabLabel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.ellipsized(area.width)), area);
    }
}
