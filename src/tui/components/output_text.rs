//! # OutputText Component
//!
//! Read-only conversation history. Only programmatic `put_text` writes reach
//! the buffer; editing events are ignored and scroll events move the view.

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_box::TextBox;
use crate::tui::event::TuiEvent;
use crate::tui::rich_buffer::TextFormat;

pub struct OutputText {
    text_box: TextBox,
}

impl Default for OutputText {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputText {
    pub fn new() -> Self {
        let mut text_box = TextBox::new();
        text_box.set_editable(false);
        Self { text_box }
    }

    /// Append `text` at the end with `format`.
    pub fn put_text(&mut self, text: &str, format: &TextFormat) {
        self.text_box.buffer_mut().put_text(text, format);
    }

    pub fn text(&self) -> String {
        self.text_box.text()
    }

    pub fn clear(&mut self) {
        self.text_box.clear();
    }

    pub fn is_editable(&self) -> bool {
        self.text_box.is_editable()
    }

    pub fn is_pinned(&self) -> bool {
        self.text_box.is_pinned()
    }
}

impl Component for OutputText {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.text_box.render(frame, area);
    }
}

impl EventHandler for OutputText {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace => None,
            _ => self.text_box.handle_event(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::Modifier;

    #[test]
    fn test_output_is_read_only() {
        let mut output = OutputText::new();
        assert!(!output.is_editable());

        output.handle_event(&TuiEvent::InputChar('x'));
        output.handle_event(&TuiEvent::Paste("pasted".to_string()));
        assert_eq!(output.text(), "");
    }

    #[test]
    fn test_put_text_appends() {
        let mut output = OutputText::new();
        output.put_text("Ana: ", &TextFormat::bold());
        output.put_text("hi\n", &TextFormat::default());
        assert_eq!(output.text(), "Ana: hi\n");

        output.clear();
        assert_eq!(output.text(), "");
    }

    #[test]
    fn test_render_applies_bold_label() {
        let backend = TestBackend::new(30, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut output = OutputText::new();
        output.put_text("Ana: ", &TextFormat::bold());
        output.put_text("hi\n", &TextFormat::default());

        terminal.draw(|f| output.render(f, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Ana: hi"));
        // "A" of the label sits just inside the top-left border
        assert!(buffer[(1, 1)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_scroll_events_reach_text_box() {
        let mut output = OutputText::new();
        output.handle_event(&TuiEvent::ScrollUp);
        assert!(!output.is_pinned());
    }
}
