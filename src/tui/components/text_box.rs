//! # TextBox Component
//!
//! A bordered, word-wrapped, vertically scrolling text surface over a
//! [`RichBuffer`]. It is the shared base of `InputText` and `OutputText`,
//! which own a `TextBox` rather than extend one.
//!
//! ## Contents
//!
//! - `set_text` always overwrites, `text` always returns the full span, so
//!   `set_text(x)` followed by `text()` returns exactly `x`.
//! - `append` inserts at the end, `clear` empties.
//!
//! ## Scrolling
//!
//! The box starts pinned to the bottom: new content scrolls into view until
//! the user scrolls up. Scrolling back to the end re-pins it, the same rule
//! the chat history uses.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::rich_buffer::RichBuffer;

/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Left + right borders, plus one column reserved for the scrollbar
pub(super) const HORIZONTAL_OVERHEAD: u16 = 3;

pub struct TextBox {
    buffer: RichBuffer,
    editable: bool,
    style: Style,
    scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    stick_to_bottom: bool,
    /// Wrapped content height from the last render
    content_height: u16,
    /// Inner height from the last render (for scroll clamping between frames)
    viewport_height: u16,
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBox {
    pub fn new() -> Self {
        Self {
            buffer: RichBuffer::new(),
            editable: true,
            style: Style::default(),
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn buffer(&self) -> &RichBuffer {
        &self.buffer
    }

    /// Mutable access for styled writes.
    pub fn buffer_mut(&mut self) -> &mut RichBuffer {
        &mut self.buffer
    }

    /// Empty the box.
    pub fn clear(&mut self) {
        self.buffer.set_text("");
        self.scroll_state.set_offset(Position { x: 0, y: 0 });
        self.stick_to_bottom = true;
    }

    /// Insert `text` at the end.
    pub fn append(&mut self, text: &str) {
        self.buffer.insert_at_end(text);
    }

    /// Replace the whole contents with `text`.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
    }

    /// Full contents.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn is_pinned(&self) -> bool {
        self.stick_to_bottom
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_state.offset().y
    }

    /// Scroll just far enough that wrapped row `row` is on screen in a
    /// viewport `viewport` rows tall. A pinned view already shows the last
    /// rows, so only moving above it matters there.
    pub fn keep_row_visible(&mut self, row: u16, viewport: u16) {
        let offset = self.scroll_offset();
        if row < offset {
            self.stick_to_bottom = false;
            self.scroll_state.set_offset(Position { x: 0, y: row });
        } else if !self.stick_to_bottom && viewport > 0 && row >= offset + viewport {
            self.scroll_state.set_offset(Position {
                x: 0,
                y: row + 1 - viewport,
            });
        }
    }

    fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Re-engage auto-scroll if the view has reached the bottom.
    fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        if self.scroll_offset() >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        self.buffer.lines()
    }

    /// Rows the wrapped contents take at `area_width`, borders included.
    pub fn required_height(&self, area_width: u16) -> u16 {
        let width = area_width.saturating_sub(HORIZONTAL_OVERHEAD);
        let paragraph = Paragraph::new(self.lines()).wrap(Wrap { trim: false });
        paragraph.line_count(width) as u16 + VERTICAL_OVERHEAD
    }
}

impl Component for TextBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().border_type(BorderType::Plain);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Leave the last column to the scrollbar
        let content_width = inner.width.saturating_sub(1).max(1);
        let paragraph = Paragraph::new(self.lines())
            .style(self.style)
            .wrap(Wrap { trim: false });
        let content_height = (paragraph.line_count(content_width) as u16).max(1);

        self.content_height = content_height;
        self.viewport_height = inner.height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, content_height));

        let max_y = self.max_scroll();
        if self.stick_to_bottom || self.scroll_offset() > max_y {
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }

        frame.render_stateful_widget(scroll_view, inner, &mut self.scroll_state);
    }
}

/// Scrolling is the only interaction every text box shares; editing belongs
/// to `InputText`.
impl EventHandler for TextBox {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}
