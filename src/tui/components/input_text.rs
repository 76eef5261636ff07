//! # InputText Component
//!
//! The box the user types outgoing messages into.
//!
//! ## Responsibilities
//!
//! - Capture text input (characters, paste, Ctrl+J newlines) at the cursor
//! - Handle editing (backspace, delete) and cursor movement
//! - Handle submission: Enter hands the full text to the owner as
//!   [`InputEvent::Submit`], clears the box, and is consumed, so no newline
//!   ever reaches the buffer from the commit key
//!
//! The text is always submitted as-is, including when it is empty; deciding
//! what an empty message means is the protocol's business.
//!
//! ## Cursor
//!
//! The text lives here as a plain `String` next to a [`CursorState`] byte
//! offset; the `TextBox` is refreshed from it after every edit and only
//! draws. See `cursor.rs` for how rows and columns are measured.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::cursor::{CursorState, next_char_boundary, prev_char_boundary};
use crate::tui::components::text_box::{HORIZONTAL_OVERHEAD, TextBox, VERTICAL_OVERHEAD};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the InputText
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User committed the text (Enter pressed)
    Submit(String),
    /// Text content or cursor position changed
    ContentChanged,
}

pub struct InputText {
    text_box: TextBox,
    buffer: String,
    cursor: CursorState,
}

impl Default for InputText {
    fn default() -> Self {
        Self::new()
    }
}

impl InputText {
    pub fn new() -> Self {
        let mut text_box = TextBox::new();
        text_box.set_style(Style::default().fg(Color::Green));
        Self {
            text_box,
            buffer: String::new(),
            cursor: CursorState::new(),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.clone()
    }

    /// Replace the text and put the cursor at its end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor.pos = self.buffer.len();
        self.text_box.set_text(&self.buffer);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
        self.text_box.clear();
    }

    /// Cursor as a byte offset into [`Self::text`].
    pub fn cursor(&self) -> usize {
        self.cursor.pos
    }

    fn edited(&mut self) -> Option<InputEvent> {
        self.text_box.set_text(&self.buffer);
        Some(InputEvent::ContentChanged)
    }

    fn moved_to(&mut self, pos: usize) -> Option<InputEvent> {
        (self.cursor.pos != pos).then(|| {
            self.cursor.pos = pos;
            InputEvent::ContentChanged
        })
    }

    /// Cursor cell, if it's inside the viewport.
    fn cursor_position(&self, area: Rect) -> Option<(u16, u16)> {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        let inner_height = area.height.saturating_sub(VERTICAL_OVERHEAD);
        if width == 0 || inner_height == 0 {
            return None;
        }

        let (row, col) = self.cursor.row_col(&self.buffer, width as usize);
        let row = (row as u16).checked_sub(self.text_box.scroll_offset())?;
        if row >= inner_height {
            return None;
        }
        Some((area.x + 1 + (col as u16).min(width), area.y + 1 + row))
    }
}

impl Component for InputText {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        if width > 0 {
            self.cursor.last_content_width = width;
            let (row, _) = self.cursor.row_col(&self.buffer, width as usize);
            let viewport = area.height.saturating_sub(VERTICAL_OVERHEAD);
            self.text_box.keep_row_visible(row as u16, viewport);
        }

        self.text_box.render(frame, area);
        if let Some(position) = self.cursor_position(area) {
            frame.set_cursor_position(position);
        }
    }
}

impl EventHandler for InputText {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                self.edited()
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor.pos, text);
                self.cursor.pos += text.len();
                self.edited()
            }
            TuiEvent::Backspace => {
                if self.cursor.pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                self.edited()
            }
            TuiEvent::Delete => {
                if self.cursor.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                self.edited()
            }
            TuiEvent::CursorLeft => {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.moved_to(prev)
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.moved_to(next)
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.moved_to(line_start)
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                self.moved_to(line_end)
            }
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                let direction = if *event == TuiEvent::CursorUp { -1 } else { 1 };
                let width = self.cursor.last_content_width as usize;
                self.cursor
                    .move_vertically(&self.buffer, direction, width)
                    .then_some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                self.text_box.clear();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
