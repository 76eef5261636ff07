//! # StatusBar Component
//!
//! Bottom row: which tab is showing, the last status message and key hints.
//!
//! Purely presentational. All fields are props set by the run loop before
//! each draw:
//!
//! ```rust,ignore
//! let mut status_bar = StatusBar::new(tab_position, status.clone());
//! status_bar.render(frame, status_area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Status message**: `"[2/3] Send failed: offline | Enter send  ^N new  ..."`
//! 2. **No status**: `"[2/3] Enter send  ^N new  ..."`
//! 3. **No tabs**: `"[0/0] ..."`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub const KEY_HINTS: &str = "Enter send  ^N new  ^W close  ^←/→ tabs  Esc quit";

pub struct StatusBar {
    /// 1-based active tab and tab count; `None` when no tab is open.
    pub tab_position: Option<(usize, usize)>,
    /// Last status (e.g. "Send failed: offline", "Closed conversation")
    pub status_message: String,
}

impl StatusBar {
    pub fn new(tab_position: Option<(usize, usize)>, status_message: String) -> Self {
        Self {
            tab_position,
            status_message,
        }
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (active, count) = self.tab_position.unwrap_or((0, 0));
        let mut spans = vec![Span::raw(format!("[{active}/{count}] "))];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(
            KEY_HINTS,
            Style::default().add_modifier(Modifier::DIM),
        ));

        frame.render_widget(Line::from(spans), area);
    }
}
