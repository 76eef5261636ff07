//! # Header Component
//!
//! Top of a conversation page: who you're talking to, on two lines, with an
//! icon on the right.
//!
//! ```text
//! ┌──────────────────────────────────────┬─────┐
//! │ Ana                                  │ ┌─┐ │
//! │ out for lunch            (dim/small) │ │?│ │
//! └──────────────────────────────────────┴─────┘
//! ```
//!
//! The label holds markup built from [`information_markup`]. Setting it or
//! the image replaces the previous value wholesale; nothing is patched.

use std::path::Path;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use crate::tui::component::{Component, Packable};
use crate::tui::images::{self, Image};
use crate::tui::markup;

/// Build the two-line header markup. Both values are inserted verbatim, so
/// callers escape anything that didn't come from a trusted template.
pub fn information_markup(title: &str, subtitle: &str) -> String {
    format!("{title}\n<span size=\"small\">{subtitle}</span>")
}

pub struct Header {
    information: String,
    image: Image,
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    pub fn new() -> Self {
        Self {
            information: "info".to_string(),
            image: Image::placeholder(),
        }
    }

    /// Replace the label markup.
    pub fn set_information(&mut self, markup: impl Into<String>) {
        self.information = markup.into();
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    /// Swap the icon for the image at `path`. The loader substitutes a
    /// placeholder if the file can't be read.
    pub fn set_image(&mut self, path: &Path) {
        self.image = images::load(path);
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Rows needed to show both label lines and the full icon.
    pub fn required_height(&self) -> u16 {
        self.image.natural_size().height.max(2)
    }
}

impl Component for Header {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let image_width = self.image.natural_size().width;
        let [label_area, image_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(image_width + 1)])
                .areas(area);

        let label = Paragraph::new(markup::to_text(&self.information, Style::default()));
        frame.render_widget(label, label_area);
        self.image.render(frame, image_area);
    }
}
