//! # Image Loading
//!
//! Terminal "images" are small ASCII-art text files. [`load`] never fails:
//! a missing, unreadable or empty file yields the placeholder image, the way
//! a broken-image icon stands in for a picture that can't be decoded.

use std::fs;
use std::path::{Path, PathBuf};

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, Packable};

const PLACEHOLDER: [&str; 3] = ["┌─┐", "│?│", "└─┘"];

/// Images taller or wider than this are cropped on load.
const MAX_LINES: usize = 12;
const MAX_WIDTH: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    lines: Vec<String>,
    /// The file this image came from; `None` for the placeholder.
    source: Option<PathBuf>,
}

impl Image {
    pub fn placeholder() -> Self {
        Self {
            lines: PLACEHOLDER.iter().map(|l| l.to_string()).collect(),
            source: None,
        }
    }

    pub fn from_art(art: &str) -> Self {
        Self {
            lines: crop(art),
            source: None,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.source.is_none() && self.lines.iter().map(String::as_str).eq(PLACEHOLDER)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

fn crop(art: &str) -> Vec<String> {
    art.lines()
        .take(MAX_LINES)
        .map(|line| {
            let mut out = String::new();
            for c in line.chars() {
                out.push(c);
                if out.width() > MAX_WIDTH {
                    out.pop();
                    break;
                }
            }
            out.trim_end().to_string()
        })
        .collect()
}

/// Load the image at `path`, falling back to the placeholder.
pub fn load(path: &Path) -> Image {
    match fs::read_to_string(path) {
        Ok(contents) if !contents.trim().is_empty() => Image {
            lines: crop(&contents),
            source: Some(path.to_path_buf()),
        },
        Ok(_) => {
            log::debug!("Image {} is empty, using placeholder", path.display());
            Image::placeholder()
        }
        Err(e) => {
            log::debug!("Failed to load image {}: {}", path.display(), e);
            Image::placeholder()
        }
    }
}

impl Component for Image {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.lines.iter().map(|l| Line::raw(l.as_str())).collect();
        let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::Gray));
        frame.render_widget(paragraph, area);
    }
}

impl Packable for Image {
    fn natural_size(&self) -> Size {
        let width = self.lines.iter().map(|l| l.width()).max().unwrap_or(0);
        Size::new(width as u16, self.lines.len() as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "parley-image-{}-{}",
            std::process::id(),
            name
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_placeholder() {
        let image = load(Path::new("/nonexistent/icon.txt"));
        assert!(image.is_placeholder());
        assert_eq!(image.natural_size(), Size::new(3, 3));
    }

    #[test]
    fn test_load_art_file() {
        let path = temp_file("smile.txt", " o o \n  ^  \n \\_/ \n");
        let image = load(&path);
        assert_eq!(image.source(), Some(path.as_path()));
        assert_eq!(image.lines(), [" o o", "  ^", " \\_/"]);
        assert_eq!(image.natural_size(), Size::new(4, 3));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_empty_file_is_placeholder() {
        let path = temp_file("empty.txt", "  \n");
        assert!(load(&path).is_placeholder());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_oversized_art_is_cropped() {
        let art = format!("{}\n", "#".repeat(40)).repeat(20);
        let image = Image::from_art(&art);
        assert_eq!(image.natural_size(), Size::new(MAX_WIDTH as u16, MAX_LINES as u16));
    }
}
