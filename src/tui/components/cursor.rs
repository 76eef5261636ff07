//! Cursor tracking for `InputText`.
//!
//! The cursor is a byte offset into the input's text, always on a char
//! boundary. Screen placement works on wrapped rows: each row is the byte
//! range of the text it shows, so a column is just the display width of the
//! text between the row start and the cursor. Trailing spaces count like any
//! other character even though textwrap trims them from its output.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap on ASCII spaces, breaking words longer than the row.
pub(super) fn wrap_options(width: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Byte offset of the char before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the char after the one at `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// One wrapped row as a byte range of the full text. The last row of a
/// logical line runs to the end of that line, trailing spaces included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Rows of `text` wrapped at `width`. Never empty: `""` is one empty row and
/// a trailing newline opens a new one.
pub(super) fn wrapped_rows(text: &str, width: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut line_start = 0;
    for line in text.split('\n') {
        let segments = textwrap::wrap(line, wrap_options(width.max(1)));
        if segments.is_empty() {
            rows.push(Row {
                start: line_start,
                end: line_start + line.len(),
            });
        }

        let mut offset = 0;
        for (index, segment) in segments.iter().enumerate() {
            // Segments are slices of `line` in order; only spaces sit between them
            let start = if segment.is_empty() {
                offset
            } else {
                line[offset..]
                    .find(segment.as_ref())
                    .map_or(offset, |found| offset + found)
            };
            offset = start + segment.len();
            let end = if index + 1 == segments.len() {
                line.len()
            } else {
                offset
            };
            rows.push(Row {
                start: line_start + start,
                end: line_start + end,
            });
        }
        line_start += line.len() + 1;
    }
    rows
}

/// Index of the row `pos` sits on. A position shared by two rows (a word
/// broken mid-way) belongs to the later one.
fn row_index(rows: &[Row], pos: usize) -> usize {
    rows.iter().rposition(|r| r.start <= pos).unwrap_or(0)
}

pub(super) struct CursorState {
    /// Cursor position as byte offset in the text (0..=text.len())
    pub pos: usize,
    /// Content width from the last render (used for vertical movement)
    pub last_content_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            last_content_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Back to the start (used after Submit clears the text).
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Wrapped row and display column of the cursor.
    pub fn row_col(&self, text: &str, width: usize) -> (usize, usize) {
        let rows = wrapped_rows(text, width);
        let row = row_index(&rows, self.pos);
        (row, text[rows[row].start..self.pos].width())
    }

    /// Move one wrapped row up (`direction < 0`) or down, keeping the display
    /// column where the target row is long enough.
    ///
    /// Returns `true` if the cursor moved, `false` if already at the edge.
    pub fn move_vertically(&mut self, text: &str, direction: i16, width: usize) -> bool {
        if width == 0 || text.is_empty() {
            return false;
        }

        let rows = wrapped_rows(text, width);
        let current = row_index(&rows, self.pos);
        let target = if direction < 0 {
            current.checked_sub(1)
        } else {
            Some(current + 1).filter(|&t| t < rows.len())
        };
        let Some(target) = target else {
            return false;
        };

        let column = text[rows[current].start..self.pos].width();
        let row = rows[target];
        let mut pos = row.start;
        let mut used = 0;
        for (i, c) in text[row.start..row.end].char_indices() {
            let char_width = c.width().unwrap_or(0);
            if used + char_width > column {
                break;
            }
            used += char_width;
            pos = row.start + i + c.len_utf8();
        }
        // The end of a broken word is also the start of the next row
        if pos > row.start && row_index(&rows, pos) != target {
            pos = prev_char_boundary(text, pos);
        }

        self.pos = pos;
        true
    }
}
