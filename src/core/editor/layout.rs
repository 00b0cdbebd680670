//! Soft-wrap layout for the draft buffer.
//!
//! Text is broken into visual rows by display width (not bytes, not chars),
//! so wide glyphs and combining marks land where the terminal puts them.
//! Rows never include the `\n` that ends a logical line.

use unicode_width::UnicodeWidthChar;

/// One visual row as a byte range into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub start: usize,
    pub end: usize,
}

impl Row {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

pub(crate) fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

pub(crate) fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Splits `text` into rows no wider than `width` columns.
///
/// A zero width disables wrapping. A logical line that exactly fills the
/// width gets a trailing empty row so a cursor at its end stays on screen.
/// Always returns at least one row.
pub fn layout(text: &str, width: u16) -> Vec<Row> {
    let width = width as usize;
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let line_end = line_start + line.len();
        if width == 0 {
            rows.push(Row { start: line_start, end: line_end });
            line_start = line_end + 1;
            continue;
        }

        let mut row_start = line_start;
        let mut col = 0;
        for (offset, c) in line.char_indices() {
            let w = char_width(c);
            if col > 0 && col + w > width {
                let at = line_start + offset;
                rows.push(Row { start: row_start, end: at });
                row_start = at;
                col = 0;
            }
            col += w;
        }
        rows.push(Row { start: row_start, end: line_end });
        if col >= width && line_end > row_start {
            rows.push(Row { start: line_end, end: line_end });
        }
        line_start = line_end + 1;
    }

    rows
}

/// Index of the row the byte offset `pos` is displayed on.
pub fn row_of(rows: &[Row], pos: usize) -> usize {
    rows.iter().rposition(|r| r.start <= pos).unwrap_or(0)
}

/// Byte offset within `row` whose column is closest to `col` without passing it.
pub fn offset_at_column(text: &str, row: Row, col: usize) -> usize {
    let mut used = 0;
    for (offset, c) in row.slice(text).char_indices() {
        let w = char_width(c);
        if used + w > col {
            return row.start + offset;
        }
        used += w;
    }
    row.end
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `pos`, skipping any separators first.
pub fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[..pos].char_indices().rev().peekable();
    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }
    let mut boundary = 0;
    for (i, c) in chars {
        if !is_word_char(c) {
            return i + c.len_utf8();
        }
        boundary = i;
    }
    boundary
}

/// End of the word after `pos`, skipping any separators first.
pub fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[pos..].char_indices().peekable();
    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }
    for (i, c) in chars {
        if !is_word_char(c) {
            return pos + i;
        }
    }
    text.len()
}

pub fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
