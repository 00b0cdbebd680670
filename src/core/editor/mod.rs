//! # Draft Editor
//!
//! The single unsent draft: text buffer, cursor, focus and wrapping.
//!
//! The editor knows nothing about terminals. The TUI translates key presses
//! into [`EditKey`]s and asks for [`Editor::visible_lines`] and
//! [`Editor::cursor_position`] when drawing.

pub mod layout;

use layout::{Row, char_width, str_width};

/// Minimum rows the editor box shows, even when empty.
pub const MIN_VISIBLE_LINES: u16 = 3;
/// The box stops growing here and scrolls internally.
pub const MAX_VISIBLE_LINES: u16 = 8;

const TAB: &str = "    ";

/// An editing command, already stripped of terminal details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKey {
    Char(char),
    Paste(String),
    Newline,
    Backspace,
    Delete,
    DeleteWordBack,
    Left,
    Right,
    WordLeft,
    WordRight,
    Home,
    End,
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct Editor {
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
    focused: bool,
    /// Wrap width in columns. Zero until the first resize.
    width: u16,
    /// First visual row shown when the draft is taller than the box.
    scroll_offset: u16,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// An empty, focused editor.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            focused: true,
            width: 0,
            scroll_offset: 0,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Empties the draft. Focus is left alone.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width;
        self.follow_cursor();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Applies one edit. Returns `true` if the buffer or cursor changed.
    pub fn apply(&mut self, key: &EditKey) -> bool {
        let changed = match key {
            EditKey::Char('\t') => self.insert(TAB),
            EditKey::Char(c) => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf))
            }
            EditKey::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', TAB);
                self.insert(&text)
            }
            EditKey::Newline => self.insert("\n"),
            EditKey::Backspace => {
                let start = layout::prev_char_boundary(&self.buffer, self.cursor);
                self.delete_range(start, self.cursor)
            }
            EditKey::DeleteWordBack => {
                let start = layout::prev_word_boundary(&self.buffer, self.cursor);
                self.delete_range(start, self.cursor)
            }
            EditKey::Delete => {
                let end = layout::next_char_boundary(&self.buffer, self.cursor);
                self.delete_range(self.cursor, end)
            }
            EditKey::Left => self.move_to(layout::prev_char_boundary(&self.buffer, self.cursor)),
            EditKey::Right => self.move_to(layout::next_char_boundary(&self.buffer, self.cursor)),
            EditKey::WordLeft => self.move_to(layout::prev_word_boundary(&self.buffer, self.cursor)),
            EditKey::WordRight => {
                self.move_to(layout::next_word_boundary(&self.buffer, self.cursor))
            }
            EditKey::Home => {
                let start = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
                self.move_to(start)
            }
            EditKey::End => {
                let end = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                self.move_to(end)
            }
            EditKey::Up => self.move_vertically(-1),
            EditKey::Down => self.move_vertically(1),
        };
        if changed {
            self.follow_cursor();
        }
        changed
    }

    fn insert(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        true
    }

    fn delete_range(&mut self, start: usize, end: usize) -> bool {
        if start >= end {
            return false;
        }
        self.buffer.replace_range(start..end, "");
        self.cursor = start;
        true
    }

    fn move_to(&mut self, pos: usize) -> bool {
        if pos == self.cursor {
            return false;
        }
        self.cursor = pos;
        true
    }

    fn move_vertically(&mut self, direction: isize) -> bool {
        let rows = self.rows();
        let current = layout::row_of(&rows, self.cursor);
        let Some(target) = current.checked_add_signed(direction).filter(|&t| t < rows.len())
        else {
            return false;
        };
        let col = str_width(&self.buffer[rows[current].start..self.cursor]);
        self.move_to(layout::offset_at_column(&self.buffer, rows[target], col))
    }

    fn rows(&self) -> Vec<Row> {
        layout::layout(&self.buffer, self.width)
    }

    /// Number of visual rows the whole draft occupies.
    pub fn line_count(&self) -> u16 {
        self.rows().len() as u16
    }

    /// Rows the editor box should show: grows with content within bounds.
    pub fn height(&self) -> u16 {
        self.line_count().clamp(MIN_VISIBLE_LINES, MAX_VISIBLE_LINES)
    }

    /// The rows currently scrolled into view.
    pub fn visible_lines(&self) -> Vec<&str> {
        self.rows()
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(|r| r.slice(&self.buffer))
            .collect()
    }

    /// Cursor as `(column, row)` relative to the first visible row.
    pub fn cursor_position(&self) -> (u16, u16) {
        let rows = self.rows();
        let row = layout::row_of(&rows, self.cursor);
        let col = self.buffer[rows[row].start..self.cursor]
            .chars()
            .map(char_width)
            .sum::<usize>();
        (
            col as u16,
            (row as u16).saturating_sub(self.scroll_offset),
        )
    }

    fn follow_cursor(&mut self) {
        let rows = self.rows();
        let total = rows.len() as u16;
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let row = layout::row_of(&rows, self.cursor) as u16;
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
        self.scroll_offset = self.scroll_offset.min(total - MAX_VISIBLE_LINES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> Editor {
        let mut editor = Editor::new();
        editor.set_width(20);
        for c in text.chars() {
            let key = if c == '\n' { EditKey::Newline } else { EditKey::Char(c) };
            editor.apply(&key);
        }
        editor
    }

    #[test]
    fn typing_appends_and_moves_cursor() {
        let editor = typed("hi there");
        assert_eq!(editor.value(), "hi there");
        assert_eq!(editor.cursor(), 8);
        assert_eq!(editor.cursor_position(), (8, 0));
    }

    #[test]
    fn new_editor_is_focused_and_empty() {
        let editor = Editor::new();
        assert!(editor.is_focused());
        assert_eq!(editor.value(), "");
        assert_eq!(editor.height(), MIN_VISIBLE_LINES);
    }

    #[test]
    fn backspace_and_delete() {
        let mut editor = typed("abc");
        assert!(editor.apply(&EditKey::Backspace));
        assert_eq!(editor.value(), "ab");
        assert!(editor.apply(&EditKey::Home));
        assert!(editor.apply(&EditKey::Delete));
        assert_eq!(editor.value(), "b");
        assert!(!editor.apply(&EditKey::Left));
        assert!(!editor.apply(&EditKey::Backspace));
    }

    #[test]
    fn backspace_removes_whole_multibyte_char() {
        let mut editor = typed("héllo");
        editor.apply(&EditKey::Home);
        editor.apply(&EditKey::Right);
        editor.apply(&EditKey::Right);
        editor.apply(&EditKey::Backspace);
        assert_eq!(editor.value(), "hllo");
    }

    #[test]
    fn delete_word_back() {
        let mut editor = typed("send this now");
        assert!(editor.apply(&EditKey::DeleteWordBack));
        assert_eq!(editor.value(), "send this ");
    }

    #[test]
    fn paste_normalizes_carriage_returns() {
        let mut editor = typed("");
        editor.apply(&EditKey::Paste("a\r\nb\rc\td".into()));
        assert_eq!(editor.value(), "a\nb\nc    d");
    }

    #[test]
    fn home_and_end_stay_on_logical_line() {
        let mut editor = typed("first\nsecond");
        editor.apply(&EditKey::Home);
        assert_eq!(editor.cursor(), 6);
        editor.apply(&EditKey::End);
        assert_eq!(editor.cursor(), 12);
    }

    #[test]
    fn up_and_down_keep_column() {
        let mut editor = typed("abcdef\nxy\nlonger line");
        assert!(editor.apply(&EditKey::Up));
        assert_eq!(editor.cursor(), 9);
        assert!(editor.apply(&EditKey::Up));
        assert_eq!(editor.cursor(), 2);
        assert!(!editor.apply(&EditKey::Up));
        assert!(editor.apply(&EditKey::Down));
        assert_eq!(editor.cursor(), 9);
    }

    #[test]
    fn word_motion() {
        let mut editor = typed("one two");
        editor.apply(&EditKey::WordLeft);
        assert_eq!(editor.cursor(), 4);
        editor.apply(&EditKey::WordLeft);
        assert_eq!(editor.cursor(), 0);
        editor.apply(&EditKey::WordRight);
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn long_text_wraps_at_width() {
        let mut editor = Editor::new();
        editor.set_width(5);
        editor.apply(&EditKey::Paste("abcdefgh".into()));
        assert_eq!(editor.visible_lines(), vec!["abcde", "fgh"]);
        assert_eq!(editor.cursor_position(), (3, 1));
    }

    #[test]
    fn height_grows_then_caps() {
        let mut editor = Editor::new();
        editor.set_width(20);
        assert_eq!(editor.height(), 3);
        editor.apply(&EditKey::Paste("1\n2\n3\n4\n5".into()));
        assert_eq!(editor.height(), 5);
        editor.apply(&EditKey::Paste("\n6\n7\n8\n9\n10".into()));
        assert_eq!(editor.line_count(), 10);
        assert_eq!(editor.height(), MAX_VISIBLE_LINES);
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let mut editor = Editor::new();
        editor.set_width(20);
        editor.apply(&EditKey::Paste("1\n2\n3\n4\n5\n6\n7\n8\n9\n10".into()));
        assert_eq!(editor.scroll_offset, 2);
        assert_eq!(editor.visible_lines().first(), Some(&"3"));
        assert_eq!(editor.cursor_position(), (2, 7));

        for _ in 0..9 {
            editor.apply(&EditKey::Up);
        }
        assert_eq!(editor.scroll_offset, 0);
        assert_eq!(editor.cursor_position().1, 0);
    }

    #[test]
    fn reset_keeps_focus_state() {
        let mut editor = typed("draft");
        editor.blur();
        editor.reset();
        assert_eq!(editor.value(), "");
        assert_eq!(editor.cursor(), 0);
        assert!(!editor.is_focused());
    }
}
