//! # EditorBox Component
//!
//! The bordered draft area. Shows the editor's visible rows and, while the
//! editor is focused, places the terminal cursor.
//!
//! The editor does its own wrapping, so each visible row is drawn as-is;
//! the box's inner width equals the editor's wrap width.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::core::editor::Editor;
use crate::theme::Palette;
use crate::tui::component::Component;

/// Top + bottom borders.
pub const VERTICAL_OVERHEAD: u16 = 2;

pub struct EditorBox<'a> {
    pub editor: &'a Editor,
    pub palette: Palette,
}

impl EditorBox<'_> {
    /// Rows the box needs, borders included.
    pub fn height(&self) -> u16 {
        self.editor.height() + VERTICAL_OVERHEAD
    }
}

impl Component for EditorBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.editor.is_focused() {
            self.palette.muted_style()
        } else {
            self.palette.muted_style().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);

        let lines: Vec<Line> = self
            .editor
            .visible_lines()
            .into_iter()
            .map(Line::raw)
            .collect();
        let paragraph = Paragraph::new(Text::from(lines))
            .style(Style::default().fg(self.palette.text))
            .block(block);
        frame.render_widget(paragraph, area);

        if self.editor.is_focused() && inner.width > 0 && inner.height > 0 {
            let (col, row) = self.editor.cursor_position();
            let x = inner.x + col.min(inner.width - 1);
            let y = inner.y + row.min(inner.height - 1);
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}
