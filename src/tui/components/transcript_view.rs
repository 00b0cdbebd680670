//! # TranscriptView Component
//!
//! Draws every transcript entry top to bottom and sticks to the tail.
//!
//! ```text
//! ┃
//! ┃ what is a monad?          ← user prompt: bar + one line of padding
//! ┃
//!                             ← blank line after every entry
//! A monad is ...              ← rendered markdown
//!
//! Error: exit status: 1       ← error entry
//! ```
//!
//! Entries are never truncated. When they don't fit, the view shows the
//! bottom of the transcript minus `scroll_back` lines.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::transcript::{Transcript, TranscriptEntry};
use crate::theme::Palette;
use crate::tui::component::Component;

const PROMPT_BAR: &str = "┃";
/// Bar, then one column of padding.
const PROMPT_INDENT: usize = 2;

pub struct TranscriptView<'a> {
    pub transcript: &'a Transcript,
    pub palette: Palette,
    /// Lines scrolled up from the bottom.
    pub scroll_back: u16,
}

impl TranscriptView<'_> {
    /// Total wrapped height of the transcript at `width` columns.
    pub fn content_height(&self, width: u16) -> u16 {
        let lines = self.lines(width);
        paragraph(lines).line_count(width).min(u16::MAX as usize) as u16
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut out = Vec::new();
        for entry in self.transcript.entries() {
            match entry {
                TranscriptEntry::UserPrompt(prompt) => {
                    out.extend(prompt_lines(prompt, &self.palette, width))
                }
                other => out.extend(other.render(&self.palette).lines),
            }
            out.push(Line::default());
        }
        out
    }
}

/// Wraps the prompt ourselves so the bar repeats on every visual line.
fn prompt_lines(prompt: &str, palette: &Palette, width: u16) -> Vec<Line<'static>> {
    let bar = Span::styled(PROMPT_BAR, palette.muted_style());
    let text_width = (width as usize).saturating_sub(PROMPT_INDENT + 1).max(1);
    let options = textwrap::Options::new(text_width).break_words(true);

    let mut lines = vec![Line::from(bar.clone())];
    for logical in prompt.split('\n') {
        let wrapped = textwrap::wrap(logical, &options);
        if wrapped.is_empty() {
            lines.push(Line::from(bar.clone()));
        }
        for segment in wrapped {
            lines.push(Line::from(vec![
                bar.clone(),
                Span::raw(" "),
                Span::styled(segment.into_owned(), ratatui::style::Style::default().fg(palette.text)),
            ]));
        }
    }
    lines.push(Line::from(bar));
    lines
}

fn paragraph(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
}

/// Keeps the shortest suffix of `lines` that wraps to at least `rows` rows.
///
/// Returns it with its wrapped height. `Paragraph::scroll` takes a `u16`,
/// so long transcripts must be cut before rendering.
fn tail(lines: Vec<Line<'static>>, width: u16, rows: usize) -> (Vec<Line<'static>>, usize) {
    let mut kept = Vec::new();
    let mut height = 0;
    for line in lines.into_iter().rev() {
        if height >= rows {
            break;
        }
        height += paragraph(vec![line.clone()]).line_count(width);
        kept.push(line);
    }
    kept.reverse();
    (kept, height)
}

impl Component for TranscriptView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = area.height as usize + self.scroll_back as usize;
        let (lines, height) = tail(self.lines(area.width), area.width, rows);
        let offset = height.saturating_sub(rows).min(u16::MAX as usize) as u16;
        frame.render_widget(paragraph(lines).scroll((offset, 0)), area);
    }
}
