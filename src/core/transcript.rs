//! # Transcript
//!
//! The ordered, append-only log of what happened in this session.
//!
//! ```text
//! Transcript
//! ├── UserPrompt("what is rust?")
//! ├── Assistant(<rendered markdown>)
//! ├── UserPrompt("and tokio?")
//! └── Error("exit status: 1")
//! ```
//!
//! Assistant replies are rendered to styled text once, when they arrive,
//! so redraws never re-parse markdown.

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use crate::markdown;
use crate::theme::Palette;

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    UserPrompt(String),
    Assistant(Text<'static>),
    Error(String),
}

impl TranscriptEntry {
    /// Styled text for this entry, without decoration like the prompt bar.
    pub fn render(&self, palette: &Palette) -> Text<'static> {
        match self {
            TranscriptEntry::UserPrompt(prompt) => Text::from(
                prompt
                    .lines()
                    .map(|l| Line::from(Span::styled(l.to_owned(), Style::default().fg(palette.text))))
                    .collect::<Vec<_>>(),
            ),
            TranscriptEntry::Assistant(text) => text.clone(),
            TranscriptEntry::Error(msg) => {
                let mut lines = msg.lines();
                let first = lines.next().unwrap_or_default();
                let mut out = vec![Line::from(Span::styled(
                    format!("Error: {first}"),
                    palette.error_style(),
                ))];
                out.extend(
                    lines.map(|l| Line::from(Span::styled(l.to_owned(), palette.error_style()))),
                );
                Text::from(out)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Renders a raw provider reply and appends it.
    ///
    /// A render failure is recorded as an `Error` entry instead, so the
    /// transcript always grows by exactly one.
    pub fn append_response(&mut self, raw: &str, theme: &str) {
        let entry = match markdown::render(raw, theme) {
            Ok(text) => TranscriptEntry::Assistant(text),
            Err(e) => {
                log::warn!("Failed to render response: {}", e);
                TranscriptEntry::Error(e.to_string())
            }
        };
        self.append(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render_all(&self, palette: &Palette) -> Vec<Text<'static>> {
        self.entries.iter().map(|e| e.render(palette)).collect()
    }
}
