//! # Status Components
//!
//! Single-line chrome around the editor: the processing indicator shown
//! while a request is pending, and the key binding footer.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::theme::Palette;
use crate::tui::component::Component;

pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
pub const PROCESSING_TEXT: &str = "Processing...";
pub const FOOTER_TEXT: &str = "| ctrl+s - send | ctrl+q - quit | ctrl+l - new | esc - clear |";

/// Animated "Processing..." line. `frame` is the reducer's spinner counter.
pub struct Spinner {
    pub frame: usize,
    pub palette: Palette,
}

impl Spinner {
    pub fn glyph(&self) -> &'static str {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }
}

impl Component for Spinner {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = self.palette.muted_style();
        let line = Line::from(vec![
            Span::styled(self.glyph(), style),
            Span::styled(format!(" {PROCESSING_TEXT}"), style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

pub struct Footer {
    pub palette: Palette,
}

impl Component for Footer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(FOOTER_TEXT, self.palette.muted_style()));
        frame.render_widget(Paragraph::new(line), area);
    }
}
