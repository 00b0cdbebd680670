use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components receive everything they draw as props (struct fields),
/// usually borrowed from `App` for the duration of one frame, and render
/// into the `Rect` they are given.
///
/// `render` takes `&mut self` so a component may cache layout work
/// while drawing, matching ratatui's `StatefulWidget` pattern.
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}
