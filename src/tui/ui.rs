use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::theme::Palette;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{EditorBox, Footer, Spinner, TranscriptView};

/// Shown until the first resize tells us how big the screen is.
pub const LOADING_TEXT: &str = "Loading ...";

struct Areas {
    transcript: Rect,
    status: Rect,
    editor: Rect,
    footer: Rect,
}

fn palette(app: &App) -> Palette {
    Palette::for_theme(&app.config.theme).unwrap_or_default()
}

fn areas(app: &App, area: Rect) -> Areas {
    use Constraint::{Length, Min};

    let editor_height = EditorBox {
        editor: &app.editor,
        palette: palette(app),
    }
    .height();
    let status_height = if app.is_pending() { 1 } else { 0 };

    let [transcript, status, editor, footer] = Layout::vertical([
        Min(0),
        Length(status_height),
        Length(editor_height),
        Length(1),
    ])
    .areas(area);

    Areas {
        transcript,
        status,
        editor,
        footer,
    }
}

/// Furthest the transcript can be scrolled back within `area`.
pub fn max_scroll_back(app: &App, area: Rect) -> u16 {
    let areas = areas(app, area);
    let view = TranscriptView {
        transcript: &app.transcript,
        palette: palette(app),
        scroll_back: 0,
    };
    view.content_height(areas.transcript.width)
        .saturating_sub(areas.transcript.height)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &TuiState) {
    if app.viewport.is_none() {
        frame.render_widget(Paragraph::new(LOADING_TEXT), frame.area());
        return;
    }

    let palette = palette(app);
    let areas = areas(app, frame.area());

    TranscriptView {
        transcript: &app.transcript,
        palette,
        scroll_back: tui.scroll_back,
    }
    .render(frame, areas.transcript);

    if app.is_pending() {
        Spinner {
            frame: app.spinner_frame,
            palette,
        }
        .render(frame, areas.status);
    }

    EditorBox {
        editor: &app.editor,
        palette,
    }
    .render(frame, areas.editor);

    Footer { palette }.render(frame, areas.footer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, Effect, KeyInput, update};
    use crate::core::transcript::TranscriptEntry;
    use crate::test_support::{test_app, type_text};
    use crate::tui::components::status::{FOOTER_TEXT, PROCESSING_TEXT};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    const W: u16 = 70;
    const H: u16 = 14;

    fn draw(app: &App, tui: &TuiState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(W, H)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn rows(buffer: &Buffer) -> Vec<String> {
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn sized_app() -> App {
        let mut app = test_app();
        update(
            &mut app,
            Action::Resize {
                width: W,
                height: H,
            },
        );
        app
    }

    fn pending_app() -> (App, Vec<Effect>) {
        let mut app = sized_app();
        type_text(&mut app, "hello");
        let effects = update(&mut app, Action::Key(KeyInput::Send));
        (app, effects)
    }

    #[test]
    fn placeholder_before_first_resize() {
        let app = test_app();
        let rows = rows(&draw(&app, &TuiState::default()));
        assert_eq!(rows[0], LOADING_TEXT);
        assert!(rows[1..].iter().all(|r| r.is_empty()));
    }

    #[test]
    fn idle_screen_has_editor_and_footer_but_no_indicator() {
        let app = sized_app();
        let rows = rows(&draw(&app, &TuiState::default()));
        assert_eq!(rows[H as usize - 1], FOOTER_TEXT);
        assert!(rows[H as usize - 6].starts_with('╭'));
        assert!(rows.iter().all(|r| !r.contains(PROCESSING_TEXT)));
    }

    #[test]
    fn indicator_only_while_pending() {
        let (mut app, _effects) = pending_app();
        let rows_pending = rows(&draw(&app, &TuiState::default()));
        let status = &rows_pending[H as usize - 7];
        assert!(status.ends_with(PROCESSING_TEXT), "got {status:?}");

        update(&mut app, Action::Key(KeyInput::CancelEdit));
        let rows_idle = rows(&draw(&app, &TuiState::default()));
        assert!(rows_idle.iter().all(|r| !r.contains(PROCESSING_TEXT)));
    }

    #[test]
    fn transcript_shows_prompt_and_error() {
        let mut app = sized_app();
        app.transcript
            .append(TranscriptEntry::UserPrompt("hello there".into()));
        app.transcript
            .append(TranscriptEntry::Error("exit status: 1".into()));
        let rows = rows(&draw(&app, &TuiState::default()));
        assert_eq!(rows[0], "┃");
        assert_eq!(rows[1], "┃ hello there");
        assert_eq!(rows[2], "┃");
        assert_eq!(rows[3], "");
        assert_eq!(rows[4], "Error: exit status: 1");
    }

    #[test]
    fn rendering_is_idempotent() {
        let (mut app, _effects) = pending_app();
        app.transcript.append_response("# Title\n\nsome `code`", "dark");
        type_text(&mut app, "ignored");
        let tui = TuiState::default();
        assert_eq!(draw(&app, &tui), draw(&app, &tui));
    }

    #[test]
    fn resize_while_pending_keeps_indicator() {
        let (mut app, _effects) = pending_app();
        update(
            &mut app,
            Action::Resize {
                width: W - 10,
                height: H,
            },
        );
        assert!(app.is_pending());
        let rows = rows(&draw(&app, &TuiState::default()));
        assert!(rows.iter().any(|r| r.contains(PROCESSING_TEXT)));
        assert!(rows.iter().any(|r| r.contains("┃ hello")));
    }

    #[test]
    fn max_scroll_back_is_zero_when_content_fits() {
        let app = sized_app();
        assert_eq!(max_scroll_back(&app, Rect::new(0, 0, W, H)), 0);
    }

    #[test]
    fn max_scroll_back_grows_with_transcript() {
        let mut app = sized_app();
        for i in 0..20 {
            app.transcript.append(TranscriptEntry::Error(format!("{i}")));
        }
        // 40 lines of content, 14 - 5 (editor) - 1 (footer) = 8 visible
        assert_eq!(max_scroll_back(&app, Rect::new(0, 0, W, H)), 32);
    }
}
