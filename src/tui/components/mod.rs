//! # TUI Components
//!
//! All UI pieces of the chat screen. Each is a props struct implementing
//! [`Component`](crate::tui::component::Component); data flows in from
//! `App` and `TuiState` at draw time, nothing flows back out.
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── transcript_view.rs  (the conversation, tail-anchored)
//! ├── editor_box.rs       (bordered draft with cursor)
//! └── status.rs           (spinner line and footer)
//! ```

pub mod editor_box;
pub mod status;
pub mod transcript_view;

pub use editor_box::EditorBox;
pub use status::{Footer, Spinner};
pub use transcript_view::TranscriptView;
