//! # Application State
//!
//! Core state for schat. Domain data only, no terminal types; presentation
//! state (scroll-back) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── config: ChatConfig           // provider id + theme, fixed at startup
//! ├── transcript: Transcript       // what has been said so far
//! ├── editor: Editor               // the unsent draft
//! ├── request: RequestState        // Idle | Pending(PendingRequest)
//! ├── viewport: Option<Viewport>   // None until the first resize
//! ├── spinner_frame: usize         // advanced by spinner ticks
//! └── next_request_id: u64         // monotonically increasing
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use std::time::Instant;

use crate::core::bridge::PendingResult;
use crate::core::editor::Editor;
use crate::core::transcript::Transcript;

/// Settings fixed for the whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Registry id of the provider every prompt goes to.
    pub provider: String,
    /// Theme name handed to the markdown renderer.
    pub theme: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// The request currently in flight.
///
/// Owning the receiving half of the bridge here means "Pending" and
/// "a result may still arrive" can't disagree.
#[derive(Debug)]
pub struct PendingRequest {
    pub id: u64,
    pub started_at: Instant,
    pub provider: String,
    pub result: PendingResult,
}

#[derive(Debug, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending(PendingRequest),
}

impl RequestState {
    pub fn pending(&self) -> Option<&PendingRequest> {
        match self {
            RequestState::Pending(p) => Some(p),
            RequestState::Idle => None,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub config: ChatConfig,
    pub transcript: Transcript,
    pub editor: Editor,
    pub request: RequestState,
    pub viewport: Option<Viewport>,
    pub spinner_frame: usize,
    pub next_request_id: u64,
}

impl App {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            transcript: Transcript::new(),
            editor: Editor::new(),
            request: RequestState::Idle,
            viewport: None,
            spinner_frame: 0,
            next_request_id: 1,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.request, RequestState::Pending(_))
    }

    /// Id of the in-flight request, if any.
    pub fn pending_id(&self) -> Option<u64> {
        self.request.pending().map(|p| p.id)
    }
}
