//! # Actions
//!
//! Everything that can happen in schat becomes an `Action`.
//! User presses ctrl+s? That's `Action::Key(KeyInput::Send)`.
//! Provider answers? That's `Action::ResultReady { .. }` or a `Tick::Poll`
//! that finds the answer waiting in the bridge.
//!
//! `update()` mutates the state and returns the effects the runtime must
//! perform. No I/O happens here; spawning processes and timers is the
//! caller's job.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```

use std::time::Instant;

use log::{debug, info};

use crate::core::bridge::{self, Outcome, ResultSender};
use crate::core::editor::EditKey;
use crate::core::state::{App, PendingRequest, RequestState, Viewport};
use crate::core::transcript::TranscriptEntry;

/// Columns the editor box spends on borders and padding.
pub const EDITOR_CHROME_WIDTH: u16 = 4;

#[derive(Debug)]
pub enum Action {
    Key(KeyInput),
    Resize { width: u16, height: u16 },
    Tick(Tick),
    /// A provider result pushed directly instead of polled.
    ResultReady { request_id: u64, outcome: Outcome },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Send,
    Clear,
    CancelEdit,
    Edit(EditKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Advance the processing indicator.
    Spinner,
    /// Check the bridge for a finished result.
    Poll,
}

/// Everything a background task needs to answer one prompt.
#[derive(Debug)]
pub struct Invocation {
    pub request_id: u64,
    pub provider: String,
    pub prompt: String,
    pub reply: ResultSender,
}

#[derive(Debug)]
pub enum Effect {
    Invoke(Invocation),
    /// Start polling the bridge on a timer.
    SchedulePoll,
    /// Stop the poll timer; nothing is pending any more.
    CancelPoll,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Key(KeyInput::Send) => send(app),
        Action::Key(KeyInput::Clear) => {
            app.transcript.clear();
            app.editor.reset();
            app.editor.focus();
            abandon(app)
        }
        Action::Key(KeyInput::CancelEdit) => {
            app.editor.reset();
            app.editor.focus();
            abandon(app)
        }
        Action::Key(KeyInput::Edit(key)) => {
            if app.editor.is_focused() {
                app.editor.apply(&key);
            }
            vec![]
        }
        Action::Resize { width, height } => {
            app.viewport = Some(Viewport { width, height });
            app.editor
                .set_width(width.saturating_sub(EDITOR_CHROME_WIDTH));
            vec![]
        }
        Action::Tick(Tick::Spinner) => {
            if app.is_pending() {
                app.spinner_frame = app.spinner_frame.wrapping_add(1);
            }
            vec![]
        }
        Action::Tick(Tick::Poll) => {
            let outcome = match &mut app.request {
                RequestState::Pending(pending) => pending.result.poll(),
                RequestState::Idle => None,
            };
            match outcome {
                Some(outcome) => complete(app, outcome),
                None => vec![],
            }
        }
        Action::ResultReady {
            request_id,
            outcome,
        } => {
            if app.pending_id() == Some(request_id) {
                complete(app, outcome)
            } else {
                debug!("Dropping stale result for request {}", request_id);
                vec![]
            }
        }
        Action::Quit => {
            info!("Quit requested");
            vec![Effect::Quit]
        }
    }
}

fn send(app: &mut App) -> Vec<Effect> {
    if app.is_pending() || !app.editor.is_focused() {
        debug!("Send ignored while a request is in flight");
        return vec![];
    }

    let mut prompt = app.editor.value().to_string();
    if prompt.ends_with('\n') {
        prompt.pop();
    }
    app.transcript
        .append(TranscriptEntry::UserPrompt(prompt.clone()));
    app.editor.reset();
    app.editor.blur();

    let request_id = app.next_request_id;
    app.next_request_id += 1;
    let provider = app.config.provider.clone();
    let (reply, result) = bridge::channel();
    app.request = RequestState::Pending(PendingRequest {
        id: request_id,
        started_at: Instant::now(),
        provider: provider.clone(),
        result,
    });
    app.spinner_frame = 0;

    info!(
        "Request {} sent to '{}' ({} bytes)",
        request_id,
        provider,
        prompt.len()
    );

    vec![
        Effect::Invoke(Invocation {
            request_id,
            provider,
            prompt,
            reply,
        }),
        Effect::SchedulePoll,
    ]
}

/// Records the outcome of the pending request and returns to Idle.
fn complete(app: &mut App, outcome: Outcome) -> Vec<Effect> {
    if let RequestState::Pending(pending) = std::mem::take(&mut app.request) {
        info!(
            "Request {} on '{}' finished after {:.1?} ({})",
            pending.id,
            pending.provider,
            pending.started_at.elapsed(),
            if outcome.is_ok() { "ok" } else { "error" }
        );
    }

    match outcome {
        Ok(text) => app.transcript.append_response(&text, &app.config.theme),
        Err(e) => app.transcript.append(TranscriptEntry::Error(e.to_string())),
    }
    app.editor.focus();
    vec![Effect::CancelPoll]
}

/// Drops any pending request. Its late result is never observed.
fn abandon(app: &mut App) -> Vec<Effect> {
    match std::mem::take(&mut app.request) {
        RequestState::Pending(pending) => {
            info!("Request {} on '{}' abandoned", pending.id, pending.provider);
            vec![Effect::CancelPoll]
        }
        RequestState::Idle => vec![],
    }
}
