//! # Response Bridge
//!
//! One-shot handoff from a background provider task to the UI loop.
//!
//! ```text
//! tokio task ──ResultSender::send──▶ oneshot ──PendingResult::poll──▶ update()
//! ```
//!
//! The UI side never awaits. It calls `poll()` on every poll tick; `None`
//! means the provider is still running.

use log::debug;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::inference::ProviderError;

/// The terminal result of one provider invocation.
pub type Outcome = Result<String, ProviderError>;

/// Creates a connected sender/receiver pair for a single request.
pub fn channel() -> (ResultSender, PendingResult) {
    let (tx, rx) = oneshot::channel();
    (ResultSender { tx }, PendingResult { rx: Some(rx) })
}

/// Producing half, moved into the background task.
#[derive(Debug)]
pub struct ResultSender {
    tx: oneshot::Sender<Outcome>,
}

impl ResultSender {
    /// Delivers the outcome. Returns `false` if the request was abandoned and
    /// nobody is listening any more.
    pub fn send(self, outcome: Outcome) -> bool {
        match self.tx.send(outcome) {
            Ok(()) => true,
            Err(_) => {
                debug!("Result receiver dropped, discarding outcome");
                false
            }
        }
    }

    /// Whether the receiving side has already been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half, owned by the pending request in `App`.
#[derive(Debug)]
pub struct PendingResult {
    rx: Option<oneshot::Receiver<Outcome>>,
}

impl PendingResult {
    /// Non-blocking check for the outcome.
    ///
    /// Yields at most one `Some`. A sender dropped without sending shows up
    /// as `Err(ProviderError::WorkerLost)`.
    pub fn poll(&mut self) -> Option<Outcome> {
        let rx = self.rx.as_mut()?;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Err(ProviderError::WorkerLost),
        };
        self.rx = None;
        Some(outcome)
    }
}
