//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates key presses into core `Action`s and carries out the
//! `Effect`s the reducer returns.
//!
//! This is the only module that knows about crossterm.
//!
//! ## Loop Strategy
//!
//! ```text
//! draw (if dirty) → wait for input ≤ next tick → drain all input → fire due ticks
//! ```
//!
//! - **Pending**: wakes every 50ms to poll the bridge and every 80ms to
//!   advance the spinner.
//! - **Idle**: sleeps up to 500ms and only redraws on input or resize.
//!
//! Provider calls run as tokio tasks. The loop never awaits them; it only
//! ever asks the bridge whether a result has arrived.

mod component;
pub mod components;
pub mod event;
pub mod ui;

use log::{debug, info};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;

use crate::core::action::{Action, Effect, Invocation, KeyInput, Tick, update};
use crate::core::state::App;
use crate::inference::{self, ProviderRegistry};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

pub const SPINNER_INTERVAL: Duration = Duration::from_millis(80);
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
#[derive(Debug, Default)]
pub struct TuiState {
    /// Lines the transcript is scrolled up from its tail.
    pub scroll_back: u16,
    /// Transcript length when `scroll_back` was last reset.
    seen_entries: usize,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump back to the tail whenever the transcript changes length.
    pub fn sync(&mut self, transcript_len: usize) {
        if transcript_len != self.seen_entries {
            self.seen_entries = transcript_len;
            self.scroll_back = 0;
        }
    }

    pub fn scroll_up(&mut self, lines: u16, max: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines).min(max);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }
}

/// Spinner and poll timers. Both run only while a request is pending.
#[derive(Debug)]
pub struct Ticker {
    active: bool,
    next_spinner: Instant,
    next_poll: Instant,
}

impl Ticker {
    pub fn new(now: Instant) -> Self {
        Self {
            active: false,
            next_spinner: now,
            next_poll: now,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.active = true;
        self.next_spinner = now + SPINNER_INTERVAL;
        self.next_poll = now + POLL_INTERVAL;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// How long input polling may block before a tick is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        if !self.active {
            return IDLE_TIMEOUT;
        }
        self.next_spinner
            .min(self.next_poll)
            .saturating_duration_since(now)
    }

    /// Ticks that are due at `now`, poll first. Each fires at most once.
    pub fn due(&mut self, now: Instant) -> Vec<Tick> {
        let mut ticks = Vec::new();
        if !self.active {
            return ticks;
        }
        if now >= self.next_poll {
            ticks.push(Tick::Poll);
            self.next_poll = now + POLL_INTERVAL;
        }
        if now >= self.next_spinner {
            ticks.push(Tick::Spinner);
            self.next_spinner = now + SPINNER_INTERVAL;
        }
        ticks
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // The Kitty protocol is harmlessly ignored by terminals without support
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Whether the loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs the chat UI until the user quits.
///
/// Must be called from inside a multi-threaded tokio runtime: provider
/// calls are spawned onto it while this thread drives the terminal.
pub fn run(mut app: App, registry: ProviderRegistry) -> io::Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = TerminalModeGuard::new()
        .and_then(|_guard| event_loop(&mut terminal, &mut app, &registry));
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    registry: &ProviderRegistry,
) -> io::Result<()> {
    let mut tui = TuiState::new();
    let mut ticker = Ticker::new(Instant::now());

    // First frame before we know the size
    terminal.draw(|f| ui::draw_ui(f, app, &tui))?;
    let size = terminal.size()?;
    dispatch(
        app,
        Action::Resize {
            width: size.width,
            height: size.height,
        },
        registry,
        &mut ticker,
    );
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            tui.sync(app.transcript.len());
            terminal.draw(|f| ui::draw_ui(f, app, &tui))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let mut next = poll_event_timeout(ticker.timeout(Instant::now()))?;
        while let Some(event) = next {
            needs_redraw = true;
            let action = match event {
                TuiEvent::Send => Action::Key(KeyInput::Send),
                TuiEvent::Quit => Action::Quit,
                TuiEvent::Clear => Action::Key(KeyInput::Clear),
                TuiEvent::Escape => Action::Key(KeyInput::CancelEdit),
                TuiEvent::Edit(key) => Action::Key(KeyInput::Edit(key)),
                TuiEvent::Resize(width, height) => Action::Resize { width, height },
                TuiEvent::ScrollUp(lines) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    tui.sync(app.transcript.len());
                    tui.scroll_up(lines, ui::max_scroll_back(app, area));
                    next = poll_event_immediate()?;
                    continue;
                }
                TuiEvent::ScrollDown(lines) => {
                    tui.scroll_down(lines);
                    next = poll_event_immediate()?;
                    continue;
                }
            };
            if dispatch(app, action, registry, &mut ticker) == Flow::Quit {
                return Ok(());
            }
            next = poll_event_immediate()?;
        }

        for tick in ticker.due(Instant::now()) {
            needs_redraw = true;
            if dispatch(app, Action::Tick(tick), registry, &mut ticker) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

/// Feeds one action to the reducer and performs the resulting effects.
fn dispatch(
    app: &mut App,
    action: Action,
    registry: &ProviderRegistry,
    ticker: &mut Ticker,
) -> Flow {
    let mut flow = Flow::Continue;
    for effect in update(app, action) {
        match effect {
            Effect::Invoke(invocation) => spawn_invocation(registry, invocation),
            Effect::SchedulePoll => ticker.start(Instant::now()),
            Effect::CancelPoll => ticker.stop(),
            Effect::Quit => flow = Flow::Quit,
        }
    }
    flow
}

fn spawn_invocation(registry: &ProviderRegistry, invocation: Invocation) {
    let registry = registry.clone();
    let Invocation {
        request_id,
        provider,
        prompt,
        reply,
    } = invocation;
    info!("Spawning request {} on provider '{}'", request_id, provider);

    tokio::spawn(async move {
        if reply.is_abandoned() {
            debug!("Request {} abandoned before it started", request_id);
            return;
        }
        let outcome = inference::invoke(&registry, &provider, &prompt).await;
        if let Err(e) = &outcome {
            info!("Request {} failed: {}", request_id, e);
        }
        if !reply.send(outcome) {
            debug!("Request {} was abandoned, result discarded", request_id);
        }
    });
}
