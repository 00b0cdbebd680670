//! schat: a terminal chat client for command-line AI tools.
//!
//! - [`inference`]: providers that run external AI commands
//! - [`core`]: state, reducer, bridge and config; no terminal code
//! - [`markdown`] and [`theme`]: turning replies into styled text
//! - [`tui`]: the ratatui front end and its event loop

pub mod core;
pub mod inference;
pub mod markdown;
pub mod theme;
pub mod tui;

#[cfg(test)]
pub mod test_support;
