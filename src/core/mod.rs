//! # Core Application Logic
//!
//! This module contains schat's business logic.
//! It knows nothing about terminals: no crossterm, no frames.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!               ┌────────────────┴────────────────┐
//!               ▼                                 ▼
//!        ┌────────────┐                    ┌────────────┐
//!        │    TUI     │                    │ tokio task │
//!        │  Adapter   │◀──── bridge ───────│ (provider) │
//!        │ (ratatui)  │                    │            │
//!        └────────────┘                    └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`bridge`]: One-shot handoff of provider results to the UI loop
//! - [`transcript`]: The append-only conversation log
//! - [`editor`]: The unsent draft and its editing mechanics
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod bridge;
pub mod config;
pub mod editor;
pub mod state;
pub mod transcript;
