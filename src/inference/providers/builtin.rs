//! Providers that ship with schat.
//!
//! Each id maps to its own command. Config can override the command or the
//! system prompt of a built-in, or add new providers alongside them.

use super::command::CommandProvider;

pub const OPENCODE_ID: &str = "opencode-cli";
pub const OPENCODE_COMMAND: &str = "bunx opencode-ai run {{prompt}}";
pub const OPENCODE_SYSTEM_PROMPT: &str =
    "Always return output in markdown format. Do not use any tools without explicit request. ";

pub const CURSOR_ID: &str = "cursor";
pub const CURSOR_COMMAND: &str = "cursor-agent {{prompt}}";

pub const DEFAULT_PROVIDER: &str = OPENCODE_ID;

pub fn opencode() -> CommandProvider {
    CommandProvider::new(OPENCODE_ID, OPENCODE_COMMAND).with_system_prompt(OPENCODE_SYSTEM_PROMPT)
}

pub fn cursor() -> CommandProvider {
    CommandProvider::new(CURSOR_ID, CURSOR_COMMAND)
}

/// All built-in providers, unmodified.
pub fn builtins() -> Vec<CommandProvider> {
    vec![opencode(), cursor()]
}
