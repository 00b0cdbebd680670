//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::core::action::{Action, KeyInput, update};
use crate::core::editor::EditKey;
use crate::core::state::{App, ChatConfig};
use crate::inference::{Provider, ProviderError};

/// A provider that answers every prompt the same way without spawning anything.
pub struct StaticProvider {
    name: String,
    reply: Result<String, String>,
    calls: Arc<AtomicUsize>,
}

impl StaticProvider {
    pub fn ok(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: Ok(text.to_string()),
            calls: Arc::default(),
        }
    }

    /// Fails with `ProviderError::Failed` carrying `status`.
    pub fn err(name: &str, status: &str) -> Self {
        Self {
            name: name.to_string(),
            reply: Err(status.to_string()),
            calls: Arc::default(),
        }
    }

    /// Shared count of `invoke` calls, readable after the provider is moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Provider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ProviderError::Failed {
                status: status.clone(),
                stderr: String::new(),
            }),
        }
    }
}

/// Creates an idle, focused App talking to a provider named "static".
pub fn test_app() -> App {
    App::new(ChatConfig {
        provider: "static".to_string(),
        theme: "dark".to_string(),
    })
}

/// Types `text` into the editor through the reducer, one key at a time.
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        let key = match c {
            '\n' => EditKey::Newline,
            c => EditKey::Char(c),
        };
        update(app, Action::Key(KeyInput::Edit(key)));
    }
}
