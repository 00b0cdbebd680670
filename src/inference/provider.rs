use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::template::TemplateError;

/// Errors that can occur while invoking a provider.
///
/// Every variant is recoverable: the event loop turns it into a single error
/// entry in the transcript and stays interactive.
#[derive(Debug)]
pub enum ProviderError {
    /// No provider is registered under this id. Nothing was spawned.
    UnknownProvider(String),
    /// The provider's command template could not be rendered.
    Template(TemplateError),
    /// The rendered command line contained no tokens.
    EmptyCommand,
    /// The child process could not be started.
    Spawn { program: String, source: io::Error },
    /// The child process exited unsuccessfully.
    Failed { status: String, stderr: String },
    /// The child process succeeded but printed nothing usable.
    EmptyOutput,
    /// The background task ended without delivering a result.
    WorkerLost,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::UnknownProvider(name) => write!(f, "unknown provider: {name}"),
            ProviderError::Template(e) => write!(f, "template error: {e}"),
            ProviderError::EmptyCommand => write!(f, "provider command is empty"),
            ProviderError::Spawn { program, source } => {
                write!(f, "failed to start '{program}': {source}")
            }
            ProviderError::Failed { status, stderr } => {
                if stderr.is_empty() {
                    write!(f, "{status}")
                } else {
                    write!(f, "{status}: {stderr}")
                }
            }
            ProviderError::EmptyOutput => write!(f, "provider returned no output"),
            ProviderError::WorkerLost => write!(f, "provider task ended without a result"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Template(e) => Some(e),
            ProviderError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TemplateError> for ProviderError {
    fn from(e: TemplateError) -> Self {
        ProviderError::Template(e)
    }
}

/// An external AI tool that answers a prompt.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the id the provider is registered under.
    fn name(&self) -> &str;

    /// A human-readable description of what gets run (for `--list-providers`).
    fn describe(&self) -> String {
        self.name().to_string()
    }

    /// Answers a single prompt. Blocks the calling task until the tool exits.
    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Providers selectable by id.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a provider under its own name, replacing any previous entry.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        let name = provider.name().to_string();
        if self.providers.insert(name.clone(), provider).is_some() {
            debug!("Provider '{}' replaced", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered ids in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Provider>> {
        self.providers.values()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.providers.keys()).finish()
    }
}

/// Looks up `provider_id` and runs the prompt through it.
pub async fn invoke(
    registry: &ProviderRegistry,
    provider_id: &str,
    prompt: &str,
) -> Result<String, ProviderError> {
    let Some(provider) = registry.get(provider_id) else {
        warn!("Invocation requested for unknown provider '{}'", provider_id);
        return Err(ProviderError::UnknownProvider(provider_id.to_string()));
    };
    provider.invoke(prompt).await
}
