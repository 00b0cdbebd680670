//! Command-line provider.
//!
//! Runs an external AI tool as a child process:
//!
//! ```text
//! system_prompt + prompt → template → whitespace split → spawn → wait → stdout
//! ```
//!
//! The template is parsed on every invocation so a bad template surfaces as a
//! recoverable `ProviderError::Template` rather than a panic. Startup config
//! validation parses custom templates once up front as well.

use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::process::Command;

use crate::inference::provider::{Provider, ProviderError};
use crate::inference::template::{CommandTemplate, tokenize};

/// A provider backed by a command template such as `cursor-agent {{prompt}}`.
#[derive(Debug, Clone)]
pub struct CommandProvider {
    name: String,
    template: String,
    system_prompt: Option<String>,
}

impl CommandProvider {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            system_prompt: None,
        }
    }

    /// Text prepended verbatim to every prompt before templating.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        self.system_prompt = (!system_prompt.is_empty()).then_some(system_prompt);
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Build the argv for a prompt without running anything.
    pub fn command_line(&self, prompt: &str) -> Result<Vec<String>, ProviderError> {
        let template = CommandTemplate::parse(&self.template)?;
        let request = match &self.system_prompt {
            Some(prefix) => format!("{prefix}{prompt}"),
            None => prompt.to_string(),
        };
        let argv = tokenize(&template.render(&request));
        if argv.is_empty() {
            return Err(ProviderError::EmptyCommand);
        }
        Ok(argv)
    }
}

#[async_trait]
impl Provider for CommandProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        match &self.system_prompt {
            Some(_) => format!("{} (with system prompt)", self.template),
            None => self.template.clone(),
        }
    }

    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError> {
        let argv = self.command_line(prompt)?;
        let (program, args) = argv.split_first().ok_or(ProviderError::EmptyCommand)?;
        info!(
            "Provider '{}' spawning '{}' with {} args",
            self.name,
            program,
            args.len()
        );

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ProviderError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("Provider '{}' failed: {}", self.name, output.status);
            return Err(ProviderError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(
            "Provider '{}' finished: {} bytes of output",
            self.name,
            stdout.len()
        );
        if stdout.is_empty() {
            return Err(ProviderError::EmptyOutput);
        }
        Ok(stdout)
    }
}
