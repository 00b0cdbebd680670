//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.schat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Providers are built-ins (`opencode-cli`, `cursor`) plus anything declared
//! under `[providers.<id>]`. A section named after a built-in overrides
//! its command or system prompt; any other id adds a new provider.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::state::ChatConfig;
use crate::inference::providers::builtin::{self, DEFAULT_PROVIDER};
use crate::inference::{
    CommandProvider, CommandTemplate, Provider, ProviderRegistry, TemplateError,
};
use crate::theme::DEFAULT_THEME;

pub const PROVIDER_ENV: &str = "SCHAT_PROVIDER";
pub const THEME_ENV: &str = "SCHAT_THEME";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_provider: Option<String>,
    pub theme: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Command template; must reference `{{prompt}}`.
    pub command: Option<String>,
    /// Text prepended verbatim to every prompt.
    pub system_prompt: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: String,
    pub theme: String,
    pub log_level: LevelFilter,
    pub providers: BTreeMap<String, ProviderConfig>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    UnknownProvider { name: String, known: Vec<String> },
    InvalidTemplate { provider: String, source: TemplateError },
    /// A custom provider section without a `command`.
    MissingCommand(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::UnknownProvider { name, known } => write!(
                f,
                "Invalid provider '{name}'. Valid options are: {}",
                known.join(", ")
            ),
            ConfigError::InvalidTemplate { provider, source } => {
                write!(f, "invalid command for provider '{provider}': {source}")
            }
            ConfigError::MissingCommand(provider) => {
                write!(f, "provider '{provider}' has no command")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::InvalidTemplate { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the directory holding config and log: `~/.schat`.
pub fn schat_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".schat"))
}

/// Returns the path to `~/.schat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    schat_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.schat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SchatConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(SchatConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<SchatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(SchatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r#"# schat configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_provider = "opencode-cli"   # or SCHAT_PROVIDER, or --provider
# theme = "dark"                      # "dark", "light" or "notty"; or SCHAT_THEME, or --theme
# log_level = "info"                  # "off", "error", "warn", "info", "debug", "trace"

# Override a built-in provider. {{prompt}} is replaced by the prompt text.
# [providers.opencode-cli]
# command = "bunx opencode-ai run {{prompt}}"
# system_prompt = "Always return output in markdown format. "

# [providers.cursor]
# command = "cursor-agent {{prompt}}"

# Add a provider of your own.
# [providers.llm]
# command = "llm {{prompt}}"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_provider` and `cli_theme` are from CLI flags (None = not specified).
pub fn resolve(
    config: &SchatConfig,
    cli_provider: Option<&str>,
    cli_theme: Option<&str>,
) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli_provider
        .map(|s| s.to_string())
        .or_else(|| non_empty_env(PROVIDER_ENV))
        .or_else(|| config.general.default_provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    // Theme: CLI → env → config → default
    let theme = cli_theme
        .map(|s| s.to_string())
        .or_else(|| non_empty_env(THEME_ENV))
        .or_else(|| config.general.theme.clone())
        .unwrap_or_else(|| DEFAULT_THEME.to_string());

    let log_level = match config.general.log_level.as_deref() {
        None => DEFAULT_LOG_LEVEL,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using {}", raw, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
    };

    ResolvedConfig {
        provider,
        theme,
        log_level,
        providers: config.providers.clone(),
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Builds the provider registry: built-ins first, then config overrides
/// and custom providers on top.
pub fn build_registry(
    providers: &BTreeMap<String, ProviderConfig>,
) -> Result<ProviderRegistry, ConfigError> {
    let mut registry = ProviderRegistry::new();
    for provider in builtin::builtins() {
        let provider = match providers.get(provider.name()) {
            Some(over) => apply_override(provider, over)?,
            None => provider,
        };
        registry.register(Arc::new(provider));
    }

    for (id, entry) in providers {
        if registry.contains(id) {
            continue;
        }
        let command = entry
            .command
            .as_deref()
            .ok_or_else(|| ConfigError::MissingCommand(id.clone()))?;
        validate_template(id, command)?;
        let provider = CommandProvider::new(id, command)
            .with_system_prompt(entry.system_prompt.as_deref().unwrap_or_default());
        info!("Registered custom provider '{}'", id);
        registry.register(Arc::new(provider));
    }

    Ok(registry)
}

fn apply_override(
    provider: CommandProvider,
    over: &ProviderConfig,
) -> Result<CommandProvider, ConfigError> {
    let name = provider.name().to_string();
    let command = match over.command.as_deref() {
        Some(command) => {
            validate_template(&name, command)?;
            command.to_string()
        }
        None => provider.template().to_string(),
    };
    let system_prompt = match over.system_prompt.as_deref() {
        Some(prompt) => prompt.to_string(),
        None => provider.system_prompt().unwrap_or_default().to_string(),
    };
    debug!("Provider '{}' overridden by config", name);
    Ok(CommandProvider::new(&name, &command).with_system_prompt(&system_prompt))
}

fn validate_template(provider: &str, command: &str) -> Result<(), ConfigError> {
    CommandTemplate::parse(command)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidTemplate {
            provider: provider.to_string(),
            source,
        })
}

/// Turns resolved settings into session state plus the providers to run.
///
/// Fails if the selected provider isn't registered.
pub fn build_session(
    resolved: &ResolvedConfig,
) -> Result<(ChatConfig, ProviderRegistry), ConfigError> {
    let registry = build_registry(&resolved.providers)?;
    if !registry.contains(&resolved.provider) {
        return Err(ConfigError::UnknownProvider {
            name: resolved.provider.clone(),
            known: registry.names(),
        });
    }

    let chat = ChatConfig {
        provider: resolved.provider.clone(),
        theme: resolved.theme.clone(),
    };
    Ok((chat, registry))
}
