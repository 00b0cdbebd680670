pub mod provider;
pub mod providers;
pub mod template;

pub use provider::{Provider, ProviderError, ProviderRegistry, invoke};
pub use providers::CommandProvider;
pub use template::{CommandTemplate, TemplateError};
