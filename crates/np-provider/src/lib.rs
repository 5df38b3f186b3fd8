//! Reasoning provider adapter.
//!
//! One `ReasoningProvider` seam over three backing services — the Anthropic
//! messages API, the OpenAI chat API, and a local Ollama instance — with
//! startup availability probing and priority-ordered auto-selection.
//! A turn is served by exactly one provider; there is no silent fallback
//! mid-turn.

pub mod error;
pub mod mock;
pub mod registry;
pub mod settings;

mod anthropic;
mod ollama;
mod openai;

use async_trait::async_trait;
use np_protocol::ProviderDescriptor;

pub use anthropic::AnthropicProvider;
pub use error::ProviderError;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use registry::ProviderRegistry;
pub use settings::{ProviderCredentials, ProviderSettings};

/// A text prompt with an optional system preamble.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    pub fn with_system(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }
}

/// External text-generation capability.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Static identity and availability of this provider.
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Generate text for a prompt. Bounded by the per-call timeout.
    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError>;
}
