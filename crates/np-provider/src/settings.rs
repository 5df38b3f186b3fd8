//! Provider configuration and credential loading.

use serde::Deserialize;

/// Settings for all provider clients, loadable from the `[providers]`
/// section of the pilot config.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// Anthropic API base URL (overridable for tests).
    #[serde(default = "default_anthropic_base")]
    pub anthropic_base_url: String,
    /// Anthropic model id.
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    /// OpenAI API base URL.
    #[serde(default = "default_openai_base")]
    pub openai_base_url: String,
    /// OpenAI model id.
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Ollama HTTP API base URL.
    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,
    /// Ollama model to use.
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum tokens requested from cloud providers.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_anthropic_base() -> String {
    "https://api.anthropic.com".into()
}
fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".into()
}
fn default_openai_base() -> String {
    "https://api.openai.com".into()
}
fn default_openai_model() -> String {
    "gpt-4o-mini".into()
}
fn default_ollama_host() -> String {
    "http://localhost:11434".into()
}
fn default_ollama_model() -> String {
    "llama3.3".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_tokens() -> u32 {
    3000
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            anthropic_base_url: default_anthropic_base(),
            anthropic_model: default_anthropic_model(),
            openai_base_url: default_openai_base(),
            openai_model: default_openai_model(),
            ollama_host: default_ollama_host(),
            ollama_model: default_ollama_model(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// API credentials, read from the process environment.
///
/// A missing key is not an error; it only excludes the provider from the
/// selectable set.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl ProviderCredentials {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.ollama_host, "http://localhost:11434");
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.max_tokens, 3000);
    }

    #[test]
    fn settings_partial_deserialization() {
        let json = r#"{"ollama_model": "phi3:mini", "timeout_secs": 5}"#;
        let settings: ProviderSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.ollama_model, "phi3:mini");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.openai_model, "gpt-4o-mini"); // default
    }
}
