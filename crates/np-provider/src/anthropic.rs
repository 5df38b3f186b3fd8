//! Anthropic messages API provider.

use serde::{Deserialize, Serialize};

use np_protocol::{ProviderDescriptor, ProviderKind};

use crate::error::ProviderError;
use crate::settings::ProviderSettings;
use crate::{Prompt, ReasoningProvider};

/// Stable id operators use to pin this provider.
pub const ANTHROPIC_ID: &str = "claude-sonnet";

const API_VERSION: &str = "2023-06-01";

/// Messages API request body.
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Messages API response (only fields we need).
#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Client for the Anthropic messages API.
pub struct AnthropicProvider {
    descriptor: ProviderDescriptor,
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    timeout_secs: u64,
}

impl AnthropicProvider {
    /// Availability is decided here: present credentials mean available.
    pub fn new(settings: &ProviderSettings, api_key: Option<&str>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Call(format!("failed to build http client: {e}")))?;
        Ok(Self {
            descriptor: ProviderDescriptor {
                id: ANTHROPIC_ID.into(),
                kind: ProviderKind::Anthropic,
                label: format!("{} (Anthropic)", settings.anthropic_model),
                available: api_key.is_some(),
                priority: 0,
            },
            client,
            base_url: settings.anthropic_base_url.clone(),
            model: settings.anthropic_model.clone(),
            api_key: api_key.unwrap_or_default().to_string(),
            max_tokens: settings.max_tokens,
            timeout_secs: settings.timeout_secs,
        })
    }
}

#[async_trait::async_trait]
impl ReasoningProvider for AnthropicProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        if !self.descriptor.available {
            return Err(ProviderError::Unavailable(self.descriptor.id.clone()));
        }

        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: prompt.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &prompt.user,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Call(format!("anthropic request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Call(format!(
                "anthropic returned {}",
                response.status()
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Call(format!("invalid anthropic response body: {e}")))?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProviderError::Call("anthropic returned no text content".into()))
    }
}
