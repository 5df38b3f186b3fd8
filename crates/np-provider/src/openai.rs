//! OpenAI chat completions API provider.

use serde::{Deserialize, Serialize};

use np_protocol::{ProviderDescriptor, ProviderKind};

use crate::error::ProviderError;
use crate::settings::ProviderSettings;
use crate::{Prompt, ReasoningProvider};

/// Stable id operators use to pin this provider.
pub const OPENAI_ID: &str = "gpt-4o-mini";

/// Chat completions request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completions response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the OpenAI chat completions API.
pub struct OpenAiProvider {
    descriptor: ProviderDescriptor,
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    timeout_secs: u64,
}

impl OpenAiProvider {
    /// Availability is decided here: present credentials mean available.
    pub fn new(settings: &ProviderSettings, api_key: Option<&str>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Call(format!("failed to build http client: {e}")))?;
        Ok(Self {
            descriptor: ProviderDescriptor {
                id: OPENAI_ID.into(),
                kind: ProviderKind::OpenAi,
                label: format!("{} (OpenAI)", settings.openai_model),
                available: api_key.is_some(),
                priority: 1,
            },
            client,
            base_url: settings.openai_base_url.clone(),
            model: settings.openai_model.clone(),
            api_key: api_key.unwrap_or_default().to_string(),
            max_tokens: settings.max_tokens,
            timeout_secs: settings.timeout_secs,
        })
    }
}

#[async_trait::async_trait]
impl ReasoningProvider for OpenAiProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        if !self.descriptor.available {
            return Err(ProviderError::Unavailable(self.descriptor.id.clone()));
        }

        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut messages = Vec::new();
        if let Some(system) = &prompt.system {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &prompt.user,
        });

        let body = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Call(format!("openai request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Call(format!(
                "openai returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Call(format!("invalid openai response body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProviderError::Call("openai returned no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> ProviderSettings {
        ProviderSettings {
            openai_base_url: server.uri(),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn generate_extracts_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "show version"}}]
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&settings_for(&server), Some("sk-test")).unwrap();
        let reply = provider.generate(&Prompt::new("what version?")).await.unwrap();
        assert_eq!(reply, "show version");
    }

    #[tokio::test]
    async fn empty_choices_is_call_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new(&settings_for(&server), Some("sk-test")).unwrap();
        let err = provider.generate(&Prompt::new("hi")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Call(_)));
    }

    #[tokio::test]
    async fn missing_key_means_unavailable() {
        let server = MockServer::start().await;
        let provider = OpenAiProvider::new(&settings_for(&server), None).unwrap();
        assert!(!provider.descriptor().available);
    }
}
