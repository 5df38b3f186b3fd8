//! Local Ollama provider — chat API over plain HTTP.

use serde::{Deserialize, Serialize};

use np_protocol::{ProviderDescriptor, ProviderKind};

use crate::error::ProviderError;
use crate::settings::ProviderSettings;
use crate::{Prompt, ReasoningProvider};

/// Stable id operators use to pin this provider.
pub const OLLAMA_ID: &str = "llama-local";

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Ollama chat API response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local Ollama instance.
pub struct OllamaProvider {
    descriptor: ProviderDescriptor,
    client: reqwest::Client,
    host: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Call(format!("failed to build http client: {e}")))?;
        Ok(Self {
            descriptor: ProviderDescriptor {
                id: OLLAMA_ID.into(),
                kind: ProviderKind::Ollama,
                label: format!("{} (Ollama, local)", settings.ollama_model),
                available: false,
                priority: 2,
            },
            client,
            host: settings.ollama_host.clone(),
            model: settings.ollama_model.clone(),
            timeout_secs: settings.timeout_secs,
        })
    }

    /// Probe the local instance. Availability means `/api/tags` answers.
    pub async fn probe(&mut self) -> bool {
        let url = format!("{}/api/tags", self.host);
        let available = match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "ollama probe failed");
                false
            }
        };
        self.descriptor.available = available;
        available
    }
}

#[async_trait::async_trait]
impl ReasoningProvider for OllamaProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.host);

        let mut messages = Vec::new();
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::Call(format!("ollama request failed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(ProviderError::Call(format!(
                "ollama returned {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Call(format!("invalid ollama response body: {e}")))?;

        chat.message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::Call("ollama returned an empty reply".into()))
    }
}
