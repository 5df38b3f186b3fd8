//! Mock reasoning provider for tests.
//!
//! Scripted reply queue plus prompt recording, so tests can assert on what
//! the pipeline sent without any network.

use std::sync::Mutex;

use np_protocol::{ProviderDescriptor, ProviderKind};

use crate::error::ProviderError;
use crate::{Prompt, ReasoningProvider};

/// Scripted provider with recorded prompts.
pub struct MockProvider {
    descriptor: ProviderDescriptor,
    /// Queued replies returned by `generate` (FIFO). An `Err` entry makes
    /// that call fail.
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    /// All prompts passed to `generate` (for test assertions).
    prompts: Mutex<Vec<Prompt>>,
}

impl MockProvider {
    pub fn new(id: &str, priority: u8, available: bool) -> Self {
        Self {
            descriptor: ProviderDescriptor {
                id: id.into(),
                kind: ProviderKind::Ollama,
                label: format!("{id} (mock)"),
                available,
                priority,
            },
            replies: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push(Ok(reply.into()));
        self
    }

    /// Queue a failing call.
    pub fn with_error(self, err: ProviderError) -> Self {
        self.replies.lock().unwrap().push(Err(err));
        self
    }

    /// Prompts seen so far, in call order.
    pub fn recorded_prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ReasoningProvider for MockProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ProviderError::Call("mock reply queue exhausted".into()));
        }
        replies.remove(0)
    }
}
