//! Provider registry — probed availability and priority-ordered selection.

use np_protocol::ProviderDescriptor;

use crate::error::ProviderError;
use crate::settings::{ProviderCredentials, ProviderSettings};
use crate::{AnthropicProvider, OllamaProvider, OpenAiProvider, ReasoningProvider};

/// The selectable set of reasoning providers.
///
/// Built once at startup. Cloud providers are available iff their API key
/// is present; the local provider iff its HTTP endpoint answers the probe.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn ReasoningProvider>>,
}

impl ProviderRegistry {
    /// Probe all known backing services and build the registry.
    pub async fn probe(
        credentials: &ProviderCredentials,
        settings: &ProviderSettings,
    ) -> Result<Self, ProviderError> {
        let anthropic =
            AnthropicProvider::new(settings, credentials.anthropic_api_key.as_deref())?;
        let openai = OpenAiProvider::new(settings, credentials.openai_api_key.as_deref())?;
        let mut ollama = OllamaProvider::new(settings)?;
        ollama.probe().await;

        let registry = Self::from_providers(vec![
            Box::new(anthropic),
            Box::new(openai),
            Box::new(ollama),
        ]);

        for desc in registry.list() {
            tracing::info!(
                provider = %desc.id,
                available = desc.available,
                priority = desc.priority,
                "provider probed"
            );
        }

        Ok(registry)
    }

    /// Build a registry from pre-constructed providers (tests, embedding).
    pub fn from_providers(mut providers: Vec<Box<dyn ReasoningProvider>>) -> Self {
        providers.sort_by_key(|p| p.descriptor().priority);
        Self { providers }
    }

    /// Descriptors in priority order.
    pub fn list(&self) -> Vec<ProviderDescriptor> {
        self.providers.iter().map(|p| p.descriptor().clone()).collect()
    }

    /// Pick the provider for a turn.
    ///
    /// A pinned id must name an available provider or the call fails with
    /// `Unavailable` — there is no fallback for pinned selections. With no
    /// pin, the highest-priority available provider wins.
    pub fn select(&self, pinned: Option<&str>) -> Result<&dyn ReasoningProvider, ProviderError> {
        match pinned {
            Some(id) => self
                .providers
                .iter()
                .find(|p| p.descriptor().id == id)
                .filter(|p| p.descriptor().available)
                .map(|p| p.as_ref())
                .ok_or_else(|| ProviderError::Unavailable(id.to_string())),
            None => self
                .providers
                .iter()
                .find(|p| p.descriptor().available)
                .map(|p| p.as_ref())
                .ok_or(ProviderError::NoneAvailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    fn mock(id: &str, priority: u8, available: bool) -> Box<dyn ReasoningProvider> {
        Box::new(MockProvider::new(id, priority, available).with_reply("ok"))
    }

    #[test]
    fn list_is_priority_ordered() {
        let registry = ProviderRegistry::from_providers(vec![
            mock("local", 2, true),
            mock("premium", 0, true),
            mock("secondary", 1, false),
        ]);
        let ids: Vec<String> = registry.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["premium", "secondary", "local"]);
    }

    #[test]
    fn default_selection_prefers_highest_priority_available() {
        let registry = ProviderRegistry::from_providers(vec![
            mock("premium", 0, false),
            mock("secondary", 1, true),
            mock("local", 2, true),
        ]);
        let selected = registry.select(None).unwrap();
        assert_eq!(selected.descriptor().id, "secondary");
    }

    #[test]
    fn pinned_unavailable_fails_without_fallback() {
        let registry = ProviderRegistry::from_providers(vec![
            mock("premium", 0, false),
            mock("local", 2, true),
        ]);
        let err = registry.select(Some("premium")).err().unwrap();
        assert!(matches!(err, ProviderError::Unavailable(ref id) if id == "premium"));
    }

    #[test]
    fn pinned_unknown_id_fails() {
        let registry = ProviderRegistry::from_providers(vec![mock("local", 2, true)]);
        let err = registry.select(Some("nope")).err().unwrap();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn no_available_provider_is_none_available() {
        let registry = ProviderRegistry::from_providers(vec![
            mock("premium", 0, false),
            mock("local", 2, false),
        ]);
        assert!(matches!(
            registry.select(None),
            Err(ProviderError::NoneAvailable)
        ));
    }
}
