use serde::{Deserialize, Serialize};

/// Which backing service a reasoning provider talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Anthropic messages API (premium cloud tier).
    Anthropic,
    /// OpenAI chat completions API (secondary cloud tier).
    OpenAi,
    /// Local Ollama instance.
    Ollama,
}

/// Descriptor for a selectable reasoning provider.
///
/// Immutable after the startup probe except `available`, which a re-probe
/// may flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Stable identifier operators pin with (e.g. "claude-sonnet").
    pub id: String,
    /// Backing service kind.
    pub kind: ProviderKind,
    /// Human-readable label for reports and listings.
    pub label: String,
    /// Whether the provider can currently serve calls.
    pub available: bool,
    /// Auto-selection rank; lower wins.
    pub priority: u8,
}
