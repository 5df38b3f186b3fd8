//! Post-execution analysis of captured device output.

use np_protocol::ExecutionResult;
use np_provider::{Prompt, ProviderError, ReasoningProvider};

/// Per-command output cap in the analysis prompt. `show tech-support`
/// class commands can exceed the model context many times over.
const OUTPUT_PROMPT_MAX_CHARS: usize = 2000;

const ANALYZE_SYSTEM_PROMPT: &str = "\
You are an expert Cisco NX-OS network engineer reviewing command output
for an operator. Summarize what the output shows, answer the operator's
original question directly, and call out anything abnormal (down links,
errors, flapping neighbors, resource pressure). Be concise; plain text
only.";

/// Ask `provider` to interpret the turn's output against the original
/// request. Failure here never fails the turn; the caller degrades to a
/// report without analysis.
pub async fn analyze(
    provider: &dyn ReasoningProvider,
    request: &str,
    results: &[ExecutionResult],
) -> Result<String, ProviderError> {
    let mut user = format!("Operator request: {request}\n\nCommand output:\n");
    for result in results {
        user.push_str(&format!(
            "$ {} [{:?}]\n{}\n\n",
            result.executed_text(),
            result.status,
            truncate(&result.output, OUTPUT_PROMPT_MAX_CHARS)
        ));
    }

    provider
        .generate(&Prompt::with_system(ANALYZE_SYSTEM_PROMPT, user))
        .await
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{kept}\n[output truncated]")
}
