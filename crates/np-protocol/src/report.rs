use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plan::CommandPlan;

/// Outcome of one executed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Success,
    SyntaxError,
    Failure,
}

/// Result of running one planned command on the device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Command as planned (pre-correction).
    pub command: String,
    /// Corrected text, present only when a syntax-fix retry was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected: Option<String>,
    /// Final status after any retry.
    pub status: CommandStatus,
    /// Captured device output (of the retry, when one happened).
    pub output: String,
}

impl ExecutionResult {
    /// The text that actually ran last: corrected form if any, else the
    /// planned command.
    pub fn executed_text(&self) -> &str {
        self.corrected.as_deref().unwrap_or(&self.command)
    }
}

/// How the turn ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TurnOutcome {
    /// Plan executed (possibly with per-command failures).
    Completed,
    /// Operator declined the configuration confirmation. Not an error.
    Rejected,
    /// The turn aborted before execution.
    Failed { kind: String, message: String },
}

/// Complete record of one turn: plan, per-command results, analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Turn id (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Target identity, "hostname (address)".
    pub target: String,
    /// Original operator request.
    pub request: String,
    /// Label of the provider that served the turn, if one was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// The gated plan (empty when translation failed).
    pub plan: CommandPlan,
    /// One entry per planned command for executed turns; empty otherwise.
    pub results: Vec<ExecutionResult>,
    /// Analyzer text; `None` means analysis was unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    pub outcome: TurnOutcome,
}

/// Marker rendered when the analyzer could not produce text.
pub const ANALYSIS_UNAVAILABLE: &str = "analysis unavailable";

impl SessionReport {
    /// Render the report artifact.
    ///
    /// Header field order is part of the contract: generated-time, target,
    /// request, provider.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# NexPilot Session Report\n");
        out.push_str(&format!(
            "**Generated:** {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("**Target:** {}\n", self.target));
        out.push_str(&format!("**Request:** {}\n", self.request));
        out.push_str(&format!(
            "**Provider:** {}\n",
            self.provider.as_deref().unwrap_or("none")
        ));

        out.push_str("\n## Commands\n");
        if self.plan.is_empty() {
            out.push_str("(no commands planned)\n");
        }
        for cmd in &self.plan.commands {
            out.push_str(&format!("- `{}` [{:?}]\n", cmd.text, cmd.category));
        }

        if let TurnOutcome::Rejected = self.outcome {
            out.push_str("\n## Outcome\nPlan rejected by operator; nothing executed.\n");
        }
        if let TurnOutcome::Failed { kind, message } = &self.outcome {
            out.push_str(&format!("\n## Outcome\nTurn failed ({kind}): {message}\n"));
        }

        out.push_str("\n## Analysis\n");
        out.push_str(self.analysis.as_deref().unwrap_or(ANALYSIS_UNAVAILABLE));
        out.push('\n');

        if !self.results.is_empty() {
            out.push_str("\n## Raw Output\n");
            for result in &self.results {
                out.push_str(&format!(
                    "\n### {} ({:?})\n",
                    result.executed_text(),
                    result.status
                ));
                if result.corrected.is_some() {
                    out.push_str(&format!("_corrected from_ `{}`\n", result.command));
                }
                out.push_str("```\n");
                out.push_str(&result.output);
                if !result.output.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("```\n");
            }
        }

        out
    }
}
