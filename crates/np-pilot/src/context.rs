//! Bounded rolling context carried between turns of one session.
//!
//! Only request text, command texts and a short summary are retained —
//! never raw device output, which can run to megabytes per command.

use std::collections::VecDeque;

use np_protocol::{CommandPlan, CommandStatus, ExecutionResult};

/// Default number of past turns kept.
pub const DEFAULT_CONTEXT_WINDOW: usize = 5;

/// Hard cap on the summary line stored per turn.
const SUMMARY_MAX_CHARS: usize = 200;

/// One remembered turn.
#[derive(Debug, Clone)]
pub struct ContextEntry {
    pub request: String,
    pub commands: Vec<String>,
    pub summary: String,
}

/// Ring of the most recent turns; the oldest entry is evicted when full.
#[derive(Debug)]
pub struct RollingContext {
    entries: VecDeque<ContextEntry>,
    capacity: usize,
}

impl RollingContext {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a completed turn.
    pub fn push_turn(&mut self, request: &str, plan: &CommandPlan, results: &[ExecutionResult]) {
        let entry = ContextEntry {
            request: request.to_string(),
            commands: plan
                .command_texts()
                .into_iter()
                .map(str::to_string)
                .collect(),
            summary: summarize(results),
        };
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Render remembered turns for a prompt, most recent first. Empty
    /// string when nothing is remembered.
    pub fn render_for_prompt(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let mut out = String::from("Recent session history (most recent first):\n");
        for entry in self.entries.iter().rev() {
            out.push_str(&format!(
                "- request: {} | commands: {} | result: {}\n",
                entry.request,
                entry.commands.join("; "),
                entry.summary
            ));
        }
        out
    }
}

impl Default for RollingContext {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

/// Compress a turn's results into one bounded line.
fn summarize(results: &[ExecutionResult]) -> String {
    if results.is_empty() {
        return "no commands executed".to_string();
    }
    let failures = results
        .iter()
        .filter(|r| r.status != CommandStatus::Success)
        .count();
    let first_line = results[0]
        .output
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim();

    let mut summary = if failures == 0 {
        format!("{} ok", results.len())
    } else {
        format!("{} of {} failed", failures, results.len())
    };
    if !first_line.is_empty() {
        summary.push_str("; ");
        summary.push_str(first_line);
    }
    summary.chars().take(SUMMARY_MAX_CHARS).collect()
}
