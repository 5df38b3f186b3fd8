use serde::{Deserialize, Serialize};

/// Whether a device command can mutate switch state.
///
/// Defaults to `ConfigChanging`: anything the knowledge base cannot
/// positively identify as read-only is treated as a configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    ReadOnly,
    #[default]
    ConfigChanging,
}

/// One candidate device command with its safety classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedCommand {
    /// Exact command text to send to the device.
    pub text: String,
    /// Safety classification, assigned before execution.
    pub category: CommandCategory,
}

/// Ordered command list derived from one translation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandPlan {
    pub commands: Vec<PlannedCommand>,
}

impl CommandPlan {
    pub fn new(commands: Vec<PlannedCommand>) -> Self {
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if the plan contains at least one configuration-changing entry.
    pub fn has_config_changes(&self) -> bool {
        self.commands
            .iter()
            .any(|c| c.category == CommandCategory::ConfigChanging)
    }

    /// Command texts in plan order, for prompts and logs.
    pub fn command_texts(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.text.as_str()).collect()
    }
}
