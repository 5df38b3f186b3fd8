//! Pilot configuration, loaded from a TOML file.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use np_protocol::DeviceTarget;
use np_provider::ProviderSettings;

use crate::context::DEFAULT_CONTEXT_WINDOW;

/// Top-level configuration: device inventory, provider endpoints and
/// session behavior. Every section is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PilotConfig {
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
    #[serde(default)]
    pub providers: ProviderSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

/// One switch in the inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceEntry {
    pub hostname: String,
    pub address: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Past turns remembered per device session.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Per-command execution timeout.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Skip the configuration confirmation prompt.
    #[serde(default)]
    pub auto_confirm: bool,
}

fn default_ssh_port() -> u16 {
    22
}
fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}
fn default_command_timeout_secs() -> u64 {
    30
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            command_timeout_secs: default_command_timeout_secs(),
            auto_confirm: false,
        }
    }
}

impl DeviceEntry {
    pub fn to_target(&self) -> DeviceTarget {
        let mut target =
            DeviceTarget::new(&self.hostname, &self.address, &self.username, &self.password);
        target.ssh_port = self.ssh_port;
        target
    }
}

impl PilotConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::info!(
            devices = config.devices.len(),
            context_window = config.session.context_window,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Look up a device by hostname or address, case-insensitively.
    pub fn find_device(&self, selector: &str) -> Option<DeviceTarget> {
        self.devices
            .iter()
            .map(DeviceEntry::to_target)
            .find(|t| t.matches(selector))
    }
}
