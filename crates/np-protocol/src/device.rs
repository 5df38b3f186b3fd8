use serde::{Deserialize, Serialize};

/// Connectivity state of a device, updated on each connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

/// A managed switch from the inventory.
///
/// Built once from the inventory file at startup; `reachability` is the
/// only field mutated afterwards (by the transport). Never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceTarget {
    /// Device hostname as it appears in the inventory.
    pub hostname: String,
    /// Management IP address or resolvable name.
    pub address: String,
    /// SSH username.
    pub username: String,
    /// SSH password.
    pub password: String,
    /// SSH port.
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,
    /// Last observed connectivity state.
    #[serde(default)]
    pub reachability: Reachability,
}

fn default_ssh_port() -> u16 {
    22
}

impl DeviceTarget {
    pub fn new(
        hostname: impl Into<String>,
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            address: address.into(),
            username: username.into(),
            password: password.into(),
            ssh_port: default_ssh_port(),
            reachability: Reachability::Unknown,
        }
    }

    /// Matches a user-supplied selector against hostname or address.
    pub fn matches(&self, selector: &str) -> bool {
        self.hostname.eq_ignore_ascii_case(selector) || self.address == selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_and_reachability() {
        let toml_like = r#"{"hostname":"spine1","address":"10.0.0.1","username":"admin","password":"pw"}"#;
        let target: DeviceTarget = serde_json::from_str(toml_like).unwrap();
        assert_eq!(target.ssh_port, 22);
        assert_eq!(target.reachability, Reachability::Unknown);
    }

    #[test]
    fn selector_matches_hostname_case_insensitive() {
        let target = DeviceTarget::new("DC1_SPINE_01", "10.0.0.1", "admin", "pw");
        assert!(target.matches("dc1_spine_01"));
        assert!(target.matches("10.0.0.1"));
        assert!(!target.matches("10.0.0.2"));
    }

    #[test]
    fn reachability_serialization() {
        assert_eq!(
            serde_json::to_string(&Reachability::Unreachable).unwrap(),
            r#""unreachable""#
        );
    }
}
