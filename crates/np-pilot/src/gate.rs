//! Safety gate for configuration-changing plans.
//!
//! Read-only plans pass through untouched. A plan containing any
//! configuration-changing command requires explicit operator confirmation
//! before a connection is even opened to the device.

use async_trait::async_trait;

use np_protocol::CommandPlan;

/// Verdict on a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Approved,
    Rejected,
}

/// Asks the operator whether a configuration-changing plan may run.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, plan: &CommandPlan) -> bool;
}

/// Fixed answer, for batch mode (`--yes`) and tests.
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmer for AutoConfirm {
    async fn confirm(&self, _plan: &CommandPlan) -> bool {
        self.0
    }
}

/// A plan needs confirmation iff it contains at least one
/// configuration-changing command.
pub fn requires_confirmation(plan: &CommandPlan) -> bool {
    plan.has_config_changes()
}

/// Gate a plan. Only plans with configuration changes consult the
/// confirmer; rejection is a normal outcome, not an error.
pub async fn gate(plan: &CommandPlan, confirmer: &dyn Confirmer) -> GateDecision {
    if !requires_confirmation(plan) {
        return GateDecision::Approved;
    }
    tracing::info!(commands = plan.len(), "plan contains configuration changes");
    if confirmer.confirm(plan).await {
        GateDecision::Approved
    } else {
        tracing::warn!("configuration plan rejected by operator");
        GateDecision::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use np_protocol::{CommandCategory, PlannedCommand};

    fn read_only_plan() -> CommandPlan {
        CommandPlan::new(vec![PlannedCommand {
            text: "show version".into(),
            category: CommandCategory::ReadOnly,
        }])
    }

    fn config_plan() -> CommandPlan {
        CommandPlan::new(vec![
            PlannedCommand {
                text: "configure terminal".into(),
                category: CommandCategory::ConfigChanging,
            },
            PlannedCommand {
                text: "vlan 100".into(),
                category: CommandCategory::ConfigChanging,
            },
        ])
    }

    #[test]
    fn only_config_plans_require_confirmation() {
        assert!(!requires_confirmation(&read_only_plan()));
        assert!(requires_confirmation(&config_plan()));
    }

    #[tokio::test]
    async fn read_only_plan_skips_confirmation() {
        // A confirmer that always rejects must never be consulted.
        let decision = gate(&read_only_plan(), &AutoConfirm(false)).await;
        assert_eq!(decision, GateDecision::Approved);
    }

    #[tokio::test]
    async fn config_plan_requires_confirmation() {
        assert_eq!(
            gate(&config_plan(), &AutoConfirm(false)).await,
            GateDecision::Rejected
        );
        assert_eq!(
            gate(&config_plan(), &AutoConfirm(true)).await,
            GateDecision::Approved
        );
    }
}
