//! Configuration gating across the whole pipeline.

mod helpers;

use helpers::{spine1, TestHarness};
use np_protocol::TurnOutcome;
use np_provider::MockProvider;
use np_transport::MockTransport;

const VLAN_PLAN: &str = "configure terminal\nvlan 200\nname GUESTS\nexit";

#[tokio::test]
async fn declined_config_plan_never_touches_the_device() {
    let provider = MockProvider::new("mock", 0, true).with_reply(VLAN_PLAN);
    let transport = MockTransport::new();
    let mut harness = TestHarness::new(provider, transport, false);

    let report = harness
        .pilot
        .run_turn(
            &mut spine1(),
            &np_pilot::TurnRequest::new("create guest vlan 200"),
            &mut harness.context,
        )
        .await;

    assert_eq!(report.outcome, TurnOutcome::Rejected);
    assert!(report.plan.has_config_changes());
    assert!(report.results.is_empty());
    assert!(report.analysis.is_none());

    // No connection, no commands, nothing remembered.
    assert!(harness.recorder.executed_commands().is_empty());
    assert!(!harness.recorder.channel_closed());
    assert_eq!(harness.context.len(), 0);

    let md = report.to_markdown();
    assert!(md.contains("rejected by operator"));
}

#[tokio::test]
async fn approved_config_plan_executes_in_order() {
    let provider = MockProvider::new("mock", 0, true)
        .with_reply(VLAN_PLAN)
        .with_reply("VLAN 200 created.");
    let transport = MockTransport::new().with_default_response("");
    let mut harness = TestHarness::new(provider, transport, true);

    let report = harness
        .pilot
        .run_turn(
            &mut spine1(),
            &np_pilot::TurnRequest::new("create guest vlan 200"),
            &mut harness.context,
        )
        .await;

    assert_eq!(report.outcome, TurnOutcome::Completed);
    assert_eq!(report.results.len(), 4);
    assert_eq!(
        harness.recorder.executed_commands(),
        vec!["configure terminal", "vlan 200", "name GUESTS", "exit"]
    );
    assert!(harness.recorder.channel_closed());
}

#[tokio::test]
async fn mixed_plan_is_gated_as_config_changing() {
    // One config command among reads is enough to require confirmation.
    let provider = MockProvider::new("mock", 0, true)
        .with_reply("show running-config interface ethernet1/1\nconfigure terminal\nshutdown");
    let transport = MockTransport::new();
    let mut harness = TestHarness::new(provider, transport, false);

    let report = harness
        .pilot
        .run_turn(
            &mut spine1(),
            &np_pilot::TurnRequest::new("disable eth1/1"),
            &mut harness.context,
        )
        .await;

    assert_eq!(report.outcome, TurnOutcome::Rejected);
    assert!(harness.recorder.executed_commands().is_empty());
}
