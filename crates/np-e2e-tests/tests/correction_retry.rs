//! Reactive syntax correction through the full pipeline.

mod helpers;

use helpers::{spine1, TestHarness};
use np_protocol::{CommandStatus, TurnOutcome};
use np_provider::MockProvider;
use np_transport::MockTransport;

#[tokio::test]
async fn ios_syntax_rejected_by_device_is_corrected_and_retried() {
    // The model slips into IOS syntax; the switch rejects it; the known
    // correction runs instead and the report shows both forms.
    let provider = MockProvider::new("mock", 0, true)
        .with_reply("show ip bgp summary")
        .with_reply("BGP neighbor is established.");
    let transport = MockTransport::new()
        .with_response("show ip bgp summary", "% Invalid command at '^' marker.")
        .with_response(
            "show bgp ipv4 unicast summary",
            "Neighbor 192.0.2.2  4  65001  Estab",
        );
    let mut harness = TestHarness::new(provider, transport, false);

    let report = harness
        .pilot
        .run_turn(
            &mut spine1(),
            &np_pilot::TurnRequest::new("is bgp up?"),
            &mut harness.context,
        )
        .await;

    assert_eq!(report.outcome, TurnOutcome::Completed);
    assert_eq!(report.results.len(), 1);

    let result = &report.results[0];
    assert_eq!(result.status, CommandStatus::Success);
    assert_eq!(result.command, "show ip bgp summary");
    assert_eq!(
        result.corrected.as_deref(),
        Some("show bgp ipv4 unicast summary")
    );
    assert!(result.output.contains("Estab"));

    assert_eq!(
        harness.recorder.executed_commands(),
        vec!["show ip bgp summary", "show bgp ipv4 unicast summary"]
    );

    let md = report.to_markdown();
    assert!(md.contains("_corrected from_ `show ip bgp summary`"));
}

#[tokio::test]
async fn unknown_bad_syntax_is_recorded_and_turn_continues() {
    let provider = MockProvider::new("mock", 0, true)
        .with_reply("show flux capacitor\nshow clock")
        .with_reply("One command was invalid; the clock reads 10:00.");
    let transport = MockTransport::new()
        .with_response("show flux capacitor", "% Invalid command at '^' marker.")
        .with_response("show clock", "10:00:00.000 UTC");
    let mut harness = TestHarness::new(provider, transport, false);

    let report = harness
        .pilot
        .run_turn(
            &mut spine1(),
            &np_pilot::TurnRequest::new("check the flux capacitor and the time"),
            &mut harness.context,
        )
        .await;

    assert_eq!(report.outcome, TurnOutcome::Completed);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].status, CommandStatus::SyntaxError);
    assert!(report.results[0].corrected.is_none());
    assert_eq!(report.results[1].status, CommandStatus::Success);

    // No retry was attempted for the unknown command.
    assert_eq!(
        harness.recorder.executed_commands(),
        vec!["show flux capacitor", "show clock"]
    );
}

#[tokio::test]
async fn correction_applies_at_most_once_per_command() {
    // Even the corrected form fails here; the pipeline records the
    // rejection instead of looping.
    let provider = MockProvider::new("mock", 0, true)
        .with_reply("show processes cpu")
        .with_reply("The command is not supported on this platform.");
    let transport = MockTransport::new().with_default_response("% Invalid command at '^' marker.");
    let mut harness = TestHarness::new(provider, transport, false);

    let report = harness
        .pilot
        .run_turn(
            &mut spine1(),
            &np_pilot::TurnRequest::new("check cpu"),
            &mut harness.context,
        )
        .await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].status, CommandStatus::SyntaxError);
    assert_eq!(
        harness.recorder.executed_commands(),
        vec!["show processes cpu", "show system resources"]
    );
}
