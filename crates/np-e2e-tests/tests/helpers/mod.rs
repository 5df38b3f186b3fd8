//! Shared harness for the end-to-end suites.
//!
//! Wires a real `Pilot` to mock providers and a scripted transport, so the
//! full translate -> gate -> execute -> analyze pipeline runs with no
//! network.

use std::time::Duration;

use np_pilot::context::RollingContext;
use np_pilot::gate::AutoConfirm;
use np_pilot::orchestrator::Pilot;
use np_protocol::DeviceTarget;
use np_provider::{MockProvider, ProviderRegistry, ReasoningProvider};
use np_transport::{MockRecorder, MockTransport};

/// A pilot over mocks, plus handles for asserting on device activity.
pub struct TestHarness {
    pub pilot: Pilot,
    pub recorder: MockRecorder,
    pub context: RollingContext,
}

impl TestHarness {
    /// Harness with one always-available provider and a scripted transport.
    /// `confirm` is the fixed answer given to configuration gates.
    pub fn new(provider: MockProvider, transport: MockTransport, confirm: bool) -> Self {
        Self::with_providers(vec![Box::new(provider)], transport, confirm)
    }

    pub fn with_providers(
        providers: Vec<Box<dyn ReasoningProvider>>,
        transport: MockTransport,
        confirm: bool,
    ) -> Self {
        let recorder = transport.recorder();
        let pilot = Pilot::new(
            ProviderRegistry::from_providers(providers),
            Box::new(transport),
            Box::new(AutoConfirm(confirm)),
            Duration::from_secs(5),
        );
        Self {
            pilot,
            recorder,
            context: RollingContext::default(),
        }
    }
}

/// Standard test switch.
pub fn spine1() -> DeviceTarget {
    DeviceTarget::new("spine1", "192.0.2.1", "admin", "hunter2")
}

/// Second switch for independence tests.
pub fn leaf1() -> DeviceTarget {
    DeviceTarget::new("leaf1", "192.0.2.11", "admin", "hunter2")
}
