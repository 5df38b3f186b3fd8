//! Scripted in-memory transport for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use np_protocol::{DeviceTarget, Reachability};

use crate::error::{TransportError, TransportResult};
use crate::{DeviceChannel, DeviceTransport};

/// Transport that answers commands from a scripted table instead of a
/// network. Records every executed command and whether the channel was
/// closed, so tests can assert on the session shape.
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, String>,
    default_response: String,
    fail_connect: bool,
    executed: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            default_response: "ok".to_string(),
            ..Default::default()
        }
    }

    /// Script the output returned for an exact command string.
    pub fn with_response(mut self, command: &str, output: &str) -> Self {
        self.responses.insert(command.to_string(), output.to_string());
        self
    }

    /// Output returned for commands with no scripted entry.
    pub fn with_default_response(mut self, output: &str) -> Self {
        self.default_response = output.to_string();
        self
    }

    /// Make every `connect` call fail.
    pub fn with_connect_failure(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Commands executed so far, in order.
    pub fn executed_commands(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Whether the channel handed out by `connect` was closed.
    pub fn channel_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Handle onto the recorders, usable after the transport itself has
    /// been moved into the code under test.
    pub fn recorder(&self) -> MockRecorder {
        MockRecorder {
            executed: Arc::clone(&self.executed),
            closed: Arc::clone(&self.closed),
        }
    }
}

/// Cloneable view of a `MockTransport`'s recorded activity.
#[derive(Clone)]
pub struct MockRecorder {
    executed: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl MockRecorder {
    pub fn executed_commands(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn channel_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceTransport for MockTransport {
    async fn connect(&self, target: &mut DeviceTarget) -> TransportResult<Box<dyn DeviceChannel>> {
        if self.fail_connect {
            target.reachability = Reachability::Unreachable;
            return Err(TransportError::Connection(format!(
                "scripted connect failure for {}",
                target.hostname
            )));
        }
        target.reachability = Reachability::Reachable;
        Ok(Box::new(MockChannel {
            responses: self.responses.clone(),
            default_response: self.default_response.clone(),
            executed: Arc::clone(&self.executed),
            closed: Arc::clone(&self.closed),
        }))
    }
}

pub struct MockChannel {
    responses: HashMap<String, String>,
    default_response: String,
    executed: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl DeviceChannel for MockChannel {
    async fn run(&mut self, command: &str, _timeout: Duration) -> TransportResult<String> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::ChannelClosed);
        }
        self.executed.lock().unwrap().push(command.to_string());
        Ok(self
            .responses
            .get(command)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }

    async fn close(&mut self) -> TransportResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
