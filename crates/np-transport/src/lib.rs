//! Session transport — one authenticated command channel per target.
//!
//! `DeviceTransport`/`DeviceChannel` traits with two impls:
//! - `SshTransport` — drives an interactive switch shell over `russh`
//! - `MockTransport` — scripted outputs, recorded commands (tests)
//!
//! Connections are opened once per turn and never pooled; every exit path
//! releases the channel.

pub mod error;
pub mod mock;
pub mod ssh;

use async_trait::async_trait;
use std::time::Duration;

use np_protocol::DeviceTarget;

pub use error::{TransportError, TransportResult};
pub use mock::{MockRecorder, MockTransport};
pub use ssh::SshTransport;

/// An open command channel to one device.
#[async_trait]
pub trait DeviceChannel: Send {
    /// Run one command, blocking up to `timeout` for the device prompt to
    /// return. One command in flight at a time.
    async fn run(&mut self, command: &str, timeout: Duration) -> TransportResult<String>;

    /// Release the channel. Idempotent.
    async fn close(&mut self) -> TransportResult<()>;
}

/// Factory for per-turn channels.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Open an authenticated channel to the target, updating its
    /// reachability state on both success and failure.
    async fn connect(&self, target: &mut DeviceTarget) -> TransportResult<Box<dyn DeviceChannel>>;
}
