//! Turn pipeline: translate an operator request into NX-OS commands, gate
//! configuration changes, execute over one SSH channel, analyze the output
//! and emit a session report.

pub mod analyze;
pub mod config;
pub mod context;
pub mod executor;
pub mod gate;
pub mod orchestrator;
pub mod translate;

pub use config::PilotConfig;
pub use context::RollingContext;
pub use orchestrator::{Pilot, TurnError, TurnRequest};
