//! Turn orchestration.
//!
//! A turn runs the fixed pipeline translate -> gate -> execute -> analyze
//! -> report. The device connection is opened only after the gate approves
//! and is closed before analysis starts, so the switch never waits on a
//! model call. A failed turn still produces a report; the session itself
//! keeps going.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use np_protocol::{
    CommandPlan, DeviceTarget, ExecutionResult, SessionReport, TurnOutcome,
};
use np_provider::{ProviderError, ProviderRegistry, ReasoningProvider};
use np_transport::{DeviceTransport, TransportError};

use crate::analyze::analyze;
use crate::context::RollingContext;
use crate::executor::execute_plan;
use crate::gate::{gate, Confirmer, GateDecision};
use crate::translate::{translate, Translation};

/// One operator request plus its per-turn options.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub text: String,
    /// Provider id the turn must use; `None` selects by priority.
    pub pinned_provider: Option<String>,
}

impl TurnRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pinned_provider: None,
        }
    }

    pub fn pinned(text: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pinned_provider: Some(provider_id.into()),
        }
    }
}

/// Why a turn aborted before completing. Plan rejection is not an error;
/// it is a normal `TurnOutcome`.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("translation failed: {0}")]
    Translation(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Connection(#[from] TransportError),
}

impl TurnError {
    fn kind(&self) -> &'static str {
        match self {
            TurnError::Translation(_) => "translation",
            TurnError::Provider(_) => "provider",
            TurnError::Connection(_) => "connection",
        }
    }
}

/// The session engine: a provider registry, a device transport and the
/// safety confirmer, shared by every turn.
pub struct Pilot {
    registry: ProviderRegistry,
    transport: Box<dyn DeviceTransport>,
    confirmer: Box<dyn Confirmer>,
    command_timeout: Duration,
}

impl Pilot {
    pub fn new(
        registry: ProviderRegistry,
        transport: Box<dyn DeviceTransport>,
        confirmer: Box<dyn Confirmer>,
        command_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            transport,
            confirmer,
            command_timeout,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Run one turn against `target`. Never fails: errors become a report
    /// with a `Failed` outcome so the session can continue.
    pub async fn run_turn(
        &self,
        target: &mut DeviceTarget,
        request: &TurnRequest,
        context: &mut RollingContext,
    ) -> SessionReport {
        let turn_id = Uuid::now_v7();
        tracing::info!(%turn_id, target = %target.hostname, request = %request.text, "turn started");

        match self.try_run_turn(target, request, context).await {
            Ok(report) => {
                tracing::info!(%turn_id, outcome = ?report.outcome, "turn finished");
                report
            }
            Err(e) => {
                tracing::error!(%turn_id, kind = e.kind(), error = %e, "turn failed");
                self.failed_report(target, request, &e)
            }
        }
    }

    async fn try_run_turn(
        &self,
        target: &mut DeviceTarget,
        request: &TurnRequest,
        context: &mut RollingContext,
    ) -> Result<SessionReport, TurnError> {
        // Provider selection happens first: a pinned-but-unavailable
        // provider fails the turn before anything touches the device.
        let provider = self.registry.select(request.pinned_provider.as_deref())?;
        let provider_label = provider.descriptor().label.clone();

        let plan = match translate(provider, &request.text, context).await? {
            Translation::Plan(plan) if plan.is_empty() => {
                return Err(TurnError::Translation(
                    "model returned no commands".to_string(),
                ));
            }
            Translation::Plan(plan) => plan,
            Translation::Clarification(question) => {
                return Err(TurnError::Translation(question));
            }
        };
        tracing::info!(
            commands = plan.len(),
            config_changes = plan.has_config_changes(),
            "plan translated"
        );

        if gate(&plan, self.confirmer.as_ref()).await == GateDecision::Rejected {
            return Ok(self.base_report(
                target,
                &request.text,
                Some(provider_label),
                plan,
                Vec::new(),
                None,
                TurnOutcome::Rejected,
            ));
        }

        // Connect only after gating; a rejected plan never opens a channel.
        let mut channel = self.transport.connect(target).await?;
        let results = execute_plan(channel.as_mut(), &plan, self.command_timeout).await;
        if let Err(e) = channel.close().await {
            tracing::warn!(error = %e, "channel close failed");
        }

        // Analysis degrades, never aborts: the captured output is already
        // in hand and belongs in the report regardless.
        let analysis = match analyze(provider, &request.text, &results).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(error = %e, "analysis unavailable");
                None
            }
        };

        context.push_turn(&request.text, &plan, &results);

        Ok(self.base_report(
            target,
            &request.text,
            Some(provider_label),
            plan,
            results,
            analysis,
            TurnOutcome::Completed,
        ))
    }

    fn failed_report(
        &self,
        target: &DeviceTarget,
        request: &TurnRequest,
        error: &TurnError,
    ) -> SessionReport {
        let provider = self
            .registry
            .select(request.pinned_provider.as_deref())
            .ok()
            .map(|p| p.descriptor().label.clone());
        self.base_report(
            target,
            &request.text,
            provider,
            CommandPlan::default(),
            Vec::new(),
            None,
            TurnOutcome::Failed {
                kind: error.kind().to_string(),
                message: error.to_string(),
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn base_report(
        &self,
        target: &DeviceTarget,
        request: &str,
        provider: Option<String>,
        plan: CommandPlan,
        results: Vec<ExecutionResult>,
        analysis: Option<String>,
        outcome: TurnOutcome,
    ) -> SessionReport {
        SessionReport {
            id: Uuid::now_v7(),
            generated_at: Utc::now(),
            target: format!("{} ({})", target.hostname, target.address),
            request: request.to_string(),
            provider,
            plan,
            results,
            analysis,
            outcome,
        }
    }
}

/// Write the markdown artifact for a report.
pub fn write_artifact(report: &SessionReport, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, report.to_markdown())?;
    tracing::info!(path = %path.display(), "report artifact written");
    Ok(())
}
