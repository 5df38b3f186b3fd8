//! Plan execution with one syntax-correction retry per command.

use std::time::Duration;

use np_protocol::{CommandPlan, CommandStatus, ExecutionResult};
use np_transport::DeviceChannel;

/// Run every planned command in order over an open channel.
///
/// Execution never short-circuits: a failing command is recorded and the
/// next one still runs, so the result list always has one entry per
/// planned command. A command whose output looks like a syntax rejection
/// gets at most one retry with the known-correction table.
pub async fn execute_plan(
    channel: &mut dyn DeviceChannel,
    plan: &CommandPlan,
    timeout: Duration,
) -> Vec<ExecutionResult> {
    let mut results = Vec::with_capacity(plan.len());
    for planned in &plan.commands {
        results.push(run_one(channel, &planned.text, timeout).await);
    }
    results
}

async fn run_one(channel: &mut dyn DeviceChannel, command: &str, timeout: Duration) -> ExecutionResult {
    let output = match channel.run(command, timeout).await {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(command, error = %e, "command transport failure");
            return ExecutionResult {
                command: command.to_string(),
                corrected: None,
                status: CommandStatus::Failure,
                output: e.to_string(),
            };
        }
    };

    if !np_knowledge::is_syntax_failure(&output) {
        return ExecutionResult {
            command: command.to_string(),
            corrected: None,
            status: CommandStatus::Success,
            output,
        };
    }

    // One retry when the correction table knows a fix; otherwise the
    // rejection stands.
    let Some(corrected) = np_knowledge::correct(command) else {
        return ExecutionResult {
            command: command.to_string(),
            corrected: None,
            status: CommandStatus::SyntaxError,
            output,
        };
    };

    tracing::info!(command, corrected, "retrying with corrected syntax");
    match channel.run(&corrected, timeout).await {
        Ok(retry_output) => {
            let status = if np_knowledge::is_syntax_failure(&retry_output) {
                CommandStatus::SyntaxError
            } else {
                CommandStatus::Success
            };
            ExecutionResult {
                command: command.to_string(),
                corrected: Some(corrected),
                status,
                output: retry_output,
            }
        }
        Err(e) => ExecutionResult {
            command: command.to_string(),
            corrected: Some(corrected),
            status: CommandStatus::Failure,
            output: e.to_string(),
        },
    }
}
