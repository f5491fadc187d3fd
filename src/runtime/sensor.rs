/// Sensor-poll trigger loop
///
/// Repeatedly checks a workflow's sensor and executes the workflow when it
/// fires. One execution is bounded by a timeout budget: exceeding it means
/// a stuck external dependency, and continuing to poll would pile up hung
/// executions, so the loop stops entirely and leaves recovery to an
/// external supervisor.

use crate::config::Config;
use crate::workflow::error::GraphError;
use crate::workflow::types::Workflow;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Tuning for the sensor-poll loop.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Delay between sensor checks.
    pub poll_interval: Duration,
    /// Budget for one execute() call; exceeding it ends the loop.
    pub execution_timeout: Duration,
    /// Stop after the first sensor-true cycle. Integration tests use this
    /// to bound the otherwise endless loop.
    pub once: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            execution_timeout: Duration::from_secs(10),
            once: false,
        }
    }
}

impl PollSettings {
    /// Build settings from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.trigger.poll_interval_secs),
            execution_timeout: Duration::from_secs(config.trigger.execution_timeout_secs),
            once: false,
        }
    }
}

/// Poll `workflow`'s sensor until the loop terminates.
///
/// Cycle: check the sensor; when it fires, execute under the timeout
/// budget; sleep; repeat. The loop ends when the budget is exceeded
/// (logged as a warning, returned as `Ok` so the workflow simply stops
/// polling), when the sensor or an operation fails (returned as `Err`),
/// when `cancel` fires (honored at every suspension point), or after one
/// completed execution if `settings.once` is set.
pub async fn poll(
    workflow: Arc<Workflow>,
    settings: PollSettings,
    cancel: CancellationToken,
) -> Result<()> {
    let sensor = workflow
        .sensor()
        .cloned()
        .ok_or_else(|| GraphError::MissingSensor {
            workflow: workflow.name().to_string(),
        })?;

    tracing::info!(
        workflow = %workflow.id(),
        interval = ?settings.poll_interval,
        budget = ?settings.execution_timeout,
        "sensor poll loop started"
    );

    loop {
        if cancel.is_cancelled() {
            tracing::info!(workflow = %workflow.id(), "sensor poll loop cancelled");
            return Ok(());
        }

        tracing::debug!(workflow = %workflow.id(), "checking sensor");
        let fired = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            result = (*sensor)() => result?,
        };

        if fired {
            let run = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                run = tokio::time::timeout(settings.execution_timeout, workflow.execute()) => run,
            };
            match run {
                Ok(result) => {
                    result?;
                }
                Err(_elapsed) => {
                    tracing::warn!(
                        workflow = %workflow.id(),
                        budget = ?settings.execution_timeout,
                        "⏰ execution exceeded its budget, stopping the poll loop"
                    );
                    return Ok(());
                }
            }
            if settings.once {
                tracing::debug!(workflow = %workflow.id(), "single-cycle override set, loop done");
                return Ok(());
            }
        } else {
            tracing::debug!(workflow = %workflow.id(), "sensor quiet, skipping execution");
        }

        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = tokio::time::sleep(settings.poll_interval) => {}
        }
    }
}
