/// Application setup and lifecycle
///
/// Wires together discovery, configuration, and the per-workflow trigger
/// loops. Each selected workflow runs as its own task; a failing loop is
/// logged and does not bring down its siblings or the process.

use crate::catalog;
use crate::config::Config;
use crate::runtime::sensor::PollSettings;
use crate::workflow::registry::WorkflowRegistry;
use crate::workflow::types::Workflow;
use anyhow::{bail, Result};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// The running application: configuration plus the discovered registry.
pub struct Application {
    registry: WorkflowRegistry,
    config: Config,
}

impl Application {
    /// Run discovery and build the application.
    ///
    /// Fails fast when any built-in workflow definition is invalid.
    pub fn discover(config: Config) -> Result<Self> {
        let registry = catalog::discover()?;
        Ok(Self { registry, config })
    }

    /// The discovered workflow registry.
    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    /// Start the selected workflows and wait for every loop to end.
    ///
    /// `names` empty selects every discovered workflow. `schedules` pairing
    /// follows the CLI contract: none → all workflows poll their sensors;
    /// exactly one → shared by all; otherwise one schedule per workflow.
    /// Loop failures are logged per workflow; the process keeps running
    /// until every loop has ended.
    pub async fn start(
        &self,
        names: &[String],
        schedules: &[String],
        cancel: CancellationToken,
    ) -> Result<()> {
        let selected = self.select(names)?;
        if !schedules.is_empty() && schedules.len() != 1 && schedules.len() != selected.len() {
            bail!(
                "got {} schedule(s) for {} workflow(s); pass one schedule for all \
                 workflows, or exactly one per workflow",
                schedules.len(),
                selected.len(),
            );
        }

        tracing::info!(workflows = selected.len(), "🚀 starting workflow loops");
        let settings = PollSettings::from_config(&self.config);
        let mut loops = JoinSet::new();

        for (index, workflow) in selected.into_iter().enumerate() {
            let schedule = match schedules {
                [] => None,
                [shared] => Some(shared.clone()),
                many => Some(many[index].clone()),
            };
            let id = workflow.id().to_string();
            let settings = settings.clone();
            let cancel = cancel.clone();

            loops.spawn(async move {
                let outcome = match schedule {
                    Some(schedule) => workflow.execute_on_schedule(&schedule, cancel).await,
                    None => workflow.execute_on_sensor(settings, cancel).await,
                };
                (id, outcome)
            });
        }

        while let Some(joined) = loops.join_next().await {
            match joined {
                Ok((id, Ok(()))) => {
                    tracing::info!(workflow = %id, "workflow loop finished");
                }
                Ok((id, Err(err))) => {
                    tracing::error!(
                        workflow = %id,
                        error = %format!("{err:#}"),
                        "workflow loop terminated with an error"
                    );
                }
                Err(err) => {
                    tracing::error!(error = %err, "workflow task aborted");
                }
            }
        }
        Ok(())
    }

    /// Shut the application down.
    pub async fn shutdown(&self) {
        tracing::info!("🛑 application shutdown");
    }

    fn select(&self, names: &[String]) -> Result<Vec<Arc<Workflow>>> {
        if names.is_empty() {
            return Ok(self.registry.iter().cloned().collect());
        }
        names
            .iter()
            .map(|name| match self.registry.get(name) {
                Some(workflow) => Ok(Arc::clone(workflow)),
                None => bail!("unknown workflow '{name}'; see `flowline ls`"),
            })
            .collect()
    }
}
