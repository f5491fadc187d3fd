/// Cron-schedule trigger loop
///
/// Runs a workflow at each fire time of a cron schedule using
/// tokio-cron-scheduler. No timeout wraps scheduled executions and there
/// is no terminal state: the loop runs until externally cancelled. Missed
/// ticks are simply skipped, never backfilled.

use crate::workflow::types::Workflow;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Execute `workflow` on `schedule` (cron syntax with seconds, e.g.
/// `"0 */5 * * * *"`) until `cancel` is triggered.
///
/// An invalid schedule string fails here, before any tick fires. The job
/// closure cannot propagate errors, so a failed execution is forwarded
/// over a channel and terminates this loop as `Err`; other workflows'
/// loops are unaffected.
pub async fn run(
    workflow: Arc<Workflow>,
    schedule: &str,
    cancel: CancellationToken,
) -> Result<()> {
    let mut scheduler = JobScheduler::new().await?;
    let (err_tx, mut err_rx) = mpsc::channel::<anyhow::Error>(1);

    let job_workflow = Arc::clone(&workflow);
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let workflow = Arc::clone(&job_workflow);
        let err_tx = err_tx.clone();

        Box::pin(async move {
            tracing::debug!(workflow = %workflow.id(), "🔔 schedule fired");
            if let Err(err) = workflow.execute().await {
                tracing::error!(
                    workflow = %workflow.id(),
                    error = %format!("{err:#}"),
                    "scheduled execution failed"
                );
                let _ = err_tx.send(err).await;
            }
        })
    })?;

    let job_id: Uuid = scheduler.add(job).await?;
    scheduler.start().await?;

    if let Ok(Some(next)) = scheduler.next_tick_for_job(job_id).await {
        tracing::info!(
            workflow = %workflow.id(),
            %schedule,
            next_fire = %next.to_rfc3339(),
            "⏰ schedule loop started"
        );
    }

    let outcome = tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!(workflow = %workflow.id(), "schedule loop cancelled");
            Ok(())
        }
        received = err_rx.recv() => match received {
            Some(err) => Err(err),
            None => Ok(()),
        },
    };

    scheduler.shutdown().await?;
    outcome
}
