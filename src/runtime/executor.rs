/// Epoch executor
///
/// Drives a resolved Solution: epochs run strictly in sequence, edges
/// within an epoch concurrently. All edge futures of one epoch are polled
/// inside the current task; operations are I/O-bound, so cooperative
/// concurrency is enough and no task is spawned per edge.

use crate::runtime::resolver::Solution;
use crate::workflow::types::{Edge, Registry};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use std::future::Future;

impl Solution {
    /// Execute every epoch in order and return the final node registry.
    ///
    /// Each edge gathers its inputs from the registry in declared order,
    /// invokes its operation positionally, and contributes its named
    /// outputs once the whole epoch has completed. Later epochs read
    /// earlier epochs' values; within an epoch nothing writes, so there is
    /// no concurrent-write hazard.
    pub async fn execute(&self) -> Result<Registry> {
        let mut registry = Registry::new();

        for (epoch, edges) in self.epochs().iter().enumerate() {
            tracing::debug!(epoch, edges = edges.len(), "epoch started");
            let started = std::time::Instant::now();

            let runs = edges
                .iter()
                .map(|edge| run_edge(edge, &registry))
                .collect::<Result<Vec<_>>>()?;
            let outputs = futures::future::try_join_all(runs).await?;

            for (edge, values) in edges.iter().zip(outputs) {
                merge(&mut registry, edge, values)?;
            }
            tracing::debug!(epoch, elapsed = ?started.elapsed(), "epoch finished");
        }

        Ok(registry)
    }
}

/// Gather an edge's inputs and build the future running its operation.
///
/// Inputs are cloned out of the registry before the epoch is awaited; a
/// missing input would mean the resolver placed this edge too early, which
/// construction-time validation rules out.
fn run_edge(
    edge: &Edge,
    registry: &Registry,
) -> Result<impl Future<Output = Result<Vec<Value>>>> {
    let args = edge
        .ins()
        .iter()
        .map(|name| {
            registry
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("input node '{name}' missing from the registry"))
        })
        .collect::<Result<Vec<Value>>>()?;

    let edge = edge.clone();
    Ok(async move {
        tracing::debug!(operation = edge.op().name(), "operation started");
        let values = edge
            .op()
            .call(args)
            .await
            .with_context(|| format!("operation '{}' failed", edge.op().name()))?;
        if values.len() != edge.outs().len() {
            bail!(
                "operation '{}' returned {} value(s) for {} declared output(s)",
                edge.op().name(),
                values.len(),
                edge.outs().len(),
            );
        }
        tracing::debug!(operation = edge.op().name(), "operation finished");
        Ok(values)
    })
}

/// Merge one edge's outputs into the registry, refusing to overwrite.
///
/// A collision here means an invariant the resolver guarantees was
/// broken; failing loudly beats silently clobbering another edge's value.
fn merge(registry: &mut Registry, edge: &Edge, values: Vec<Value>) -> Result<()> {
    for (name, value) in edge.outs().iter().zip(values) {
        if registry.insert(name.clone(), value).is_some() {
            bail!("output node '{name}' already present in the registry");
        }
    }
    Ok(())
}
