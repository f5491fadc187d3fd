/// Built-in workflow catalog
///
/// The discovery pass: constructs every built-in workflow definition and
/// returns the registry the application owns. A definition error in any
/// workflow aborts discovery entirely: a broken workflow never registers,
/// and the error names the workflow it came from.

use crate::workflow::registry::WorkflowRegistry;
use anyhow::{Context, Result};

// Arithmetic demonstration graph with an alternating sensor
pub mod demo;

// Remote HDFS path watcher
pub mod remote_path;

// SSH SOCKS tunnel keeper
pub mod tunnel;

/// Construct all built-in workflows and return the populated registry.
pub fn discover() -> Result<WorkflowRegistry> {
    tracing::debug!("🔎 workflow discovery started");
    let mut registry = WorkflowRegistry::new();

    registry.register(demo::workflow().context("defining workflow 'ExampleWorkflow'")?);
    registry.register(tunnel::workflow().context("defining workflow 'EnsureSshTunnel'")?);
    registry.register(remote_path::workflow().context("defining workflow 'WatchRemotePath'")?);

    tracing::info!(count = registry.len(), "workflow discovery finished");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_registers_all_builtin_workflows() {
        let registry = discover().unwrap();
        assert_eq!(
            registry.names(),
            vec!["ExampleWorkflow", "EnsureSshTunnel", "WatchRemotePath"],
        );
    }
}
