/// In-memory workflow registry
///
/// Ordered collection of validated workflows, populated once by the
/// discovery pass and read-only afterwards. The registry is the single
/// source of truth for the workflows this process can run; because nothing
/// writes to it after discovery, concurrent workflow loops read it without
/// locking.

use crate::workflow::types::Workflow;
use std::sync::Arc;

/// Registry of constructed workflows, in discovery order.
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    workflows: Vec<Arc<Workflow>>,
}

impl WorkflowRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            workflows: Vec::new(),
        }
    }

    /// Append a validated workflow and hand back its shared handle.
    ///
    /// Only discovery calls this; a workflow that failed validation never
    /// reaches it.
    pub fn register(&mut self, workflow: Workflow) -> Arc<Workflow> {
        let workflow = Arc::new(workflow);
        tracing::info!(workflow = %workflow.id(), "workflow registered");
        self.workflows.push(Arc::clone(&workflow));
        workflow
    }

    /// Look a workflow up by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Workflow>> {
        self.workflows.iter().find(|w| w.name() == name)
    }

    /// All registered workflows, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Workflow>> {
        self.workflows.iter()
    }

    /// Names of all registered workflows, in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.workflows.iter().map(|w| w.name()).collect()
    }

    /// Number of registered workflows.
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// True when nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::{Edge, Operation};
    use serde_json::{json, Value};

    fn sample(name: &str) -> Workflow {
        let op = Operation::single("noop", 0, |_args| async move { Ok(json!(0)) });
        let edges = vec![Edge::new(op, &[], &["status"]).unwrap()];
        Workflow::new(name, edges, None, Value::Null).unwrap()
    }

    #[test]
    fn registers_and_looks_up_by_name() {
        let mut registry = WorkflowRegistry::new();
        registry.register(sample("First"));
        registry.register(sample("Second"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["First", "Second"]);
        assert!(registry.get("Second").is_some());
        assert!(registry.get("Third").is_none());
    }
}
