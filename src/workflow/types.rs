/// Core workflow type definitions
///
/// Defines the fundamental structures for workflows: operations, the edges
/// wiring them into a dependency graph, and the workflow entity itself.
/// Node values travel as JSON values between operations.

use crate::runtime::resolver::{resolve, Solution};
use crate::workflow::error::GraphError;
use anyhow::Result;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Final name→value mapping produced by one workflow execution.
pub type Registry = std::collections::HashMap<String, Value>;

type OperationHandler = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Vec<Value>>> + Send + Sync>;

/// Zero-argument async predicate gating whether a workflow executes on a poll cycle.
///
/// Shared so the same probe can back several workflows. An `Err` from the
/// sensor is not caught by the engine; it terminates that workflow's loop.
pub type Sensor = Arc<dyn Fn() -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// Wrap an async closure into a [`Sensor`].
pub fn sensor<F, Fut>(f: F) -> Sensor
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// An asynchronous operation with a declared positional arity.
///
/// Operations always return an ordered sequence of output values whose
/// length matches the declared output arity; there is no runtime signature
/// inspection. Must be callable with no ambient state besides its
/// parameters, so sibling operations in one epoch can run concurrently.
#[derive(Clone)]
pub struct Operation {
    name: String,
    inputs: usize,
    outputs: usize,
    handler: OperationHandler,
}

impl Operation {
    /// Create an operation from an async closure returning all outputs at once.
    pub fn new<F, Fut>(name: impl Into<String>, inputs: usize, outputs: usize, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Value>>> + Send + 'static,
    {
        Self {
            name: name.into(),
            inputs,
            outputs,
            handler: Arc::new(move |args| Box::pin(f(args))),
        }
    }

    /// Create a single-output operation; the value is wrapped into a
    /// length-1 sequence here, at construction time.
    pub fn single<F, Fut>(name: impl Into<String>, inputs: usize, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self::new(name, inputs, 1, move |args| {
            let fut = f(args);
            async move { Ok(vec![fut.await?]) }
        })
    }

    /// Operation name, used in log fields and error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared number of positional inputs.
    pub fn input_arity(&self) -> usize {
        self.inputs
    }

    /// Declared number of returned outputs.
    pub fn output_arity(&self) -> usize {
        self.outputs
    }

    /// Invoke the operation with positional arguments.
    pub async fn call(&self, args: Vec<Value>) -> Result<Vec<Value>> {
        (*self.handler)(args).await
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

/// One operation plus its declared input/output node names.
///
/// Immutable value: created once per workflow definition. `Edge::new`
/// checks the wiring against the operation's declared arity, so arity
/// mismatches never survive past construction.
#[derive(Debug, Clone)]
pub struct Edge {
    op: Operation,
    ins: Vec<String>,
    outs: Vec<String>,
}

impl Edge {
    /// Wire an operation to named input and output nodes.
    pub fn new(op: Operation, ins: &[&str], outs: &[&str]) -> Result<Self, GraphError> {
        if outs.is_empty() {
            return Err(GraphError::NoOutputs {
                operation: op.name().to_string(),
            });
        }
        if op.input_arity() != ins.len() || op.output_arity() != outs.len() {
            return Err(GraphError::ArityMismatch {
                operation: op.name().to_string(),
                declared_inputs: op.input_arity(),
                wired_inputs: ins.len(),
                declared_outputs: op.output_arity(),
                wired_outputs: outs.len(),
            });
        }
        Ok(Self {
            op,
            ins: ins.iter().map(|s| s.to_string()).collect(),
            outs: outs.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// The wired operation.
    pub fn op(&self) -> &Operation {
        &self.op
    }

    /// Node names consumed, in positional order. May be empty.
    pub fn ins(&self) -> &[String] {
        &self.ins
    }

    /// Node names produced, in positional order. Never empty.
    pub fn outs(&self) -> &[String] {
        &self.outs
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.op.name() == other.op.name() && self.ins == other.ins && self.outs == other.outs
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.op.name().hash(state);
        self.ins.hash(state);
        self.outs.hash(state);
    }
}

/// A validated unit of work: an edge set plus its trigger inputs.
///
/// Construction resolves the edge set immediately; a broken definition
/// never produces a `Workflow` value. Fields are set once and never
/// mutated. The id carries a random suffix for log correlation only;
/// lookups go through the name.
pub struct Workflow {
    id: String,
    name: String,
    edges: Vec<Edge>,
    solution: Solution,
    sensor: Option<Sensor>,
    config: Value,
}

impl Workflow {
    /// Validate and build a workflow.
    ///
    /// Duplicate output names and unresolvable graphs are rejected here,
    /// before the workflow can be registered anywhere. `config` is opaque
    /// to the engine and carried for the operations' own use.
    pub fn new(
        name: impl Into<String>,
        edges: Vec<Edge>,
        sensor: Option<Sensor>,
        config: Value,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        let solution = resolve(&edges)?;
        let id = format!("{}@{}", name, rand::random::<u32>());
        tracing::debug!(workflow = %id, epochs = solution.epochs().len(), "workflow validated");
        Ok(Self {
            id,
            name,
            edges,
            solution,
            sensor,
            config,
        })
    }

    /// Identifier for log correlation, `<name>@<random u32>`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Workflow name, unique within the registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The edge set this workflow was defined with.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Epoch ordering computed at construction, reused by every execution.
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// The attached sensor, if this workflow is sensor-triggered.
    pub fn sensor(&self) -> Option<&Sensor> {
        self.sensor.as_ref()
    }

    /// Opaque configuration attached at construction.
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Run one full pass over the graph and return the node registry.
    pub async fn execute(&self) -> Result<Registry> {
        tracing::info!(workflow = %self.id, "🚀 workflow execution started");
        let started = std::time::Instant::now();
        let registry = self.solution.execute().await?;
        tracing::info!(
            workflow = %self.id,
            elapsed = ?started.elapsed(),
            nodes = registry.len(),
            "✅ workflow execution finished"
        );
        Ok(registry)
    }

    /// Poll the attached sensor and execute whenever it fires.
    ///
    /// Runs until the timeout budget is exceeded, an operation or the
    /// sensor fails, or `cancel` is triggered.
    pub async fn execute_on_sensor(
        self: Arc<Self>,
        settings: crate::runtime::sensor::PollSettings,
        cancel: tokio_util::sync::CancellationToken,
    ) -> Result<()> {
        crate::runtime::sensor::poll(self, settings, cancel).await
    }

    /// Execute at each fire time of a cron schedule until cancelled.
    pub async fn execute_on_schedule(
        self: Arc<Self>,
        schedule: &str,
        cancel: tokio_util::sync::CancellationToken,
    ) -> Result<()> {
        crate::runtime::scheduler::run(self, schedule, cancel).await
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("edges", &self.edges.len())
            .field("epochs", &self.solution.epochs().len())
            .field("sensor", &self.sensor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constant(name: &str, value: i64) -> Operation {
        Operation::single(name, 0, move |_args| async move { Ok(json!(value)) })
    }

    #[test]
    fn edge_rejects_arity_mismatch() {
        let op = constant("one", 1);
        let err = Edge::new(op, &["a", "b"], &["c"]).unwrap_err();
        assert!(matches!(err, GraphError::ArityMismatch { .. }));
    }

    #[test]
    fn edge_rejects_empty_outputs() {
        let op = constant("one", 1);
        let err = Edge::new(op, &[], &[]).unwrap_err();
        assert!(matches!(err, GraphError::NoOutputs { .. }));
    }

    #[test]
    fn edges_compare_by_value() {
        let a = Edge::new(constant("one", 1), &[], &["a"]).unwrap();
        let b = Edge::new(constant("one", 2), &[], &["a"]).unwrap();
        let c = Edge::new(constant("two", 1), &[], &["a"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn single_output_is_wrapped() {
        let op = constant("one", 7);
        let values = op.call(Vec::new()).await.unwrap();
        assert_eq!(values, vec![json!(7)]);
    }

    #[test]
    fn workflow_id_carries_name_prefix() {
        let edges = vec![Edge::new(constant("one", 1), &[], &["a"]).unwrap()];
        let workflow = Workflow::new("Sample", edges, None, Value::Null).unwrap();
        assert!(workflow.id().starts_with("Sample@"));
        assert_eq!(workflow.name(), "Sample");
    }

    #[test]
    fn workflow_rejects_unsolvable_edges() {
        let needs_input =
            Operation::single("needs_input", 1, |_args| async move { Ok(json!(0)) });
        let edges = vec![Edge::new(needs_input, &["missing"], &["out"]).unwrap()];
        let err = Workflow::new("Broken", edges, None, Value::Null).unwrap_err();
        assert!(matches!(err, GraphError::Unsolvable { .. }));
    }
}
