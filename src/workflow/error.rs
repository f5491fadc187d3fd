/// Definition-time error taxonomy
///
/// Every variant here is raised while a workflow is being constructed,
/// never during execution. A workflow whose definition trips one of these
/// is rejected before it can reach the registry.

/// Errors detected while validating a workflow definition.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Two edges declare the same output node name.
    #[error("output node '{name}' is declared by more than one edge")]
    DuplicateOutput { name: String },

    /// The fixed point left edges unplaced: a cycle, or an input no edge produces.
    #[error("graph is unsolvable (cycle or missing input), edges left unplaced: {operations:?}")]
    Unsolvable { operations: Vec<String> },

    /// The operation's declared arity disagrees with the edge's wiring.
    #[error(
        "operation '{operation}' takes {declared_inputs} input(s) and returns \
         {declared_outputs} output(s), but the edge wires {wired_inputs} \
         input(s) and {wired_outputs} output(s)"
    )]
    ArityMismatch {
        operation: String,
        declared_inputs: usize,
        wired_inputs: usize,
        declared_outputs: usize,
        wired_outputs: usize,
    },

    /// An edge must produce at least one named output.
    #[error("edge for operation '{operation}' declares no outputs")]
    NoOutputs { operation: String },

    /// Sensor polling was requested for a workflow built without a sensor.
    #[error("workflow '{workflow}' has no sensor attached")]
    MissingSensor { workflow: String },
}
