/// Dependency-graph resolver
///
/// Partitions a workflow's edge set into ordered epochs: batches of edges
/// whose inputs are all produced by strictly earlier epochs. Runs once at
/// workflow construction; the resulting Solution is cached and reused for
/// every execution, so a broken definition can never reach the registry.

use crate::workflow::error::GraphError;
use crate::workflow::types::Edge;
use std::collections::HashSet;

/// Ordered epoch sequence for one workflow's edge set.
///
/// Epochs run strictly in order; edges within an epoch are mutually
/// independent by construction. Definition order is preserved inside each
/// epoch so the layering is reproducible.
#[derive(Debug, Clone)]
pub struct Solution {
    epochs: Vec<Vec<Edge>>,
}

impl Solution {
    pub(crate) fn from_epochs(epochs: Vec<Vec<Edge>>) -> Self {
        Self { epochs }
    }

    /// The ordered epochs.
    pub fn epochs(&self) -> &[Vec<Edge>] {
        &self.epochs
    }

    /// Total number of edges across all epochs.
    pub fn edge_count(&self) -> usize {
        self.epochs.iter().map(Vec::len).sum()
    }
}

/// Partition `edges` into ordered epochs, or fail.
///
/// Duplicate output names are rejected first: that is a configuration
/// error, distinct from unsolvability. Then an iterative fixed point runs
/// over a known-node-name set and a worklist of unplaced edges: every
/// round selects each edge whose full input set is already known (edges
/// with no inputs always qualify). A round that selects nothing while
/// edges remain means a cycle or a dangling input reference.
pub fn resolve(edges: &[Edge]) -> Result<Solution, GraphError> {
    let mut declared: HashSet<&str> = HashSet::new();
    for edge in edges {
        for out in edge.outs() {
            if !declared.insert(out.as_str()) {
                return Err(GraphError::DuplicateOutput { name: out.clone() });
            }
        }
    }

    let mut known: HashSet<String> = HashSet::new();
    let mut remaining: Vec<Edge> = edges.to_vec();
    let mut epochs: Vec<Vec<Edge>> = Vec::new();

    while !remaining.is_empty() {
        let (ready, blocked): (Vec<Edge>, Vec<Edge>) = remaining
            .into_iter()
            .partition(|edge| edge.ins().iter().all(|name| known.contains(name)));

        if ready.is_empty() {
            return Err(GraphError::Unsolvable {
                operations: blocked
                    .iter()
                    .map(|edge| edge.op().name().to_string())
                    .collect(),
            });
        }

        for edge in &ready {
            known.extend(edge.outs().iter().cloned());
        }
        tracing::debug!(
            epoch = epochs.len(),
            edges = ready.len(),
            known_nodes = known.len(),
            unplaced = blocked.len(),
            "epoch resolved"
        );
        epochs.push(ready);
        remaining = blocked;
    }

    Ok(Solution::from_epochs(epochs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::types::Operation;
    use serde_json::json;
    use std::collections::HashMap;

    fn producer(name: &str, outs: usize) -> Operation {
        Operation::new(name, 0, outs, move |_args| {
            let values = vec![json!(0); outs];
            async move { Ok(values) }
        })
    }

    fn consumer(name: &str, ins: usize) -> Operation {
        Operation::single(name, ins, |_args| async move { Ok(json!(0)) })
    }

    fn worked_example() -> Vec<Edge> {
        vec![
            Edge::new(consumer("op1", 2), &["a", "b"], &["c"]).unwrap(),
            Edge::new(producer("op2", 2), &[], &["a", "not_used"]).unwrap(),
            Edge::new(producer("op3", 1), &[], &["b"]).unwrap(),
            Edge::new(consumer("op4", 2), &["a", "c"], &["d"]).unwrap(),
            Edge::new(consumer("op5", 2), &["a", "a"], &["e"]).unwrap(),
        ]
    }

    fn epoch_names(solution: &Solution) -> Vec<Vec<&str>> {
        solution
            .epochs()
            .iter()
            .map(|epoch| epoch.iter().map(|edge| edge.op().name()).collect())
            .collect()
    }

    #[test]
    fn worked_example_layers_into_three_epochs() {
        let solution = resolve(&worked_example()).unwrap();
        assert_eq!(
            epoch_names(&solution),
            vec![vec!["op2", "op3"], vec!["op1"], vec!["op4", "op5"]],
        );
    }

    #[test]
    fn every_edge_lands_after_its_producers() {
        let edges = worked_example();
        let solution = resolve(&edges).unwrap();

        let mut produced_at: HashMap<&str, usize> = HashMap::new();
        for (index, epoch) in solution.epochs().iter().enumerate() {
            for edge in epoch {
                for out in edge.outs() {
                    produced_at.insert(out.as_str(), index);
                }
            }
        }
        for (index, epoch) in solution.epochs().iter().enumerate() {
            for edge in epoch {
                for input in edge.ins() {
                    assert!(
                        produced_at[input.as_str()] < index,
                        "input '{input}' of '{}' not produced strictly earlier",
                        edge.op().name(),
                    );
                }
            }
        }
    }

    #[test]
    fn cycle_is_unsolvable() {
        let edges = vec![
            Edge::new(consumer("x", 1), &["y_out"], &["x_out"]).unwrap(),
            Edge::new(consumer("y", 1), &["x_out"], &["y_out"]).unwrap(),
        ];
        let err = resolve(&edges).unwrap_err();
        match err {
            GraphError::Unsolvable { operations } => assert_eq!(operations.len(), 2),
            other => panic!("expected Unsolvable, got {other:?}"),
        }
    }

    #[test]
    fn dangling_input_is_unsolvable() {
        let edges = vec![
            Edge::new(producer("start", 1), &[], &["a"]).unwrap(),
            Edge::new(consumer("orphan", 1), &["never_produced"], &["b"]).unwrap(),
        ];
        let err = resolve(&edges).unwrap_err();
        match err {
            GraphError::Unsolvable { operations } => {
                assert_eq!(operations, vec!["orphan".to_string()])
            }
            other => panic!("expected Unsolvable, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_output_rejected_even_when_solvable() {
        let edges = vec![
            Edge::new(producer("first", 1), &[], &["a"]).unwrap(),
            Edge::new(producer("second", 1), &[], &["a"]).unwrap(),
        ];
        let err = resolve(&edges).unwrap_err();
        match err {
            GraphError::DuplicateOutput { name } => assert_eq!(name, "a"),
            other => panic!("expected DuplicateOutput, got {other:?}"),
        }
    }

    #[test]
    fn empty_edge_set_resolves_to_no_epochs() {
        let solution = resolve(&[]).unwrap();
        assert!(solution.epochs().is_empty());
        assert_eq!(solution.edge_count(), 0);
    }
}
