/// Demonstration workflow
///
/// Five arithmetic operations wired into a three-epoch graph, triggered by
/// a sensor that alternates between firing and staying quiet. Useful for
/// smoke-testing an installation end to end without touching any remote
/// system.

use crate::workflow::error::GraphError;
use crate::workflow::types::{sensor, Edge, Operation, Workflow};
use anyhow::anyhow;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn int(value: &Value) -> anyhow::Result<i64> {
    value.as_i64().ok_or_else(|| anyhow!("expected an integer, got {value}"))
}

fn add(name: &str, delay: Duration) -> Operation {
    Operation::single(name, 2, move |args| async move {
        tokio::time::sleep(delay).await;
        Ok(json!(int(&args[0])? + int(&args[1])?))
    })
}

/// Build the `ExampleWorkflow` definition.
pub fn workflow() -> Result<Workflow, GraphError> {
    let some_op1 = add("some_op1", Duration::from_millis(500));
    let some_op2 = Operation::new("some_op2", 0, 2, |_args| async move {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        Ok(vec![json!(1), json!("x")])
    });
    let some_op3 = Operation::single("some_op3", 0, |_args| async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(json!(2))
    });
    let some_op4 = add("some_op4", Duration::from_millis(500));
    let some_op5 = add("some_op5", Duration::from_millis(1500));

    let edges = vec![
        Edge::new(some_op1, &["a", "b"], &["c"])?,
        Edge::new(some_op2, &[], &["a", "not_used"])?,
        Edge::new(some_op3, &[], &["b"])?,
        Edge::new(some_op4, &["a", "c"], &["d"])?,
        Edge::new(some_op5, &["a", "a"], &["e"])?,
    ];

    // Fires on the first check, stays quiet on the next, and so on.
    let firing = Arc::new(AtomicBool::new(true));
    let alternating = sensor(move || {
        let firing = Arc::clone(&firing);
        async move { Ok(firing.fetch_xor(true, Ordering::Relaxed)) }
    });

    Workflow::new(
        "ExampleWorkflow",
        edges,
        Some(alternating),
        json!({ "some_key": "some value" }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn demo_executes_to_expected_registry() {
        let workflow = workflow().unwrap();
        let registry = workflow.execute().await.unwrap();

        assert_eq!(registry["a"], json!(1));
        assert_eq!(registry["not_used"], json!("x"));
        assert_eq!(registry["b"], json!(2));
        assert_eq!(registry["c"], json!(3));
        assert_eq!(registry["d"], json!(4));
        assert_eq!(registry["e"], json!(2));
    }

    #[tokio::test]
    async fn demo_sensor_alternates() {
        let workflow = workflow().unwrap();
        let probe = workflow.sensor().cloned().unwrap();
        assert!((*probe)().await.unwrap());
        assert!(!(*probe)().await.unwrap());
        assert!((*probe)().await.unwrap());
    }
}
