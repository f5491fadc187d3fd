/// Flowline: dependency-graph workflow orchestration engine
///
/// This library provides a lightweight orchestration core: workflows are
/// directed dependency graphs of async operations, resolved into ordered
/// epochs at construction and re-triggered by a polling sensor or a cron
/// schedule.

// Core configuration and setup
pub mod config;

// Workflow management layer - definitions, validation errors, and registry
pub mod workflow;

// Runtime execution engine - epoch resolution, execution, and trigger loops
pub mod runtime;

// Reusable operation and sensor leaves for the catalog
pub mod ops;

// Built-in workflow catalog and the discovery pass
pub mod catalog;

// Application wiring and lifecycle
pub mod app;

// Re-export commonly used types for external consumers
pub use app::Application;
pub use config::Config;
pub use runtime::{resolve, PollSettings, Solution};
pub use workflow::{sensor, Edge, GraphError, Operation, Registry, Sensor, Workflow, WorkflowRegistry};
