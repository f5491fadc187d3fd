/// Workflow Management Layer
///
/// This module handles workflow definitions and the in-memory registry.
/// It provides the core workflow functionality including:
/// - Type definitions (Operation, Edge, Workflow, Sensor)
/// - Definition-time error taxonomy
/// - The discovery-owned workflow registry

// Core workflow type definitions
pub mod types;

// Definition-time errors
pub mod error;

// Registry populated by the discovery pass
pub mod registry;

// Re-export commonly used types
pub use error::GraphError;
pub use registry::WorkflowRegistry;
pub use types::{sensor, Edge, Operation, Registry, Sensor, Workflow};
