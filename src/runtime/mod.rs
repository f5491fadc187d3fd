/// Runtime Execution Engine
///
/// This module resolves workflow edge sets into ordered epochs and drives
/// their execution. It handles:
/// - Fixed-point epoch layering of the dependency graph
/// - Concurrent intra-epoch execution with a shared node registry
/// - The two trigger strategies: sensor polling and cron scheduling

// Epoch layering of the dependency graph
pub mod resolver;

// Sequential-epoch, concurrent-edge execution
pub mod executor;

// Sensor-poll trigger loop
pub mod sensor;

// Cron-schedule trigger loop
pub mod scheduler;

// Re-export main types
pub use resolver::{resolve, Solution};
pub use sensor::PollSettings;
