/// Configuration management for the flowline engine
///
/// Handles trigger-loop tuning and runtime parameters.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Trigger-loop configuration
    pub trigger: TriggerConfig,
}

/// Sensor-poll trigger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Seconds between sensor checks (default: 5)
    pub poll_interval_secs: u64,
    /// Budget in seconds for one execution inside the poll loop (default: 10)
    pub execution_timeout_secs: u64,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            trigger: TriggerConfig {
                poll_interval_secs: std::env::var("FLOWLINE_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                execution_timeout_secs: std::env::var("FLOWLINE_EXECUTION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
        }
    }
}
