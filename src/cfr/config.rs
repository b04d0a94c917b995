//! Configuration and statistics for the CFR solver.

use serde::{Deserialize, Serialize};

/// Configuration for the CFR solver.
///
/// The core algorithm is vanilla full-tree CFR and takes no tuning knobs;
/// the options here only control diagnostics.
///
/// # Example
/// ```
/// use tree_cfr::cfr::CfrConfig;
///
/// let config = CfrConfig::default().with_exploitability_interval(1000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfrConfig {
    /// Evaluate and record the average profile's exploitability every this
    /// many iterations during `train`. `None` disables recording.
    ///
    /// Exploitability evaluation walks the whole tree and is far more
    /// expensive than a training iteration; keep the interval coarse for
    /// anything beyond toy games.
    pub exploitability_interval: Option<u64>,
}

impl CfrConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: record exploitability every `interval` iterations.
    pub fn with_exploitability_interval(mut self, interval: u64) -> Self {
        self.exploitability_interval = Some(interval);
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exploitability_interval == Some(0) {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }
}

/// Errors that can occur when validating CFR configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The exploitability interval must be at least 1.
    InvalidInterval,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidInterval => {
                write!(f, "exploitability interval must be at least 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfrStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of player-owned information sets in the game.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Most recent exploitability measurement (if recorded).
    pub exploitability: Option<f64>,

    /// History of exploitability measurements.
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// A single exploitability measurement at a specific iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploitabilityPoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Exploitability of the average profile at that point.
    pub exploitability: f64,
}

impl CfrStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record an exploitability measurement.
    pub fn record_exploitability(&mut self, iteration: u64, exploitability: f64) {
        self.exploitability = Some(exploitability);
        self.exploitability_history.push(ExploitabilityPoint {
            iteration,
            exploitability,
        });
    }
}
