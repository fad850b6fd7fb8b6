//! Configuration for RelaySim execution
//!
//! Holds the board size used for new and fallback boards and the cadences of
//! the two periodic tasks. Loaded from TOML; missing keys take the defaults.

use crate::core::errors::{SimError, SimResult};
use crate::core::types::BoardSize;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Size of a new board and of the empty board used after a failed load
    pub default_board_size: BoardSize,
    /// Period of the fast tick (trace, relays, lights)
    pub fast_tick_ms: u64,
    /// Period of the slow tick (timer countdown)
    pub slow_tick_ms: u64,
}

impl SimulationConfig {
    /// Create a configuration with default values: 10x10 board, 10ms fast tick,
    /// 100ms slow tick
    pub fn new() -> Self {
        Self {
            default_board_size: BoardSize::Small,
            fast_tick_ms: 10,
            slow_tick_ms: 100,
        }
    }

    /// Set the size of new boards
    ///
    /// # Arguments
    /// * `size` - Board size for a fresh engine and for the empty board left after
    ///   a corrupt load
    ///
    /// # Returns
    /// A new configuration with the specified board size
    pub fn with_board_size(mut self, size: BoardSize) -> Self {
        self.default_board_size = size;
        self
    }

    /// Set the fast tick period
    ///
    /// # Arguments
    /// * `millis` - Milliseconds between trace and relay evaluations
    ///
    /// # Returns
    /// A new configuration with the specified fast tick
    pub fn with_fast_tick_ms(mut self, millis: u64) -> Self {
        self.fast_tick_ms = millis;
        self
    }

    /// Set the slow tick period
    ///
    /// # Arguments
    /// * `millis` - Milliseconds between countdown updates of timing relays
    ///
    /// # Returns
    /// A new configuration with the specified slow tick
    ///
    /// # Note
    /// Countdowns are measured against the clock, so this only changes how often
    /// the remaining seconds are reported
    pub fn with_slow_tick_ms(mut self, millis: u64) -> Self {
        self.slow_tick_ms = millis;
        self
    }

    /// Fast tick period as a [`Duration`]
    pub fn fast_tick(&self) -> Duration {
        Duration::from_millis(self.fast_tick_ms)
    }

    pub fn slow_tick(&self) -> Duration {
        Duration::from_millis(self.slow_tick_ms)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(raw: &str) -> SimResult<Self> {
        let config: SimulationConfig =
            toml::from_str(raw).map_err(|err| SimError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    ///
    /// # Arguments
    /// * `path` - TOML file; keys it leaves out take their default values
    ///
    /// # Returns
    /// The parsed configuration, [`SimError::Io`] when the file cannot be read or
    /// [`SimError::InvalidConfig`] when it does not parse or a tick period is zero
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml_string(&self) -> SimResult<String> {
        toml::to_string_pretty(self).map_err(|err| SimError::InvalidConfig(err.to_string()))
    }

    fn validate(&self) -> SimResult<()> {
        if self.fast_tick_ms == 0 || self.slow_tick_ms == 0 {
            return Err(SimError::InvalidConfig(
                "tick periods must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
