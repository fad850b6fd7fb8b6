pub mod clock;
pub mod config;
pub mod relay_engine;
pub mod simulation_engine;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SimulationConfig;
pub use relay_engine::{CountdownUpdate, RelayEvaluation, RelayTimerEngine};
pub use simulation_engine::SimulationEngine;

/// Top-level state: editing the board or running it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Edit,
    Run,
}

/// Whether a periodic tick did any work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Applied,
    /// Not running, or nothing to do; the board is untouched
    Skipped,
}
