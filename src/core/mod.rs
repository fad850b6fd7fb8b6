pub mod board;
pub mod components;
pub mod connections;
pub mod errors;
pub mod events;
pub mod execution;
pub mod interaction;
pub mod persistence;
pub mod tool;
pub mod types;

// Re-export commonly used types
pub use board::Board;
pub use components::{Cell, CellKind, Component, ContactType, LightColor, TimerKind, Visual};
pub use connections::{ConnectivityTracer, EdgeValidator, TraceReport};
pub use errors::{SimError, SimResult};
pub use events::{SimEvent, SimulationObserver};
pub use execution::{Clock, ManualClock, Mode, SimulationConfig, SimulationEngine, SystemClock, TickOutcome};
pub use interaction::{InteractionLayer, LightState};
pub use persistence::BoardCodec;
pub use tool::{PlacementTool, Template};
pub use types::{BoardSize, ComponentTag, Direction, EdgeMask, Position, Rail, TagFamily};

#[cfg(test)]
mod tests;
