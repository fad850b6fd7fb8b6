//! Relay ladder circuit simulator core.
//!
//! A [`Board`] holds a square grid of wires, buttons, relay contacts, coils and
//! lights. [`SimulationEngine`] traces the L and N supply rails through it on
//! every tick, drives relay coils and their timers, and reports visual state
//! changes to observers.

pub mod core;

// Re-export commonly used types
pub use crate::core::board::Board;
pub use crate::core::components::{Cell, ContactType, LightColor, TimerKind};
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::events::{SimEvent, SimulationObserver};
pub use crate::core::execution::{Mode, SimulationConfig, SimulationEngine, TickOutcome};
pub use crate::core::types::{BoardSize, ComponentTag, EdgeMask, Position};
