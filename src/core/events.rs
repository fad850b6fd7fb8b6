use crate::core::components::Visual;
use crate::core::execution::Mode;
use crate::core::types::{ComponentTag, Position};
use serde::Serialize;

/// State changes reported to the rendering side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A cell's visual state differs from the last one reported
    CellVisual { pos: Position, visual: Visual },
    /// Whole seconds left on a relay timer
    Countdown {
        tag: ComponentTag,
        position: Position,
        remaining_secs: u64,
    },
    /// Countdown finished or was cancelled; the label goes away
    CountdownCleared { tag: ComponentTag, position: Position },
    ModeChanged { mode: Mode },
}

/// Trait for observing simulation events
pub trait SimulationObserver {
    /// Called for every event in the order it was produced
    fn on_event(&mut self, event: &SimEvent);

    /// Called after each applied fast tick
    fn on_tick_complete(&mut self, _tick: u64) {}
}
