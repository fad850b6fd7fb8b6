pub mod cell;
pub mod registry;
pub mod visual;

// Re-export commonly used types
pub use cell::{Cell, CellKind, Component, ContactType, LightColor, RailFlags, TimerKind};
pub use registry::{LightRuntime, RelayRuntime, RuntimeRegistry, SLOT_COUNT};
pub use visual::{CoilIndicator, Visual};
