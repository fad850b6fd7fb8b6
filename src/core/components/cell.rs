use crate::core::types::{ComponentTag, EdgeMask, Rail, TagFamily};
use serde::{Deserialize, Serialize};

/// Whether a button or contact passes current at rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    /// NO: open at rest, closed when actuated
    NormallyOpen,
    /// NC: closed at rest, open when actuated
    NormallyClosed,
}

impl ContactType {
    /// Conductive state for the given actuation (button pressed, relay pulled in)
    pub fn closed_when(self, actuated: bool) -> bool {
        match self {
            ContactType::NormallyOpen => actuated,
            ContactType::NormallyClosed => !actuated,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ContactType::NormallyOpen => "NO",
            ContactType::NormallyClosed => "NC",
        }
    }
}

/// Relay coil behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    Normal,
    OnDelay,
    OffDelay,
}

impl TimerKind {
    pub fn is_timed(self) -> bool {
        !matches!(self, TimerKind::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightColor {
    Green,
    Yellow,
    Red,
}

impl LightColor {
    pub fn code(self) -> char {
        match self {
            LightColor::Green => 'g',
            LightColor::Yellow => 'y',
            LightColor::Red => 'r',
        }
    }
}

/// Discriminant of [`Component`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Wire,
    Button,
    Contact,
    Coil,
    Light,
}

/// What occupies a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    Empty,
    Wire,
    Button { tag: ComponentTag, contact: ContactType },
    Contact { tag: ComponentTag, contact: ContactType },
    Coil { tag: ComponentTag, timer: TimerKind, delay_secs: u32 },
    Light { tag: ComponentTag, color: LightColor },
}

impl Component {
    pub fn kind(&self) -> CellKind {
        match self {
            Component::Empty => CellKind::Empty,
            Component::Wire => CellKind::Wire,
            Component::Button { .. } => CellKind::Button,
            Component::Contact { .. } => CellKind::Contact,
            Component::Coil { .. } => CellKind::Coil,
            Component::Light { .. } => CellKind::Light,
        }
    }

    pub fn tag(&self) -> Option<ComponentTag> {
        match *self {
            Component::Empty | Component::Wire => None,
            Component::Button { tag, .. }
            | Component::Contact { tag, .. }
            | Component::Coil { tag, .. }
            | Component::Light { tag, .. } => Some(tag),
        }
    }

    /// Id family a component of this kind must carry
    pub fn tag_family(&self) -> Option<TagFamily> {
        match self {
            Component::Empty | Component::Wire => None,
            Component::Button { .. } => Some(TagFamily::Switch),
            Component::Contact { .. } | Component::Coil { .. } => Some(TagFamily::Relay),
            Component::Light { .. } => Some(TagFamily::Lamp),
        }
    }

    /// Conductive state right after placement (and after a run is stopped)
    pub fn resting_conductive(&self) -> bool {
        match self {
            Component::Empty => false,
            Component::Button { contact, .. } | Component::Contact { contact, .. } => {
                contact.closed_when(false)
            }
            Component::Wire | Component::Coil { .. } | Component::Light { .. } => true,
        }
    }

    /// Token used for this component in the board file
    pub fn kind_token(&self) -> &'static str {
        match self {
            Component::Empty => "empty",
            Component::Wire => "line",
            Component::Button { contact: ContactType::NormallyOpen, .. } => "buttonNO",
            Component::Button { contact: ContactType::NormallyClosed, .. } => "buttonNC",
            Component::Contact { contact: ContactType::NormallyOpen, .. } => "contactNO",
            Component::Contact { contact: ContactType::NormallyClosed, .. } => "contactNC",
            Component::Coil { timer: TimerKind::Normal, .. } => "relaycoil",
            Component::Coil { timer: TimerKind::OnDelay, .. } => "ontimercoil",
            Component::Coil { timer: TimerKind::OffDelay, .. } => "offtimercoil",
            Component::Light { color: LightColor::Green, .. } => "greenlight",
            Component::Light { color: LightColor::Yellow, .. } => "yellowlight",
            Component::Light { color: LightColor::Red, .. } => "redlight",
        }
    }
}

/// Per-rail pair of flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RailFlags {
    pub positive: bool,
    pub negative: bool,
}

impl RailFlags {
    pub fn get(&self, rail: Rail) -> bool {
        match rail {
            Rail::Positive => self.positive,
            Rail::Negative => self.negative,
        }
    }

    pub fn set(&mut self, rail: Rail, value: bool) {
        match rail {
            Rail::Positive => self.positive = value,
            Rail::Negative => self.negative = value,
        }
    }

    pub fn both(&self) -> bool {
        self.positive && self.negative
    }
}

/// A single grid cell.
///
/// `component` and `edges` are fixed at placement. `conductive` is switched by
/// buttons and relay contacts while running, `reached` and `live` are rebuilt
/// by every trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    component: Component,
    edges: EdgeMask,
    pub(crate) conductive: bool,
    pub(crate) reached: RailFlags,
    pub(crate) live: RailFlags,
}

impl Cell {
    fn with_component(component: Component, edges: EdgeMask) -> Self {
        Self {
            component,
            edges,
            conductive: component.resting_conductive(),
            reached: RailFlags::default(),
            live: RailFlags::default(),
        }
    }

    pub fn empty() -> Self {
        Self::with_component(Component::Empty, EdgeMask::NONE)
    }

    pub fn wire(edges: EdgeMask) -> Self {
        Self::with_component(Component::Wire, edges)
    }

    pub fn button(tag: ComponentTag, contact: ContactType) -> Self {
        Self::with_component(Component::Button { tag, contact }, EdgeMask::HORIZONTAL)
    }

    pub fn contact(tag: ComponentTag, contact: ContactType) -> Self {
        Self::with_component(Component::Contact { tag, contact }, EdgeMask::HORIZONTAL)
    }

    pub fn coil(tag: ComponentTag, timer: TimerKind, delay_secs: u32) -> Self {
        let delay_secs = if timer.is_timed() { delay_secs } else { 0 };
        Self::with_component(Component::Coil { tag, timer, delay_secs }, EdgeMask::HORIZONTAL)
    }

    pub fn light(tag: ComponentTag, color: LightColor) -> Self {
        Self::with_component(Component::Light { tag, color }, EdgeMask::HORIZONTAL)
    }

    /// Rebuild a cell exactly as it was persisted
    pub fn restored(component: Component, edges: EdgeMask, conductive: bool) -> Self {
        Self {
            conductive,
            ..Self::with_component(component, edges)
        }
    }

    /// Replace the default wiring of a component
    pub fn with_edges(mut self, edges: EdgeMask) -> Self {
        self.edges = edges;
        self
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    pub fn kind(&self) -> CellKind {
        self.component.kind()
    }

    pub fn tag(&self) -> Option<ComponentTag> {
        self.component.tag()
    }

    pub fn edges(&self) -> EdgeMask {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.kind() == CellKind::Empty
    }

    pub fn is_conductive(&self) -> bool {
        self.conductive
    }

    pub fn reached(&self, rail: Rail) -> bool {
        self.reached.get(rail)
    }

    pub fn reached_positive(&self) -> bool {
        self.reached.positive
    }

    pub fn reached_negative(&self) -> bool {
        self.reached.negative
    }

    /// Reached by both rails: a coil here is energized, a light here is on
    pub fn is_powered(&self) -> bool {
        self.reached.both()
    }

    /// Highlight flag for drawing the cell as carrying this rail
    pub fn is_live(&self, rail: Rail) -> bool {
        self.live.get(rail)
    }

    /// Coils and lights take current but never pass it on
    pub fn is_sink(&self) -> bool {
        matches!(self.kind(), CellKind::Coil | CellKind::Light)
    }

    pub fn delay_secs(&self) -> u32 {
        match self.component {
            Component::Coil { delay_secs, .. } => delay_secs,
            _ => 0,
        }
    }

    pub(crate) fn clear_transient(&mut self) {
        self.reached = RailFlags::default();
        self.live = RailFlags::default();
    }

    /// Put a button or contact back into its resting position
    pub(crate) fn rest(&mut self) {
        self.conductive = self.component.resting_conductive();
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}
