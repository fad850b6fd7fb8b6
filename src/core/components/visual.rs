use crate::core::components::cell::{Cell, Component, ContactType, LightColor, TimerKind};
use crate::core::components::registry::RelayRuntime;
use crate::core::types::EdgeMask;
use serde::{Deserialize, Serialize};

/// Display state of a relay coil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoilIndicator {
    /// Not energized
    Idle,
    /// Timer is counting, contacts have not yet switched (on-delay)
    Counting,
    /// Contacts are pulled in
    Energized,
    /// Timer has released the contacts while still powered (off-delay)
    Released,
}

/// What a renderer needs to draw one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visual {
    Empty,
    Wire { edges: EdgeMask, positive: bool, negative: bool },
    Button { contact: ContactType, closed: bool, live: bool },
    Contact { contact: ContactType, closed: bool, live: bool },
    Coil { timer: TimerKind, indicator: CoilIndicator },
    Light { color: LightColor, lit: bool },
}

impl Visual {
    /// Derive the visual state of a cell from its kind, conductive and reached flags,
    /// and for coils the timing state of its relay.
    pub fn of(cell: &Cell, relay: Option<&RelayRuntime>) -> Self {
        let live = cell.is_conductive() && cell.reached_positive();
        match *cell.component() {
            Component::Empty => Visual::Empty,
            Component::Wire => Visual::Wire {
                edges: cell.edges(),
                positive: cell.live.positive,
                negative: cell.live.negative,
            },
            Component::Button { contact, .. } => Visual::Button {
                contact,
                closed: cell.is_conductive(),
                live,
            },
            Component::Contact { contact, .. } => Visual::Contact {
                contact,
                closed: cell.is_conductive(),
                live,
            },
            Component::Coil { timer, .. } => Visual::Coil {
                timer,
                indicator: coil_indicator(cell, timer, relay),
            },
            Component::Light { color, .. } => Visual::Light {
                color,
                lit: cell.is_powered(),
            },
        }
    }

    /// Stable sprite name, e.g. `btn_NO_c_r` or `coil_ontimer_off`
    pub fn sprite(&self) -> String {
        match self {
            Visual::Empty => "line_empty".to_string(),
            Visual::Wire { edges, positive, negative } => {
                let mut name = format!("line_{}", edges.shape());
                if *positive {
                    name.push_str("_r");
                }
                if *negative {
                    name.push_str("_b");
                }
                name
            }
            Visual::Button { contact, closed, live } => switch_sprite("btn", *contact, *closed, *live),
            Visual::Contact { contact, closed, live } => switch_sprite("contact", *contact, *closed, *live),
            Visual::Coil { timer, indicator } => {
                let base = match timer {
                    TimerKind::Normal => "coil_norm",
                    TimerKind::OnDelay => "coil_ontimer",
                    TimerKind::OffDelay => "coil_offtimer",
                };
                match indicator {
                    CoilIndicator::Idle => base.to_string(),
                    CoilIndicator::Energized => format!("{}_r", base),
                    CoilIndicator::Counting | CoilIndicator::Released => format!("{}_off", base),
                }
            }
            Visual::Light { color, lit } => {
                format!("light_{}_{}", color.code(), if *lit { "on" } else { "off" })
            }
        }
    }
}

fn switch_sprite(prefix: &str, contact: ContactType, closed: bool, live: bool) -> String {
    match (closed, live) {
        (false, _) => format!("{}_{}_o", prefix, contact.code()),
        (true, false) => format!("{}_{}_c", prefix, contact.code()),
        (true, true) => format!("{}_{}_c_r", prefix, contact.code()),
    }
}

fn coil_indicator(cell: &Cell, timer: TimerKind, relay: Option<&RelayRuntime>) -> CoilIndicator {
    let Some(relay) = relay else {
        return CoilIndicator::Idle;
    };
    match timer {
        TimerKind::Normal if cell.is_powered() => CoilIndicator::Energized,
        TimerKind::Normal => CoilIndicator::Idle,
        TimerKind::OnDelay if relay.is_countdown_done() => CoilIndicator::Energized,
        TimerKind::OnDelay if relay.is_timing() => CoilIndicator::Counting,
        TimerKind::OffDelay if relay.is_timing() => CoilIndicator::Energized,
        TimerKind::OffDelay if relay.is_countdown_done() => CoilIndicator::Released,
        TimerKind::OnDelay | TimerKind::OffDelay => CoilIndicator::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ComponentTag;

    #[test]
    fn test_switch_sprites() {
        let tag = ComponentTag::switch(0).unwrap();
        let mut button = Cell::button(tag, ContactType::NormallyClosed);
        assert_eq!(Visual::of(&button, None).sprite(), "btn_NC_c");

        button.reached.positive = true;
        assert_eq!(Visual::of(&button, None).sprite(), "btn_NC_c_r");

        button.conductive = false;
        assert_eq!(Visual::of(&button, None).sprite(), "btn_NC_o");
    }

    #[test]
    fn test_wire_sprite_carries_rail_marks() {
        let mut wire = Cell::wire(EdgeMask::from_shape("ldr"));
        assert_eq!(Visual::of(&wire, None).sprite(), "line_ldr");
        wire.live.positive = true;
        wire.live.negative = true;
        assert_eq!(Visual::of(&wire, None).sprite(), "line_ldr_r_b");
    }

    #[test]
    fn test_light_sprite() {
        let tag = ComponentTag::lamp(1).unwrap();
        let mut lamp = Cell::light(tag, LightColor::Yellow);
        assert_eq!(Visual::of(&lamp, None).sprite(), "light_y_off");
        lamp.reached.positive = true;
        lamp.reached.negative = true;
        assert_eq!(Visual::of(&lamp, None).sprite(), "light_y_on");
    }

    #[test]
    fn test_unregistered_coil_is_idle() {
        let tag = ComponentTag::relay(3).unwrap();
        let coil = Cell::coil(tag, TimerKind::OffDelay, 4);
        assert_eq!(Visual::of(&coil, None).sprite(), "coil_offtimer");
    }
}
