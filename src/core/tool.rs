use crate::core::board::Board;
use crate::core::components::{Cell, ContactType, LightColor, TimerKind};
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{ComponentTag, EdgeMask, TagFamily};
use log::warn;

/// What the next click places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Clears the target cell
    Eraser,
    Wire(EdgeMask),
    Button(ContactType),
    Contact(ContactType),
    Coil(TimerKind),
    Light(LightColor),
}

/// Current selection of the edit panel: template plus the id and delay fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementTool {
    template: Template,
    button: ComponentTag,
    relay: ComponentTag,
    light: ComponentTag,
    delay_secs: u32,
}

impl PlacementTool {
    pub const DEFAULT_DELAY_SECS: u32 = 5;

    pub fn new() -> Self {
        Self {
            template: Template::Wire(EdgeMask::HORIZONTAL),
            button: ComponentTag::first(TagFamily::Switch),
            relay: ComponentTag::first(TagFamily::Relay),
            light: ComponentTag::first(TagFamily::Lamp),
            delay_secs: Self::DEFAULT_DELAY_SECS,
        }
    }

    pub fn select(&mut self, template: Template) {
        self.template = template;
    }

    pub fn template(&self) -> Template {
        self.template
    }

    pub fn button_index(&self) -> u8 {
        self.button.index()
    }

    pub fn relay_index(&self) -> u8 {
        self.relay.index()
    }

    pub fn light_index(&self) -> u8 {
        self.light.index()
    }

    pub fn delay_secs(&self) -> u32 {
        self.delay_secs
    }

    /// Set the push button id from panel text. Reverts to 0 on bad input.
    pub fn set_button_index(&mut self, input: &str) -> SimResult<u8> {
        match parse_tag(input, TagFamily::Switch, "button id") {
            Ok(tag) => {
                self.button = tag;
                Ok(tag.index())
            }
            Err(err) => {
                warn!("{}", err);
                self.button = ComponentTag::first(TagFamily::Switch);
                Err(err)
            }
        }
    }

    /// Set the relay id from panel text. Reverts to the first free relay on bad input.
    pub fn set_relay_index(&mut self, input: &str, board: &Board) -> SimResult<u8> {
        match parse_tag(input, TagFamily::Relay, "relay id") {
            Ok(tag) => {
                self.relay = tag;
                Ok(tag.index())
            }
            Err(err) => {
                warn!("{}", err);
                self.relay = board
                    .free_relay_slot()
                    .and_then(ComponentTag::relay)
                    .unwrap_or(ComponentTag::first(TagFamily::Relay));
                Err(err)
            }
        }
    }

    /// Set the light id from panel text. Reverts to 1 on bad input.
    pub fn set_light_index(&mut self, input: &str) -> SimResult<u8> {
        match parse_tag(input, TagFamily::Lamp, "light id") {
            Ok(tag) => {
                self.light = tag;
                Ok(tag.index())
            }
            Err(err) => {
                warn!("{}", err);
                self.light = ComponentTag::first(TagFamily::Lamp);
                Err(err)
            }
        }
    }

    /// Set the timer delay in whole seconds. Reverts to 1 on bad input.
    pub fn set_delay(&mut self, input: &str) -> SimResult<u32> {
        match input.trim().parse::<u32>() {
            Ok(secs) => {
                self.delay_secs = secs;
                Ok(secs)
            }
            Err(err) => {
                let err = SimError::InvalidNumericField {
                    field: "delay",
                    input: input.to_string(),
                    reason: err.to_string(),
                };
                warn!("{}", err);
                self.delay_secs = 1;
                Err(err)
            }
        }
    }

    /// Cell for the current selection
    pub fn build_cell(&self) -> Cell {
        match self.template {
            Template::Eraser => Cell::empty(),
            Template::Wire(edges) => Cell::wire(edges),
            Template::Button(contact) => Cell::button(self.button, contact),
            Template::Contact(contact) => Cell::contact(self.relay, contact),
            Template::Coil(timer) => Cell::coil(self.relay, timer, self.delay_secs),
            Template::Light(color) => Cell::light(self.light, color),
        }
    }
}

impl Default for PlacementTool {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_tag(input: &str, family: TagFamily, field: &'static str) -> SimResult<ComponentTag> {
    let invalid = |reason: String| SimError::InvalidNumericField {
        field,
        input: input.to_string(),
        reason,
    };
    let index: u8 = input.trim().parse().map_err(|_| invalid("not a number".to_string()))?;
    ComponentTag::new(family, index).ok_or_else(|| {
        invalid(format!(
            "must be between {} and {}",
            family.min_index(),
            TagFamily::MAX_INDEX
        ))
    })
}
