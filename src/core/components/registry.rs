use crate::core::components::cell::{LightColor, TimerKind};
use crate::core::types::{ComponentTag, Position, TagFamily};
use std::time::{Duration, Instant};

/// Number of relay and light slots (ids 1..=9)
pub const SLOT_COUNT: usize = TagFamily::MAX_INDEX as usize;

/// Runtime record of a relay coil, one per id K1..K9
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRuntime {
    tag: ComponentTag,
    pub(crate) on_board: bool,
    pub(crate) position: Position,
    pub(crate) timer: TimerKind,
    pub(crate) delay_secs: u32,
    pub(crate) timing: bool,
    pub(crate) reset_ready: bool,
    pub(crate) countdown_done: bool,
    pub(crate) started_at: Option<Instant>,
}

impl RelayRuntime {
    fn vacant(tag: ComponentTag) -> Self {
        Self {
            tag,
            on_board: false,
            position: Position::new(0, 0),
            timer: TimerKind::Normal,
            delay_secs: 0,
            timing: false,
            reset_ready: true,
            countdown_done: false,
            started_at: None,
        }
    }

    pub fn tag(&self) -> ComponentTag {
        self.tag
    }

    pub fn is_on_board(&self) -> bool {
        self.on_board
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn timer(&self) -> TimerKind {
        self.timer
    }

    pub fn delay_secs(&self) -> u32 {
        self.delay_secs
    }

    pub fn is_timing(&self) -> bool {
        self.timing
    }

    pub fn is_reset_ready(&self) -> bool {
        self.reset_ready
    }

    pub fn is_countdown_done(&self) -> bool {
        self.countdown_done
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.delay_secs))
    }

    /// Time since timing began, zero when not timing
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    pub(crate) fn begin_timing(&mut self, now: Instant) {
        self.timing = true;
        self.reset_ready = false;
        self.started_at = Some(now);
    }

    /// Drop any countdown and make the relay ready to start again
    pub(crate) fn reset_timer(&mut self) {
        self.timing = false;
        self.countdown_done = false;
        self.reset_ready = true;
        self.started_at = None;
    }
}

/// Runtime record of an indicator light, one per id H1..H9
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightRuntime {
    tag: ComponentTag,
    pub(crate) on_board: bool,
    pub(crate) position: Position,
    pub(crate) color: LightColor,
}

impl LightRuntime {
    fn vacant(tag: ComponentTag) -> Self {
        Self {
            tag,
            on_board: false,
            position: Position::new(0, 0),
            color: LightColor::Green,
        }
    }

    pub fn tag(&self) -> ComponentTag {
        self.tag
    }

    pub fn is_on_board(&self) -> bool {
        self.on_board
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn color(&self) -> LightColor {
        self.color
    }
}

/// Fixed-capacity registry of relay and light runtimes, indexed by id number
#[derive(Debug, Clone)]
pub struct RuntimeRegistry {
    relays: [RelayRuntime; SLOT_COUNT],
    lights: [LightRuntime; SLOT_COUNT],
}

fn slot(tag: ComponentTag) -> usize {
    usize::from(tag.index()) - 1
}

impl RuntimeRegistry {
    pub fn new() -> Self {
        Self {
            relays: std::array::from_fn(|i| {
                RelayRuntime::vacant(ComponentTag::from_slot(TagFamily::Relay, i))
            }),
            lights: std::array::from_fn(|i| {
                LightRuntime::vacant(ComponentTag::from_slot(TagFamily::Lamp, i))
            }),
        }
    }

    /// Runtime for a relay id, on board or not
    pub fn relay_slot(&self, tag: ComponentTag) -> Option<&RelayRuntime> {
        (tag.family() == TagFamily::Relay).then(|| &self.relays[slot(tag)])
    }

    /// Runtime for a relay id that currently has a coil on the board
    pub fn relay(&self, tag: ComponentTag) -> Option<&RelayRuntime> {
        self.relay_slot(tag).filter(|relay| relay.on_board)
    }

    pub(crate) fn relay_mut(&mut self, tag: ComponentTag) -> Option<&mut RelayRuntime> {
        if tag.family() != TagFamily::Relay {
            return None;
        }
        Some(&mut self.relays[slot(tag)]).filter(|relay| relay.on_board)
    }

    pub fn light(&self, tag: ComponentTag) -> Option<&LightRuntime> {
        if tag.family() != TagFamily::Lamp {
            return None;
        }
        Some(&self.lights[slot(tag)]).filter(|light| light.on_board)
    }

    /// Relays with a coil on the board, in id order
    pub fn relays(&self) -> impl Iterator<Item = &RelayRuntime> {
        self.relays.iter().filter(|relay| relay.on_board)
    }

    pub(crate) fn relays_mut(&mut self) -> impl Iterator<Item = &mut RelayRuntime> {
        self.relays.iter_mut().filter(|relay| relay.on_board)
    }

    /// Lights placed on the board, in id order
    pub fn lights(&self) -> impl Iterator<Item = &LightRuntime> {
        self.lights.iter().filter(|light| light.on_board)
    }

    /// Where the relay or light with this tag currently sits
    pub fn occupant_position(&self, tag: ComponentTag) -> Option<Position> {
        match tag.family() {
            TagFamily::Relay => self.relay(tag).map(RelayRuntime::position),
            TagFamily::Lamp => self.light(tag).map(LightRuntime::position),
            TagFamily::Switch => None,
        }
    }

    pub(crate) fn occupy_relay(&mut self, tag: ComponentTag, position: Position, timer: TimerKind, delay_secs: u32) {
        if tag.family() != TagFamily::Relay {
            return;
        }
        let relay = &mut self.relays[slot(tag)];
        relay.on_board = true;
        relay.position = position;
        relay.timer = timer;
        relay.delay_secs = delay_secs;
        relay.reset_timer();
    }

    pub(crate) fn occupy_light(&mut self, tag: ComponentTag, position: Position, color: LightColor) {
        if tag.family() != TagFamily::Lamp {
            return;
        }
        let light = &mut self.lights[slot(tag)];
        light.on_board = true;
        light.position = position;
        light.color = color;
    }

    /// Take a relay or light off the board, cancelling any countdown
    pub(crate) fn release(&mut self, tag: ComponentTag) {
        match tag.family() {
            TagFamily::Relay => {
                let relay = &mut self.relays[slot(tag)];
                relay.on_board = false;
                relay.reset_timer();
            }
            TagFamily::Lamp => self.lights[slot(tag)].on_board = false,
            TagFamily::Switch => {}
        }
    }

    /// Lowest relay index without a coil on the board
    pub fn free_relay_slot(&self) -> Option<u8> {
        self.relays
            .iter()
            .find(|relay| !relay.on_board)
            .map(|relay| relay.tag.index())
    }

    /// Lowest light index without a light on the board
    pub fn free_light_slot(&self) -> Option<u8> {
        self.lights
            .iter()
            .find(|light| !light.on_board)
            .map(|light| light.tag.index())
    }

    pub fn any_timing(&self) -> bool {
        self.relays().any(RelayRuntime::is_timing)
    }

    /// Reset every relay's countdown state without touching placement
    pub(crate) fn reset_timers(&mut self) {
        for relay in self.relays.iter_mut() {
            relay.reset_timer();
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for RuntimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
