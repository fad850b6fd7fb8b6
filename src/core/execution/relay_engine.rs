use crate::core::board::Board;
use crate::core::components::TimerKind;
use crate::core::interaction::InteractionLayer;
use crate::core::types::{ComponentTag, Position};
use log::debug;
use std::time::Instant;

/// Timer changes from one fast-tick relay evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayEvaluation {
    /// Relays that began timing on this tick
    pub started: Vec<ComponentTag>,
    /// Relays whose countdown was cancelled by loss of power
    pub cancelled: Vec<(ComponentTag, Position)>,
}

/// Countdown progress from one slow tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownUpdate {
    Remaining {
        tag: ComponentTag,
        position: Position,
        secs: u64,
    },
    Completed {
        tag: ComponentTag,
        position: Position,
    },
}

/// Per-relay state machine for normal, on-delay and off-delay coils
pub struct RelayTimerEngine;

impl RelayTimerEngine {
    /// Evaluate every on-board relay against the reached flags of the last trace
    /// and switch its contacts accordingly.
    pub fn evaluate(board: &mut Board, now: Instant) -> RelayEvaluation {
        let relays: Vec<(ComponentTag, Position, TimerKind)> = board
            .registry()
            .relays()
            .map(|relay| (relay.tag(), relay.position(), relay.timer()))
            .collect();

        let mut evaluation = RelayEvaluation::default();
        for (tag, position, timer) in relays {
            let powered = board
                .cell(position)
                .map(|cell| cell.is_powered())
                .unwrap_or(false);

            match timer {
                TimerKind::Normal => {
                    if powered {
                        InteractionLayer::set_contacts(board, tag);
                    } else {
                        InteractionLayer::reset_contacts(board, tag);
                    }
                }
                TimerKind::OnDelay => {
                    if powered {
                        Self::evaluate_on_delay(board, tag, now, &mut evaluation);
                    } else {
                        Self::power_lost(board, tag, position, &mut evaluation);
                    }
                }
                TimerKind::OffDelay => {
                    if powered {
                        Self::evaluate_off_delay(board, tag, now, &mut evaluation);
                    } else {
                        Self::power_lost(board, tag, position, &mut evaluation);
                    }
                }
            }
        }
        evaluation
    }

    fn evaluate_on_delay(board: &mut Board, tag: ComponentTag, now: Instant, evaluation: &mut RelayEvaluation) {
        let Some(relay) = board.registry_mut().relay_mut(tag) else { return };
        if !relay.timing && relay.reset_ready {
            relay.begin_timing(now);
            evaluation.started.push(tag);
            debug!("{} on-delay started ({}s)", tag, relay.delay_secs);
            InteractionLayer::reset_contacts(board, tag);
        } else if relay.countdown_done {
            relay.timing = false;
            InteractionLayer::set_contacts(board, tag);
        }
    }

    fn evaluate_off_delay(board: &mut Board, tag: ComponentTag, now: Instant, evaluation: &mut RelayEvaluation) {
        let Some(relay) = board.registry_mut().relay_mut(tag) else { return };
        if !relay.timing && relay.reset_ready {
            relay.begin_timing(now);
            evaluation.started.push(tag);
            debug!("{} off-delay started ({}s)", tag, relay.delay_secs);
            InteractionLayer::set_contacts(board, tag);
        } else if relay.countdown_done {
            relay.timing = false;
            InteractionLayer::reset_contacts(board, tag);
        }
    }

    /// Coil not fully powered: contacts drop out and any countdown is abandoned
    fn power_lost(board: &mut Board, tag: ComponentTag, position: Position, evaluation: &mut RelayEvaluation) {
        InteractionLayer::reset_contacts(board, tag);
        let Some(relay) = board.registry_mut().relay_mut(tag) else { return };
        if relay.timing {
            debug!("{} countdown cancelled", tag);
            evaluation.cancelled.push((tag, position));
        }
        relay.reset_timer();
    }

    /// Advance the countdown of every timing relay.
    ///
    /// Returns the updates to show and whether any relay is still timing.
    pub fn advance_timers(board: &mut Board, now: Instant) -> (Vec<CountdownUpdate>, bool) {
        let mut updates = Vec::new();
        for relay in board.registry_mut().relays_mut() {
            if !relay.timing {
                continue;
            }
            let elapsed = relay.elapsed(now);
            if elapsed >= relay.delay() {
                relay.timing = false;
                relay.countdown_done = true;
                debug!("{} countdown complete", relay.tag());
                updates.push(CountdownUpdate::Completed {
                    tag: relay.tag(),
                    position: relay.position,
                });
            } else {
                updates.push(CountdownUpdate::Remaining {
                    tag: relay.tag(),
                    position: relay.position,
                    secs: u64::from(relay.delay_secs).saturating_sub(elapsed.as_secs()),
                });
            }
        }
        let still_timing = board.registry().any_timing();
        (updates, still_timing)
    }
}
