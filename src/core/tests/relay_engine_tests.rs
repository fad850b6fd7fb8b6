use super::{k1, ladder_board, BUTTON, CONTACT, LAMP, SPARE_NC};
use crate::core::board::Board;
use crate::core::components::{Cell, TimerKind};
use crate::core::connections::ConnectivityTracer;
use crate::core::execution::{Clock, CountdownUpdate, ManualClock, RelayEvaluation, RelayTimerEngine};
use crate::core::interaction::InteractionLayer;
use std::time::Duration;

struct Rig {
    board: Board,
    tracer: ConnectivityTracer,
    clock: ManualClock,
}

impl Rig {
    fn new(timer: TimerKind, delay_secs: u32) -> Self {
        Self {
            board: ladder_board(Cell::coil(k1(), timer, delay_secs)),
            tracer: ConnectivityTracer::new(),
            clock: ManualClock::new(),
        }
    }

    /// One fast tick
    fn step(&mut self) -> RelayEvaluation {
        self.tracer.trace(&mut self.board);
        RelayTimerEngine::evaluate(&mut self.board, self.clock.now())
    }

    /// One slow tick
    fn countdown(&mut self) -> (Vec<CountdownUpdate>, bool) {
        RelayTimerEngine::advance_timers(&mut self.board, self.clock.now())
    }

    fn advance_to(&mut self, millis: u64) {
        let target = Duration::from_millis(millis);
        self.clock.advance(target.saturating_sub(self.clock.elapsed()));
    }

    fn press(&mut self) {
        InteractionLayer::press_button(&mut self.board, BUTTON);
    }

    fn release(&mut self) {
        InteractionLayer::release_button(&mut self.board, BUTTON);
    }

    fn contact_closed(&self) -> bool {
        self.board.cell(CONTACT).unwrap().is_conductive()
    }

    fn spare_nc_closed(&self) -> bool {
        self.board.cell(SPARE_NC).unwrap().is_conductive()
    }

    fn lamp_on(&self) -> bool {
        self.board.cell(LAMP).unwrap().is_powered()
    }
}

#[test]
fn test_normal_relay_follows_power() {
    let mut rig = Rig::new(TimerKind::Normal, 0);
    rig.step();
    assert!(!rig.contact_closed());
    assert!(rig.spare_nc_closed());

    rig.press();
    let evaluation = rig.step();
    assert!(evaluation.started.is_empty());
    assert!(rig.contact_closed());
    assert!(!rig.spare_nc_closed());
    assert!(!rig.lamp_on());

    // Contact closed on the previous tick, the lamp sees it on this one
    rig.step();
    assert!(rig.lamp_on());

    rig.release();
    rig.step();
    assert!(!rig.contact_closed());
    assert!(rig.spare_nc_closed());
}

#[test]
fn test_on_delay_energizes_after_delay() {
    let mut rig = Rig::new(TimerKind::OnDelay, 2);
    rig.press();
    let evaluation = rig.step();
    assert_eq!(evaluation.started, vec![k1()]);
    assert!(!rig.contact_closed());

    rig.advance_to(1000);
    let (updates, timing) = rig.countdown();
    assert!(timing);
    assert!(matches!(updates[..], [CountdownUpdate::Remaining { secs: 1, .. }]));
    rig.step();
    assert!(!rig.contact_closed());

    rig.advance_to(1900);
    rig.countdown();
    rig.step();
    assert!(!rig.contact_closed());

    rig.advance_to(2000);
    let (updates, timing) = rig.countdown();
    assert!(!timing);
    assert!(matches!(updates[..], [CountdownUpdate::Completed { .. }]));
    rig.step();
    assert!(rig.contact_closed());
    assert!(!rig.spare_nc_closed());

    // Stays energized while powered, without restarting the timer
    rig.advance_to(5000);
    let evaluation = rig.step();
    assert!(evaluation.started.is_empty());
    assert!(rig.contact_closed());
}

#[test]
fn test_on_delay_power_loss_restarts_cycle() {
    let mut rig = Rig::new(TimerKind::OnDelay, 2);
    rig.press();
    rig.step();

    rig.advance_to(1000);
    rig.countdown();
    rig.release();
    let evaluation = rig.step();
    assert_eq!(evaluation.cancelled.len(), 1);
    assert!(!rig.contact_closed());
    let relay = rig.board.registry().relay(k1()).unwrap();
    assert!(relay.is_reset_ready());
    assert!(!relay.is_timing());

    rig.advance_to(1500);
    rig.press();
    let evaluation = rig.step();
    assert_eq!(evaluation.started, vec![k1()]);

    // 2.5s since the first press, only 1s since the second
    rig.advance_to(2500);
    let (updates, _) = rig.countdown();
    assert!(matches!(updates[..], [CountdownUpdate::Remaining { secs: 1, .. }]));
    rig.step();
    assert!(!rig.contact_closed());

    rig.advance_to(3500);
    rig.countdown();
    rig.step();
    assert!(rig.contact_closed());
}

#[test]
fn test_off_delay_releases_after_delay_under_power() {
    let mut rig = Rig::new(TimerKind::OffDelay, 2);
    rig.press();
    let evaluation = rig.step();
    assert_eq!(evaluation.started, vec![k1()]);
    assert!(rig.contact_closed());

    rig.advance_to(1000);
    rig.countdown();
    rig.step();
    assert!(rig.contact_closed());

    rig.advance_to(2000);
    let (updates, timing) = rig.countdown();
    assert!(!timing);
    assert!(matches!(updates[..], [CountdownUpdate::Completed { .. }]));
    rig.step();
    assert!(!rig.contact_closed());
    assert!(rig.spare_nc_closed());

    // Still powered: contacts stay released and the timer does not restart
    rig.advance_to(4000);
    let evaluation = rig.step();
    assert!(evaluation.started.is_empty());
    assert!(!rig.contact_closed());
    assert!(rig.board.cell(super::COIL).unwrap().is_powered());
}

#[test]
fn test_off_delay_power_loss_releases_immediately() {
    let mut rig = Rig::new(TimerKind::OffDelay, 2);
    rig.press();
    rig.step();
    assert!(rig.contact_closed());

    rig.advance_to(1000);
    rig.release();
    let evaluation = rig.step();
    assert_eq!(evaluation.cancelled.len(), 1);
    assert!(!rig.contact_closed());
    assert!(!rig.board.registry().any_timing());

    // Re-powering starts a fresh cycle
    rig.press();
    let evaluation = rig.step();
    assert_eq!(evaluation.started, vec![k1()]);
    assert!(rig.contact_closed());
}

#[test]
fn test_advance_without_timing_relays() {
    let mut rig = Rig::new(TimerKind::OnDelay, 2);
    rig.step();
    let (updates, timing) = rig.countdown();
    assert!(updates.is_empty());
    assert!(!timing);
}
