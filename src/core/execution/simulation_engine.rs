use crate::core::board::Board;
use crate::core::components::{Cell, Visual};
use crate::core::connections::{ConnectivityTracer, EdgeValidator};
use crate::core::errors::{SimError, SimResult};
use crate::core::events::{SimEvent, SimulationObserver};
use crate::core::execution::clock::{Clock, SystemClock};
use crate::core::execution::config::SimulationConfig;
use crate::core::execution::relay_engine::{CountdownUpdate, RelayTimerEngine};
use crate::core::execution::{Mode, TickOutcome};
use crate::core::interaction::{InteractionLayer, LightState};
use crate::core::persistence::BoardCodec;
use crate::core::types::{BoardSize, ComponentTag, Position};
use log::{debug, info, warn};
use std::path::Path;

/// Owns the board and drives it through edit and run mode.
///
/// Placement and removal are only accepted in [`Mode::Edit`]; button presses and
/// ticks only take effect in [`Mode::Run`]. Every state change a renderer cares
/// about is reported to the registered observers as a [`SimEvent`].
pub struct SimulationEngine {
    board: Board,
    mode: Mode,
    config: SimulationConfig,
    clock: Box<dyn Clock>,
    tracer: ConnectivityTracer,
    timer_running: bool,
    observers: Vec<Box<dyn SimulationObserver>>,
    /// Last visual reported per cell, `None` when it must be sent again
    visuals: Vec<Option<Visual>>,
    tick_count: u64,
}

impl SimulationEngine {
    /// Create an engine with an empty board of the configured size
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: SimulationConfig, clock: impl Clock + 'static) -> Self {
        let board = Board::new(config.default_board_size);
        let mut engine = Self {
            board,
            mode: Mode::Edit,
            config,
            clock: Box::new(clock),
            tracer: ConnectivityTracer::new(),
            timer_running: false,
            observers: Vec::new(),
            visuals: Vec::new(),
            tick_count: 0,
        };
        engine.visuals = engine.current_visuals();
        engine
    }

    /// Replace the connectivity tracer, e.g. with a different direction order
    pub fn with_tracer(mut self, tracer: ConnectivityTracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.board.cell(pos)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Whether the slow countdown tick is active
    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    /// Number of fast ticks applied since the engine was created
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn comment(&self) -> &str {
        self.board.comment()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.board.set_comment(comment);
    }

    pub fn timer_info(&self, pos: Position) -> Option<(ComponentTag, u32)> {
        self.board.timer_info(pos)
    }

    pub fn free_relay_slot(&self) -> Option<u8> {
        self.board.free_relay_slot()
    }

    pub fn free_light_slot(&self) -> Option<u8> {
        self.board.free_light_slot()
    }

    pub fn light_states(&self) -> Vec<LightState> {
        InteractionLayer::light_states(&self.board)
    }

    fn require(&self, required: Mode) -> SimResult<()> {
        if self.mode == required {
            Ok(())
        } else {
            Err(SimError::WrongMode { required })
        }
    }

    pub fn place_component(&mut self, cell: Cell, pos: Position) -> SimResult<()> {
        self.require(Mode::Edit)?;
        if let Err(err) = self.board.place(cell, pos) {
            warn!("Placement at {} refused: {}", pos, err);
            return Err(err);
        }
        self.emit_visual_changes();
        Ok(())
    }

    /// Place and clear any coil or light that already holds the same id
    pub fn place_component_replacing(&mut self, cell: Cell, pos: Position) -> SimResult<()> {
        self.require(Mode::Edit)?;
        self.board.place_replacing(cell, pos)?;
        self.emit_visual_changes();
        Ok(())
    }

    pub fn remove_component(&mut self, pos: Position) -> SimResult<Cell> {
        self.require(Mode::Edit)?;
        let removed = self.board.remove(pos)?;
        self.emit_visual_changes();
        Ok(removed)
    }

    /// Change the board size. Shrinking clears the board; confirm with the user first.
    pub fn resize(&mut self, size: BoardSize) -> SimResult<()> {
        self.require(Mode::Edit)?;
        if size == self.board.size() {
            return Ok(());
        }
        self.board.resize(size);
        self.invalidate_visuals();
        self.emit_visual_changes();
        Ok(())
    }

    pub fn clear(&mut self) -> SimResult<()> {
        self.require(Mode::Edit)?;
        self.board.clear();
        self.emit_visual_changes();
        info!("Board cleared");
        Ok(())
    }

    /// Switch between edit and run mode.
    ///
    /// Entering run mode requires both supply cells to be wired to their rail.
    /// Leaving it stops the timers and puts every button and contact back at rest.
    pub fn set_mode(&mut self, mode: Mode) -> SimResult<()> {
        if mode == self.mode {
            return Ok(());
        }
        match mode {
            Mode::Run => {
                if let Err(err) = EdgeValidator::validate_supply(&self.board) {
                    warn!("Run refused: {}", err);
                    return Err(err);
                }
                let width = self.board.refresh_active_width();
                self.board.registry_mut().reset_timers();
                self.timer_running = false;
                info!("Entering run mode, active width {}", width);
            }
            Mode::Edit => {
                self.stop_run();
                info!("Entering edit mode");
            }
        }
        self.mode = mode;
        self.notify(&[SimEvent::ModeChanged { mode }]);
        self.emit_visual_changes();
        Ok(())
    }

    fn stop_run(&mut self) {
        let cleared: Vec<SimEvent> = self
            .board
            .registry()
            .relays()
            .filter(|relay| relay.is_timing())
            .map(|relay| SimEvent::CountdownCleared {
                tag: relay.tag(),
                position: relay.position(),
            })
            .collect();
        self.timer_running = false;
        for (_, cell) in self.board.iter_mut() {
            cell.rest();
            cell.clear_transient();
        }
        self.board.registry_mut().reset_timers();
        self.notify(&cleared);
    }

    /// Press the button at `pos` together with every button sharing its id.
    /// Returns how many buttons moved.
    pub fn press_button(&mut self, pos: Position) -> SimResult<usize> {
        self.require(Mode::Run)?;
        let moved = InteractionLayer::press_button(&mut self.board, pos);
        debug!("Pressed button at {}: {} cells", pos, moved);
        Ok(moved)
    }

    pub fn release_button(&mut self, pos: Position) -> SimResult<usize> {
        self.require(Mode::Run)?;
        let moved = InteractionLayer::release_button(&mut self.board, pos);
        debug!("Released button at {}: {} cells", pos, moved);
        Ok(moved)
    }

    /// Fast tick: trace both rails, evaluate relays, report visual changes
    pub fn tick(&mut self) -> TickOutcome {
        if self.mode != Mode::Run {
            return TickOutcome::Skipped;
        }
        let now = self.clock.now();

        self.tracer.trace(&mut self.board);
        let evaluation = RelayTimerEngine::evaluate(&mut self.board, now);

        if !evaluation.started.is_empty() && !self.timer_running {
            self.timer_running = true;
            debug!("Countdown timer started for {:?}", evaluation.started);
        }
        let cleared: Vec<SimEvent> = evaluation
            .cancelled
            .into_iter()
            .map(|(tag, position)| SimEvent::CountdownCleared { tag, position })
            .collect();
        self.notify(&cleared);
        if self.timer_running && !self.board.registry().any_timing() {
            self.timer_running = false;
            debug!("Countdown timer stopped");
        }

        self.emit_visual_changes();
        self.tick_count += 1;
        for observer in &mut self.observers {
            observer.on_tick_complete(self.tick_count);
        }
        TickOutcome::Applied
    }

    /// Slow tick: advance relay countdowns. Stops itself once no relay is timing.
    pub fn timer_tick(&mut self) -> TickOutcome {
        if self.mode != Mode::Run || !self.timer_running {
            return TickOutcome::Skipped;
        }
        let now = self.clock.now();
        let (updates, still_timing) = RelayTimerEngine::advance_timers(&mut self.board, now);

        let events: Vec<SimEvent> = updates
            .into_iter()
            .map(|update| match update {
                CountdownUpdate::Remaining { tag, position, secs } => SimEvent::Countdown {
                    tag,
                    position,
                    remaining_secs: secs,
                },
                CountdownUpdate::Completed { tag, position } => {
                    SimEvent::CountdownCleared { tag, position }
                }
            })
            .collect();
        self.notify(&events);

        if !still_timing {
            self.timer_running = false;
            debug!("Countdown timer stopped");
        }
        self.emit_visual_changes();
        TickOutcome::Applied
    }

    /// Replace the board with the contents of a file.
    ///
    /// A corrupt file leaves an empty board of the configured default size
    /// behind; an unreadable file leaves the current board untouched.
    pub fn load_board(&mut self, path: impl AsRef<Path>) -> SimResult<BoardSize> {
        self.require(Mode::Edit)?;
        let path = path.as_ref();
        match BoardCodec::load(path) {
            Ok(board) => {
                let size = board.size();
                self.board = board;
                info!("Loaded {}x{} board from {}", size, size, path.display());
                self.invalidate_visuals();
                self.emit_visual_changes();
                Ok(size)
            }
            Err(err @ SimError::CorruptFile { .. }) => {
                warn!("Failed to load {}: {}", path.display(), err);
                self.board = Board::new(self.config.default_board_size);
                self.invalidate_visuals();
                self.emit_visual_changes();
                Err(err)
            }
            Err(err) => {
                warn!("Failed to load {}: {}", path.display(), err);
                Err(err)
            }
        }
    }

    pub fn save_board(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        match BoardCodec::save(&self.board, path) {
            Ok(()) => {
                info!("Saved board to {}", path.display());
                Ok(())
            }
            Err(err) => {
                warn!("Failed to save {}: {}", path.display(), err);
                Err(err)
            }
        }
    }

    fn current_visuals(&self) -> Vec<Option<Visual>> {
        self.board
            .iter()
            .map(|(pos, _)| self.board.visual_at(pos))
            .collect()
    }

    fn invalidate_visuals(&mut self) {
        self.visuals = vec![None; self.board.dimension() * self.board.dimension()];
    }

    /// Report every cell whose visual differs from the last one reported
    fn emit_visual_changes(&mut self) {
        let current = self.current_visuals();
        if self.visuals.len() != current.len() {
            self.invalidate_visuals();
        }
        let events: Vec<SimEvent> = self
            .board
            .iter()
            .zip(current.iter().zip(self.visuals.iter()))
            .filter_map(|((pos, _), (now, before))| match (now, before) {
                (Some(visual), before) if before.as_ref() != Some(visual) => {
                    Some(SimEvent::CellVisual { pos, visual: *visual })
                }
                _ => None,
            })
            .collect();
        self.visuals = current;
        self.notify(&events);
    }

    fn notify(&mut self, events: &[SimEvent]) {
        for event in events {
            for observer in &mut self.observers {
                observer.on_event(event);
            }
        }
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
