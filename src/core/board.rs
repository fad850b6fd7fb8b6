use crate::core::components::{Cell, Component, RuntimeRegistry, Visual};
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{BoardSize, ComponentTag, Position};
use log::{debug, info};

/// The circuit board: a square grid of cells plus the relay and light registries.
///
/// Every position always holds exactly one [`Cell`]; removing a component puts an
/// empty cell back. A relay or light slot is on board exactly when a coil or
/// light with that id sits somewhere on the grid.
#[derive(Debug, Clone)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
    registry: RuntimeRegistry,
    comment: String,
    /// Columns `0..active_width` take part in a run
    active_width: usize,
}

impl Board {
    pub fn new(size: BoardSize) -> Self {
        let n = size.cells();
        Self {
            size,
            cells: vec![Cell::empty(); n * n],
            registry: RuntimeRegistry::new(),
            comment: String::new(),
            active_width: n,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Cells per side
    pub fn dimension(&self) -> usize {
        self.size.cells()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.dimension() && pos.y < self.dimension()
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.dimension() + pos.x
    }

    fn check_family(cell: &Cell) -> SimResult<()> {
        match (cell.component().tag(), cell.component().tag_family()) {
            (Some(tag), Some(expected)) if tag.family() != expected => {
                Err(SimError::WrongTagFamily { tag, expected })
            }
            _ => Ok(()),
        }
    }

    fn check_bounds(&self, pos: Position) -> SimResult<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(SimError::InvalidPlacement {
                pos,
                size: self.dimension(),
            })
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.contains(pos).then(|| &self.cells[self.index(pos)])
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if !self.contains(pos) {
            return None;
        }
        let index = self.index(pos);
        Some(&mut self.cells[index])
    }

    /// All cells with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        let n = self.dimension();
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Position::new(i % n, i / n), cell))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (Position, &mut Cell)> {
        let n = self.dimension();
        self.cells
            .iter_mut()
            .enumerate()
            .map(move |(i, cell)| (Position::new(i % n, i / n), cell))
    }

    pub fn registry(&self) -> &RuntimeRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut RuntimeRegistry {
        &mut self.registry
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Source cell of the positive (L) rail
    pub fn positive_source(&self) -> Position {
        Position::new(0, 0)
    }

    /// Source cell of the negative (N) rail
    pub fn negative_source(&self) -> Position {
        Position::new(0, self.size.negative_row())
    }

    /// Place `cell` at `pos`, replacing whatever was there.
    ///
    /// A coil or light whose id is already on the board elsewhere is refused with
    /// [`SimError::IdConflict`]; use [`Board::place_replacing`] to move it instead.
    pub fn place(&mut self, cell: Cell, pos: Position) -> SimResult<()> {
        self.check_bounds(pos)?;
        Self::check_family(&cell)?;
        if let Some((tag, existing)) = self.conflict(&cell, pos) {
            return Err(SimError::IdConflict { tag, existing });
        }
        self.put(cell, pos);
        Ok(())
    }

    /// Place `cell` at `pos`; a coil or light with the same id elsewhere on the
    /// board is cleared to empty first and its runtime moves to `pos`.
    pub fn place_replacing(&mut self, cell: Cell, pos: Position) -> SimResult<()> {
        self.check_bounds(pos)?;
        Self::check_family(&cell)?;
        if let Some((_, existing)) = self.conflict(&cell, pos) {
            info!("Replacing {:?} at {} with new placement at {}", cell.tag(), existing, pos);
            self.put(Cell::empty(), existing);
        }
        self.put(cell, pos);
        Ok(())
    }

    /// Remove the component at `pos`, leaving an empty cell. Returns the old cell.
    pub fn remove(&mut self, pos: Position) -> SimResult<Cell> {
        self.check_bounds(pos)?;
        let index = self.index(pos);
        self.vacate(pos);
        Ok(std::mem::take(&mut self.cells[index]))
    }

    /// Change the board size.
    ///
    /// Growing keeps every cell and fills the new area with empty cells. Shrinking
    /// is destructive: the whole board is cleared. Callers confirm with the user first.
    pub fn resize(&mut self, new_size: BoardSize) {
        if new_size == self.size {
            return;
        }
        let old_n = self.dimension();
        let new_n = new_size.cells();
        if new_n > old_n {
            let mut cells = vec![Cell::empty(); new_n * new_n];
            for (pos, cell) in self.iter() {
                cells[pos.y * new_n + pos.x] = cell.clone();
            }
            self.cells = cells;
            self.size = new_size;
        } else {
            self.size = new_size;
            self.cells = vec![Cell::empty(); new_n * new_n];
            self.registry.clear();
        }
        self.active_width = new_n;
        info!("Board resized from {}x{} to {}x{}", old_n, old_n, new_n, new_n);
    }

    /// Reset every cell to empty and take all relays and lights off the board
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = Cell::empty());
        self.registry.clear();
        self.active_width = self.dimension();
        debug!("Board cleared");
    }

    /// Lowest relay id (1..=9) not yet used by a coil
    pub fn free_relay_slot(&self) -> Option<u8> {
        self.registry.free_relay_slot()
    }

    /// Lowest light id (1..=9) not yet used
    pub fn free_light_slot(&self) -> Option<u8> {
        self.registry.free_light_slot()
    }

    /// Id and delay of a timer coil at `pos`, for hover info
    pub fn timer_info(&self, pos: Position) -> Option<(ComponentTag, u32)> {
        match *self.cell(pos)?.component() {
            Component::Coil { tag, timer, delay_secs } if timer.is_timed() => Some((tag, delay_secs)),
            _ => None,
        }
    }

    /// Visual state of the cell at `pos`
    pub fn visual_at(&self, pos: Position) -> Option<Visual> {
        let cell = self.cell(pos)?;
        let relay = cell.tag().and_then(|tag| self.registry.relay(tag));
        Some(Visual::of(cell, relay))
    }

    pub fn active_width(&self) -> usize {
        self.active_width
    }

    /// Recompute the run area: everything left of and including the first
    /// column that holds only empty cells.
    pub(crate) fn refresh_active_width(&mut self) -> usize {
        let n = self.dimension();
        self.active_width = (0..n)
            .find(|&x| (0..n).all(|y| self.cells[y * n + x].is_empty()))
            .map_or(n, |x| x + 1);
        self.active_width
    }

    /// Clear reached and highlight flags inside the run area
    pub(crate) fn clear_transient(&mut self) {
        let width = self.active_width;
        for (pos, cell) in self.iter_mut() {
            if pos.x < width {
                cell.clear_transient();
            }
        }
    }

    /// Check that the registries agree with the coils and lights on the grid
    pub fn validate_consistency(&self) -> Result<(), String> {
        for (pos, cell) in self.iter() {
            let Some(tag) = cell.tag() else { continue };
            let registered = match cell.component() {
                Component::Coil { .. } | Component::Light { .. } => {
                    self.registry.occupant_position(tag)
                }
                _ => continue,
            };
            if registered != Some(pos) {
                return Err(format!(
                    "{} at {} is registered at {:?}",
                    tag, pos, registered
                ));
            }
        }
        for relay in self.registry.relays() {
            match self.cell(relay.position()).map(|cell| *cell.component()) {
                Some(Component::Coil { tag, .. }) if tag == relay.tag() => {}
                _ => return Err(format!("relay {} has no coil at {}", relay.tag(), relay.position())),
            }
        }
        for light in self.registry.lights() {
            match self.cell(light.position()).map(|cell| *cell.component()) {
                Some(Component::Light { tag, .. }) if tag == light.tag() => {}
                _ => return Err(format!("light {} has no lamp at {}", light.tag(), light.position())),
            }
        }
        Ok(())
    }

    /// Id and position of a coil or light elsewhere on the board sharing `cell`'s id
    fn conflict(&self, cell: &Cell, pos: Position) -> Option<(ComponentTag, Position)> {
        match *cell.component() {
            Component::Coil { tag, .. } | Component::Light { tag, .. } => self
                .registry
                .occupant_position(tag)
                .filter(|existing| *existing != pos)
                .map(|existing| (tag, existing)),
            _ => None,
        }
    }

    /// Release whatever runtime the occupant at `pos` holds
    fn vacate(&mut self, pos: Position) {
        let occupant = *self.cells[self.index(pos)].component();
        if let Component::Coil { tag, .. } | Component::Light { tag, .. } = occupant {
            if self.registry.occupant_position(tag) == Some(pos) {
                self.registry.release(tag);
            }
        }
    }

    fn put(&mut self, cell: Cell, pos: Position) {
        self.vacate(pos);
        match *cell.component() {
            Component::Coil { tag, timer, delay_secs } => {
                self.registry.occupy_relay(tag, pos, timer, delay_secs)
            }
            Component::Light { tag, color } => self.registry.occupy_light(tag, pos, color),
            _ => {}
        }
        let index = self.index(pos);
        self.cells[index] = cell;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardSize::default())
    }
}
