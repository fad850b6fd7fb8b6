use crate::core::board::Board;
use crate::core::connections::edge_validator::EdgeValidator;
use crate::core::types::{Direction, Position, Rail};
use log::debug;

/// Set of cells reached by one rail during a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachSet {
    dimension: usize,
    bits: Vec<bool>,
}

impl ReachSet {
    fn new(dimension: usize) -> Self {
        Self {
            dimension,
            bits: vec![false; dimension * dimension],
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.dimension + pos.x
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.dimension && pos.y < self.dimension && self.bits[self.index(pos)]
    }

    /// Returns false if `pos` was already in the set
    fn insert(&mut self, pos: Position) -> bool {
        let index = self.index(pos);
        !std::mem::replace(&mut self.bits[index], true)
    }

    pub fn len(&self) -> usize {
        self.bits.iter().filter(|reached| **reached).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, reached)| **reached)
            .map(|(i, _)| Position::new(i % self.dimension, i / self.dimension))
    }
}

/// Reached sets of both rails from one trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceReport {
    pub positive: ReachSet,
    pub negative: ReachSet,
}

impl TraceReport {
    pub fn rail(&self, rail: Rail) -> &ReachSet {
        match rail {
            Rail::Positive => &self.positive,
            Rail::Negative => &self.negative,
        }
    }
}

/// Flood-fills the two supply rails across the board.
///
/// Traversal is an explicit stack walk: a cell is marked the moment it is
/// entered, non-conductive cells and sinks (coils, lights) are marked but not
/// left, and a neighbour is only entered through an edge both cells declare.
/// Because marking is monotonic the reached set does not depend on the order
/// in which directions are explored.
#[derive(Debug, Clone)]
pub struct ConnectivityTracer {
    order: [Direction; 4],
}

impl ConnectivityTracer {
    pub fn new() -> Self {
        Self {
            order: [Direction::Left, Direction::Down, Direction::Right, Direction::Up],
        }
    }

    /// Explore directions in a different order; the result is the same
    pub fn with_direction_order(order: [Direction; 4]) -> Self {
        Self { order }
    }

    /// Recompute the reached and highlight flags of every cell in the run area
    pub fn trace(&self, board: &mut Board) -> TraceReport {
        board.clear_transient();
        let report = self.compute(board);

        let width = board.active_width();
        for (pos, cell) in board.iter_mut() {
            if pos.x >= width {
                continue;
            }
            let positive = report.positive.contains(pos);
            let negative = report.negative.contains(pos);
            cell.reached.positive = positive;
            cell.reached.negative = negative;
            // L is only drawn through cells that pass current; N is drawn on every reached cell
            cell.live.positive = positive && cell.conductive;
            cell.live.negative = negative;
        }

        debug!(
            "Trace: {} cells on L, {} cells on N",
            report.positive.len(),
            report.negative.len()
        );
        report
    }

    /// Reached sets for the current board without touching any cell
    pub fn compute(&self, board: &Board) -> TraceReport {
        TraceReport {
            positive: self.flood(board, board.positive_source()),
            negative: self.flood(board, board.negative_source()),
        }
    }

    fn flood(&self, board: &Board, source: Position) -> ReachSet {
        let width = board.active_width().min(board.dimension());
        let mut reached = ReachSet::new(board.dimension());
        let mut stack: Vec<(Position, Option<Direction>)> = vec![(source, None)];

        while let Some((pos, entered)) = stack.pop() {
            if !reached.insert(pos) {
                continue;
            }
            let Some(cell) = board.cell(pos) else { continue };
            if !cell.is_conductive() || cell.is_sink() {
                continue;
            }

            for dir in self.order {
                if entered == Some(dir) {
                    continue;
                }
                let Some(next) = EdgeValidator::conducts(board, pos, dir) else { continue };
                if next.x < width && !reached.contains(next) {
                    stack.push((next, Some(dir.opposite())));
                }
            }
        }
        reached
    }
}

impl Default for ConnectivityTracer {
    fn default() -> Self {
        Self::new()
    }
}
