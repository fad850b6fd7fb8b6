use crate::core::board::Board;
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{Direction, Position, Rail};

/// Wiring checks between neighbouring cells
pub struct EdgeValidator;

impl EdgeValidator {
    /// Neighbour of `pos` in `dir` if the edge between them conducts.
    ///
    /// An edge conducts only when this cell declares `dir` and the neighbour
    /// declares the opposite direction.
    pub fn conducts(board: &Board, pos: Position, dir: Direction) -> Option<Position> {
        let here = board.cell(pos)?;
        if !here.edges().has(dir) {
            return None;
        }
        let next = pos.step(dir, board.dimension())?;
        let there = board.cell(next)?;
        there.edges().has(dir.opposite()).then_some(next)
    }

    /// Both supply cells must be wired to the rail on their left edge before a run
    pub fn validate_supply(board: &Board) -> SimResult<()> {
        for (rail, pos) in [
            (Rail::Positive, board.positive_source()),
            (Rail::Negative, board.negative_source()),
        ] {
            let grounded = board
                .cell(pos)
                .map(|cell| cell.edges().left)
                .unwrap_or(false);
            if !grounded {
                return Err(SimError::UngroundedSupply { rail, pos });
            }
        }
        Ok(())
    }
}
