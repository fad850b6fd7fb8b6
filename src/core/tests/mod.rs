mod relay_engine_tests;
mod tracer_tests;

use crate::core::board::Board;
use crate::core::components::{Cell, ContactType, LightColor};
use crate::core::types::{BoardSize, ComponentTag, EdgeMask, Position};

pub(crate) const BUTTON: Position = Position::new(1, 0);
pub(crate) const COIL: Position = Position::new(2, 0);
pub(crate) const CONTACT: Position = Position::new(1, 1);
pub(crate) const LAMP: Position = Position::new(2, 1);
/// NC contact of K1 on a rung of its own, always wired to nothing
pub(crate) const SPARE_NC: Position = Position::new(1, 4);

pub(crate) fn k1() -> ComponentTag {
    ComponentTag::relay(1).unwrap()
}

pub(crate) fn s1() -> ComponentTag {
    ComponentTag::switch(1).unwrap()
}

pub(crate) fn h1() -> ComponentTag {
    ComponentTag::lamp(1).unwrap()
}

/// Two-rung ladder on a 10x10 board, as (cell, position) placements.
///
/// ```text
/// row 0:  L ─ S1(NO) ─ coil ─┐
/// row 1:  └ K1(NO) ─ H1 ─────┤
///                            │  column 3 carries N up from row 9
/// row 9:  N ─────────────────┘
/// ```
pub(crate) fn ladder_cells(coil: Cell) -> Vec<(Cell, Position)> {
    let wire = |shape: &str| Cell::wire(EdgeMask::from_shape(shape));
    let mut cells = vec![
        (wire("ldr"), Position::new(0, 0)),
        (Cell::button(s1(), ContactType::NormallyOpen), BUTTON),
        (coil, COIL),
        (wire("ld"), Position::new(3, 0)),
        (wire("ur"), Position::new(0, 1)),
        (Cell::contact(k1(), ContactType::NormallyOpen), CONTACT),
        (Cell::light(h1(), LightColor::Green), LAMP),
        (wire("uld"), Position::new(3, 1)),
        (Cell::contact(k1(), ContactType::NormallyClosed), SPARE_NC),
        (wire("lr"), Position::new(0, 9)),
        (wire("lr"), Position::new(1, 9)),
        (wire("lr"), Position::new(2, 9)),
        (wire("ul"), Position::new(3, 9)),
    ];
    for y in 2..9 {
        cells.push((wire("ud"), Position::new(3, y)));
    }
    cells
}

pub(crate) fn ladder_board(coil: Cell) -> Board {
    let mut board = Board::new(BoardSize::Small);
    for (cell, pos) in ladder_cells(coil) {
        board.place(cell, pos).unwrap();
    }
    board.refresh_active_width();
    board
}
