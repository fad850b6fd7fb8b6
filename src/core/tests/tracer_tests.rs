use super::{ladder_board, BUTTON, COIL, CONTACT, LAMP};
use crate::core::board::Board;
use crate::core::components::{Cell, Component, ContactType, LightColor, TimerKind};
use crate::core::connections::{ConnectivityTracer, EdgeValidator, ReachSet};
use crate::core::interaction::InteractionLayer;
use crate::core::types::{BoardSize, ComponentTag, Direction, EdgeMask, Position, Rail};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn wire(shape: &str) -> Cell {
    Cell::wire(EdgeMask::from_shape(shape))
}

/// Random board with both supply cells grounded. Buttons and contacts get a
/// random conductive state, coils and lights are placed until their ids run out.
fn random_board(rng: &mut StdRng, size: BoardSize) -> Board {
    let mut board = Board::new(size);
    let n = board.dimension();
    let mut next_relay = 1;
    let mut next_lamp = 1;

    for y in 0..n {
        for x in 0..n {
            let edges = EdgeMask::new(rng.gen_bool(0.6), rng.gen_bool(0.6), rng.gen_bool(0.6), rng.gen_bool(0.6));
            let roll: u32 = rng.gen_range(0..100);
            let cell = match roll {
                0..=14 => Cell::empty(),
                15..=64 => Cell::wire(edges),
                65..=79 => {
                    let tag = ComponentTag::switch(rng.gen_range(0..=9)).unwrap();
                    let contact = if rng.gen_bool(0.5) {
                        ContactType::NormallyOpen
                    } else {
                        ContactType::NormallyClosed
                    };
                    Cell::restored(Component::Button { tag, contact }, edges, rng.gen_bool(0.5))
                }
                80..=89 if next_relay <= 9 => {
                    let tag = ComponentTag::relay(next_relay).unwrap();
                    next_relay += 1;
                    Cell::coil(tag, TimerKind::Normal, 0).with_edges(edges)
                }
                90..=99 if next_lamp <= 9 => {
                    let tag = ComponentTag::lamp(next_lamp).unwrap();
                    next_lamp += 1;
                    Cell::light(tag, LightColor::Red).with_edges(edges)
                }
                _ => {
                    let tag = ComponentTag::relay(rng.gen_range(1..=9)).unwrap();
                    Cell::restored(
                        Component::Contact { tag, contact: ContactType::NormallyOpen },
                        edges,
                        rng.gen_bool(0.5),
                    )
                }
            };
            board.place(cell, Position::new(x, y)).unwrap();
        }
    }

    board.place(wire("ldr"), board.positive_source()).unwrap();
    board.place(wire("lur"), board.negative_source()).unwrap();
    board
}

/// Every reached cell other than the source was entered from a reached,
/// conductive, non-sink neighbour over a conducting edge.
fn assert_justified(board: &Board, reach: &ReachSet, source: Position) {
    let n = board.dimension();
    for pos in reach.positions() {
        if pos == source {
            continue;
        }
        let justified = Direction::ALL.iter().any(|&dir| {
            pos.step(dir, n).map_or(false, |prev| {
                let prev_cell = board.cell(prev).unwrap();
                reach.contains(prev)
                    && prev_cell.is_conductive()
                    && !prev_cell.is_sink()
                    && EdgeValidator::conducts(board, prev, dir.opposite()) == Some(pos)
            })
        });
        assert!(justified, "{} reached without a forwarding neighbour", pos);
    }
}

/// Every conducting neighbour of a reached, forwarding cell is reached too
fn assert_closed(board: &Board, reach: &ReachSet) {
    for pos in reach.positions() {
        let cell = board.cell(pos).unwrap();
        if !cell.is_conductive() || cell.is_sink() {
            continue;
        }
        for dir in Direction::ALL {
            if let Some(next) = EdgeValidator::conducts(board, pos, dir) {
                assert!(reach.contains(next), "{} not reached from {}", next, pos);
            }
        }
    }
}

#[test]
fn test_chain_without_reciprocal_ends_reaches_only_sources() {
    let mut board = Board::new(BoardSize::Small);
    board.place(wire("l"), Position::new(0, 0)).unwrap();
    for y in 1..9 {
        board.place(wire("ud"), Position::new(0, y)).unwrap();
    }
    board.place(wire("l"), Position::new(0, 9)).unwrap();
    board.refresh_active_width();

    let report = ConnectivityTracer::new().trace(&mut board);

    assert_eq!(report.positive.positions().collect::<Vec<_>>(), vec![Position::new(0, 0)]);
    assert_eq!(report.negative.positions().collect::<Vec<_>>(), vec![Position::new(0, 9)]);
    for (pos, cell) in board.iter() {
        assert_eq!(cell.reached_positive(), pos == Position::new(0, 0));
        assert_eq!(cell.reached_negative(), pos == Position::new(0, 9));
    }
}

#[test]
fn test_trace_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    let tracer = ConnectivityTracer::new();
    for _ in 0..20 {
        let mut board = random_board(&mut rng, BoardSize::Small);
        let first = tracer.trace(&mut board);
        let snapshot = board.clone();
        let second = tracer.trace(&mut board);

        assert_eq!(first, second);
        for ((_, a), (_, b)) in snapshot.iter().zip(board.iter()) {
            assert_eq!(a, b);
        }
    }
}

#[test]
fn test_reach_does_not_depend_on_direction_order() {
    let mut rng = StdRng::seed_from_u64(42);
    let baseline = ConnectivityTracer::new();
    for size in [BoardSize::Small, BoardSize::Large] {
        for _ in 0..25 {
            let board = random_board(&mut rng, size);
            let expected = baseline.compute(&board);
            for _ in 0..4 {
                let mut order = Direction::ALL;
                order.shuffle(&mut rng);
                let report = ConnectivityTracer::with_direction_order(order).compute(&board);
                assert_eq!(report, expected, "order {:?}", order);
            }
        }
    }
}

#[test]
fn test_random_boards_respect_sinks_and_edges() {
    let mut rng = StdRng::seed_from_u64(7);
    let tracer = ConnectivityTracer::new();
    for _ in 0..40 {
        let board = random_board(&mut rng, BoardSize::Small);
        let report = tracer.compute(&board);
        for (rail, source) in [
            (Rail::Positive, board.positive_source()),
            (Rail::Negative, board.negative_source()),
        ] {
            assert_justified(&board, report.rail(rail), source);
            assert_closed(&board, report.rail(rail));
        }
    }
}

#[test]
fn test_coil_and_light_stop_both_rails() {
    let mut board = Board::new(BoardSize::Small);
    board.place(wire("lr"), Position::new(0, 0)).unwrap();
    board
        .place(Cell::coil(ComponentTag::relay(1).unwrap(), TimerKind::Normal, 0), Position::new(1, 0))
        .unwrap();
    board.place(wire("lr"), Position::new(2, 0)).unwrap();
    board.place(wire("lr"), Position::new(0, 9)).unwrap();
    board
        .place(Cell::light(ComponentTag::lamp(1).unwrap(), LightColor::Yellow), Position::new(1, 9))
        .unwrap();
    board.place(wire("lr"), Position::new(2, 9)).unwrap();

    let report = ConnectivityTracer::new().compute(&board);
    assert!(report.positive.contains(Position::new(1, 0)));
    assert!(!report.positive.contains(Position::new(2, 0)));
    assert!(report.negative.contains(Position::new(1, 9)));
    assert!(!report.negative.contains(Position::new(2, 9)));
}

#[test]
fn test_wired_cycle_terminates() {
    let mut board = Board::new(BoardSize::Small);
    board.place(wire("ldr"), Position::new(0, 0)).unwrap();
    board.place(wire("ld"), Position::new(1, 0)).unwrap();
    board.place(wire("ur"), Position::new(0, 1)).unwrap();
    board.place(wire("ul"), Position::new(1, 1)).unwrap();

    let report = ConnectivityTracer::new().compute(&board);
    assert_eq!(report.positive.len(), 4);
}

#[test]
fn test_rail_highlight_asymmetry_on_open_contact() {
    let mut board = Board::new(BoardSize::Small);
    let top = Position::new(1, 0);
    let bottom = Position::new(1, 9);
    let k2 = ComponentTag::relay(2).unwrap();
    board.place(wire("lr"), Position::new(0, 0)).unwrap();
    board.place(Cell::contact(k2, ContactType::NormallyOpen), top).unwrap();
    board.place(wire("lr"), Position::new(0, 9)).unwrap();
    board.place(Cell::contact(k2, ContactType::NormallyOpen), bottom).unwrap();

    ConnectivityTracer::new().trace(&mut board);

    // Both rails mark the open contact as reached and stop there
    let top_cell = board.cell(top).unwrap();
    assert!(top_cell.reached(Rail::Positive));
    assert!(!top_cell.is_live(Rail::Positive));
    let bottom_cell = board.cell(bottom).unwrap();
    assert!(bottom_cell.reached(Rail::Negative));
    // N is highlighted on the open contact, L is not
    assert!(bottom_cell.is_live(Rail::Negative));
    assert!(board.cell(Position::new(2, 9)).map_or(true, |cell| !cell.reached_negative()));
}

#[test]
fn test_ladder_powers_coil_only_while_button_held() {
    let mut board = ladder_board(Cell::coil(super::k1(), TimerKind::Normal, 0));
    let tracer = ConnectivityTracer::new();

    tracer.trace(&mut board);
    let coil = board.cell(COIL).unwrap();
    assert!(coil.reached_negative());
    assert!(!coil.reached_positive());
    assert!(board.cell(BUTTON).unwrap().reached_positive());

    InteractionLayer::press_button(&mut board, BUTTON);
    tracer.trace(&mut board);
    assert!(board.cell(COIL).unwrap().is_powered());
    assert!(!board.cell(LAMP).unwrap().is_powered());
    assert!(board.cell(CONTACT).unwrap().reached_positive());

    InteractionLayer::release_button(&mut board, BUTTON);
    tracer.trace(&mut board);
    assert!(!board.cell(COIL).unwrap().is_powered());
}

#[test]
fn test_cells_beyond_active_width_are_not_traced() {
    let mut board = Board::new(BoardSize::Small);
    board.place(wire("lr"), Position::new(0, 0)).unwrap();
    board.place(wire("lr"), Position::new(1, 0)).unwrap();
    board.place(wire("lr"), Position::new(5, 0)).unwrap();
    assert_eq!(board.refresh_active_width(), 3);

    let report = ConnectivityTracer::new().trace(&mut board);
    assert_eq!(report.positive.len(), 2);
    assert!(!board.cell(Position::new(5, 0)).unwrap().reached_positive());
}
