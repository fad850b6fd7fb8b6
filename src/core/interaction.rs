use crate::core::board::Board;
use crate::core::components::{Component, LightColor};
use crate::core::types::{ComponentTag, Position};
use serde::Serialize;

/// On/off state of one indicator light after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightState {
    pub tag: ComponentTag,
    pub position: Position,
    pub color: LightColor,
    pub lit: bool,
}

/// Fan-out of relay and button actions to every cell sharing an id
pub struct InteractionLayer;

impl InteractionLayer {
    /// Pull in relay `tag`: NO contacts close, NC contacts open.
    /// Returns the number of contacts visited.
    pub fn set_contacts(board: &mut Board, tag: ComponentTag) -> usize {
        Self::drive_contacts(board, tag, true)
    }

    /// Release relay `tag`: contacts return to their resting position
    pub fn reset_contacts(board: &mut Board, tag: ComponentTag) -> usize {
        Self::drive_contacts(board, tag, false)
    }

    fn drive_contacts(board: &mut Board, tag: ComponentTag, actuated: bool) -> usize {
        let mut count = 0;
        for pos in Self::scan_area(board) {
            let Some(cell) = board.cell_mut(pos) else { continue };
            if let Component::Contact { tag: contact_tag, contact } = *cell.component() {
                if contact_tag == tag {
                    cell.conductive = contact.closed_when(actuated);
                    count += 1;
                }
            }
        }
        count
    }

    /// Press the button at `pos` and every other button with the same id.
    /// Returns the number of buttons moved; zero if `pos` holds no button.
    pub fn press_button(board: &mut Board, pos: Position) -> usize {
        Self::actuate_button(board, pos, true)
    }

    /// Release the button at `pos` and every other button with the same id
    pub fn release_button(board: &mut Board, pos: Position) -> usize {
        Self::actuate_button(board, pos, false)
    }

    fn actuate_button(board: &mut Board, pos: Position, pressed: bool) -> usize {
        let Some(Component::Button { tag, .. }) = board.cell(pos).map(|cell| *cell.component()) else {
            return 0;
        };

        let mut targets = vec![pos];
        targets.extend(Self::scan_area(board).filter(|other| *other != pos));

        let mut count = 0;
        for target in targets {
            let Some(cell) = board.cell_mut(target) else { continue };
            if let Component::Button { tag: button_tag, contact } = *cell.component() {
                if button_tag == tag {
                    cell.conductive = contact.closed_when(pressed);
                    count += 1;
                }
            }
        }
        count
    }

    /// Light states derived from this tick's reached flags
    pub fn light_states(board: &Board) -> Vec<LightState> {
        board
            .registry()
            .lights()
            .map(|light| LightState {
                tag: light.tag(),
                position: light.position(),
                color: light.color(),
                lit: board
                    .cell(light.position())
                    .map(|cell| cell.is_powered())
                    .unwrap_or(false),
            })
            .collect()
    }

    /// Interior rows of the run area. Contacts and buttons in the top and bottom
    /// rows are never switched by id.
    fn scan_area(board: &Board) -> impl Iterator<Item = Position> {
        let width = board.active_width();
        let last_row = board.dimension().saturating_sub(2);
        (1..=last_row).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }
}
