use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid coordinate: `x` is the column, `y` the row. (0,0) is the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbouring position in `dir`, or `None` when it would leave a `size`×`size` grid
    pub fn step(self, dir: Direction, size: usize) -> Option<Position> {
        match dir {
            Direction::Up if self.y > 0 => Some(Position::new(self.x, self.y - 1)),
            Direction::Left if self.x > 0 => Some(Position::new(self.x - 1, self.y)),
            Direction::Down if self.y + 1 < size => Some(Position::new(self.x, self.y + 1)),
            Direction::Right if self.x + 1 < size => Some(Position::new(self.x + 1, self.y)),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four wiring directions of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Up, left, down, right: the field order of the board file
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
        }
    }
}

/// Physical wiring of a cell, fixed when the cell is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EdgeMask {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl EdgeMask {
    pub const NONE: EdgeMask = EdgeMask::new(false, false, false, false);
    pub const HORIZONTAL: EdgeMask = EdgeMask::new(false, true, false, true);
    pub const VERTICAL: EdgeMask = EdgeMask::new(true, false, true, false);
    pub const CROSS: EdgeMask = EdgeMask::new(true, true, true, true);

    pub const fn new(up: bool, left: bool, down: bool, right: bool) -> Self {
        Self { up, left, down, right }
    }

    pub fn has(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Right => self.right,
        }
    }

    pub fn set(&mut self, dir: Direction, value: bool) {
        match dir {
            Direction::Up => self.up = value,
            Direction::Left => self.left = value,
            Direction::Down => self.down = value,
            Direction::Right => self.right = value,
        }
    }

    pub fn with(mut self, dir: Direction, value: bool) -> Self {
        self.set(dir, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        !(self.up || self.left || self.down || self.right)
    }

    /// Parses a wire shape such as `"uldr"` or `"ld"` (letters in any order)
    pub fn from_shape(shape: &str) -> Self {
        Self::new(
            shape.contains('u'),
            shape.contains('l'),
            shape.contains('d'),
            shape.contains('r'),
        )
    }

    /// Wire shape letters in `u`, `l`, `d`, `r` order
    pub fn shape(&self) -> String {
        let mut shape = String::with_capacity(4);
        for (dir, letter) in Direction::ALL.iter().zip(['u', 'l', 'd', 'r']) {
            if self.has(*dir) {
                shape.push(letter);
            }
        }
        shape
    }
}

/// Supply rail of the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rail {
    /// L / + line, fed at the top-left cell
    Positive,
    /// N / - line, fed at the bottom-left cell
    Negative,
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rail::Positive => write!(f, "L / +"),
            Rail::Negative => write!(f, "N / -"),
        }
    }
}

/// Supported board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum BoardSize {
    #[default]
    Small,
    Large,
}

impl BoardSize {
    pub fn cells(self) -> usize {
        match self {
            BoardSize::Small => 10,
            BoardSize::Large => 15,
        }
    }

    /// Row of the negative (N) supply cell
    pub fn negative_row(self) -> usize {
        self.cells() - 1
    }
}

impl TryFrom<usize> for BoardSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(BoardSize::Small),
            15 => Ok(BoardSize::Large),
            other => Err(format!("board size must be 10 or 15, got {}", other)),
        }
    }
}

impl From<BoardSize> for usize {
    fn from(size: BoardSize) -> usize {
        size.cells()
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cells())
    }
}

/// Letter prefix of a component id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagFamily {
    /// `S`: push buttons, indices 0..=9
    Switch,
    /// `K`: relay coils and their contacts, indices 1..=9
    Relay,
    /// `H`: indicator lights, indices 1..=9
    Lamp,
}

impl TagFamily {
    pub fn prefix(self) -> char {
        match self {
            TagFamily::Switch => 'S',
            TagFamily::Relay => 'K',
            TagFamily::Lamp => 'H',
        }
    }

    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'S' => Some(TagFamily::Switch),
            'K' => Some(TagFamily::Relay),
            'H' => Some(TagFamily::Lamp),
            _ => None,
        }
    }

    /// Smallest valid index for the family
    pub fn min_index(self) -> u8 {
        match self {
            TagFamily::Switch => 0,
            TagFamily::Relay | TagFamily::Lamp => 1,
        }
    }

    pub const MAX_INDEX: u8 = 9;

    pub fn accepts(self, index: u8) -> bool {
        (self.min_index()..=Self::MAX_INDEX).contains(&index)
    }
}

/// Shared group key of a component, e.g. `K1`, `S0`, `H2`.
///
/// All cells carrying the same tag belong to one physical device: the contacts
/// of relay `K1` follow the coil `K1`, every `S0` button moves together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentTag {
    family: TagFamily,
    index: u8,
}

impl ComponentTag {
    /// Create a tag, returning `None` when `index` is out of range for the family
    pub fn new(family: TagFamily, index: u8) -> Option<Self> {
        family.accepts(index).then_some(Self { family, index })
    }

    pub fn switch(index: u8) -> Option<Self> {
        Self::new(TagFamily::Switch, index)
    }

    pub fn relay(index: u8) -> Option<Self> {
        Self::new(TagFamily::Relay, index)
    }

    pub fn lamp(index: u8) -> Option<Self> {
        Self::new(TagFamily::Lamp, index)
    }

    /// Lowest valid tag of a family: S0, K1, H1
    pub fn first(family: TagFamily) -> Self {
        Self {
            family,
            index: family.min_index(),
        }
    }

    /// Tag for a zero-based registry slot (slot 0 is index 1)
    pub(crate) fn from_slot(family: TagFamily, slot: usize) -> Self {
        Self {
            family,
            index: (slot + 1).min(usize::from(TagFamily::MAX_INDEX)) as u8,
        }
    }

    pub fn family(&self) -> TagFamily {
        self.family
    }

    pub fn index(&self) -> u8 {
        self.index
    }
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family.prefix(), self.index)
    }
}

impl FromStr for ComponentTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let family = chars
            .next()
            .and_then(TagFamily::from_prefix)
            .ok_or_else(|| format!("unknown component id '{}'", s))?;
        let index: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| format!("component id '{}' has no numeric suffix", s))?;
        ComponentTag::new(family, index)
            .ok_or_else(|| format!("component id '{}' is out of range", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_respects_bounds() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Up, 10), None);
        assert_eq!(corner.step(Direction::Left, 10), None);
        assert_eq!(corner.step(Direction::Right, 10), Some(Position::new(1, 0)));

        let far = Position::new(9, 9);
        assert_eq!(far.step(Direction::Down, 10), None);
        assert_eq!(far.step(Direction::Down, 15), Some(Position::new(9, 10)));
    }

    #[test]
    fn test_edge_mask_shapes() {
        let t = EdgeMask::from_shape("ldr");
        assert!(t.left && t.down && t.right && !t.up);
        assert_eq!(t.shape(), "ldr");
        assert_eq!(EdgeMask::CROSS.shape(), "uldr");
        assert!(EdgeMask::NONE.is_empty());
    }

    #[test]
    fn test_component_tag_parsing() {
        let k1: ComponentTag = "K1".parse().unwrap();
        assert_eq!(k1, ComponentTag::relay(1).unwrap());
        assert_eq!(k1.to_string(), "K1");

        assert!("S0".parse::<ComponentTag>().is_ok());
        assert!("K0".parse::<ComponentTag>().is_err());
        assert!("H10".parse::<ComponentTag>().is_err());
        assert!("Kx".parse::<ComponentTag>().is_err());
        assert!("".parse::<ComponentTag>().is_err());
    }

    #[test]
    fn test_board_size_conversion() {
        assert_eq!(BoardSize::try_from(15).unwrap(), BoardSize::Large);
        assert!(BoardSize::try_from(12).is_err());
        assert_eq!(BoardSize::Small.negative_row(), 9);
        assert_eq!(BoardSize::Large.negative_row(), 14);
    }
}
