use crate::core::board::Board;
use crate::core::components::{Cell, Component, ContactType, LightColor, TimerKind};
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{BoardSize, ComponentTag, Direction, EdgeMask, Position, TagFamily};
use log::debug;
use std::path::Path;

const FIELD_SEPARATOR: char = '!';
const HEADER_RESERVED: &str = "res";
const FIELD_COUNT: usize = 9;

/// Line-oriented text format of a saved board.
///
/// ```text
/// 10!res
/// kind!id!up!left!down!right!conductive!visual!delay   (size*size lines, row-major)
/// comment...
/// ```
pub struct BoardCodec;

impl BoardCodec {
    pub fn encode(board: &Board) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}{}{}\n", board.dimension(), FIELD_SEPARATOR, HEADER_RESERVED));

        for (pos, cell) in board.iter() {
            let component = cell.component();
            let edges = cell.edges();
            let visual = board
                .visual_at(pos)
                .map(|visual| visual.sprite())
                .unwrap_or_default();
            let fields = [
                component.kind_token().to_string(),
                component.tag().map(|tag| tag.to_string()).unwrap_or_default(),
                flag(edges.up),
                flag(edges.left),
                flag(edges.down),
                flag(edges.right),
                flag(cell.is_conductive()),
                visual,
                cell.delay_secs().to_string(),
            ];
            out.push_str(&fields.join("!"));
            out.push('\n');
        }

        out.push_str(board.comment());
        out.push('\n');
        out
    }

    /// Parse a saved board. Every failure is reported as [`SimError::CorruptFile`]
    /// with the 1-based line number.
    pub fn decode(text: &str) -> SimResult<Board> {
        let mut lines = text.lines();

        let header = lines
            .next()
            .ok_or_else(|| SimError::corrupt(1, "missing size header"))?;
        let size = parse_header(header)?;
        let mut board = Board::new(size);
        let n = size.cells();

        for y in 0..n {
            for x in 0..n {
                let line_no = 2 + y * n + x;
                let line = lines
                    .next()
                    .ok_or_else(|| SimError::corrupt(line_no, "unexpected end of file"))?;
                let cell = parse_cell(line, line_no)?;
                board
                    .place(cell, Position::new(x, y))
                    .map_err(|err| SimError::corrupt(line_no, err.to_string()))?;
            }
        }

        let comment: Vec<&str> = lines.collect();
        board.set_comment(comment.join("\n"));
        debug!("Decoded {}x{} board", n, n);
        Ok(board)
    }

    pub fn save(board: &Board, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        std::fs::write(path, Self::encode(board)).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Board> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(&text)
    }
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

fn parse_header(line: &str) -> SimResult<BoardSize> {
    let size_field = line.split(FIELD_SEPARATOR).next().unwrap_or_default().trim();
    let size: usize = size_field
        .parse()
        .map_err(|_| SimError::corrupt(1, format!("board size '{}' is not a number", size_field)))?;
    BoardSize::try_from(size).map_err(|reason| SimError::corrupt(1, reason))
}

fn parse_flag(field: &str, line_no: usize, name: &str) -> SimResult<bool> {
    match field.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(SimError::corrupt(
            line_no,
            format!("{} must be 0 or 1, got '{}'", name, other),
        )),
    }
}

fn parse_tag(field: &str, family: TagFamily, line_no: usize) -> SimResult<ComponentTag> {
    let tag: ComponentTag = field
        .trim()
        .parse()
        .map_err(|reason: String| SimError::corrupt(line_no, reason))?;
    if tag.family() != family {
        return Err(SimError::corrupt(
            line_no,
            format!("id '{}' must start with '{}'", field, family.prefix()),
        ));
    }
    Ok(tag)
}

fn parse_cell(line: &str, line_no: usize) -> SimResult<Cell> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(SimError::corrupt(
            line_no,
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    }

    let mut edges = EdgeMask::NONE;
    for (dir, field) in Direction::ALL.iter().zip(&fields[2..6]) {
        edges.set(*dir, parse_flag(field, line_no, "direction")?);
    }
    let conductive = parse_flag(fields[6], line_no, "conductive")?;
    let delay_secs: u32 = fields[8].trim().parse().map_err(|_| {
        SimError::corrupt(line_no, format!("delay '{}' is not a number", fields[8]))
    })?;

    let id = fields[1];
    let component = match fields[0].trim() {
        "empty" => Component::Empty,
        "line" => Component::Wire,
        "buttonNO" => Component::Button {
            tag: parse_tag(id, TagFamily::Switch, line_no)?,
            contact: ContactType::NormallyOpen,
        },
        "buttonNC" => Component::Button {
            tag: parse_tag(id, TagFamily::Switch, line_no)?,
            contact: ContactType::NormallyClosed,
        },
        "contactNO" => Component::Contact {
            tag: parse_tag(id, TagFamily::Relay, line_no)?,
            contact: ContactType::NormallyOpen,
        },
        "contactNC" => Component::Contact {
            tag: parse_tag(id, TagFamily::Relay, line_no)?,
            contact: ContactType::NormallyClosed,
        },
        "relaycoil" => coil(id, TimerKind::Normal, delay_secs, line_no)?,
        "ontimercoil" => coil(id, TimerKind::OnDelay, delay_secs, line_no)?,
        "offtimercoil" => coil(id, TimerKind::OffDelay, delay_secs, line_no)?,
        "greenlight" => light(id, LightColor::Green, line_no)?,
        "yellowlight" => light(id, LightColor::Yellow, line_no)?,
        "redlight" => light(id, LightColor::Red, line_no)?,
        other => {
            return Err(SimError::corrupt(line_no, format!("unknown component '{}'", other)));
        }
    };

    Ok(Cell::restored(component, edges, conductive))
}

fn coil(id: &str, timer: TimerKind, delay_secs: u32, line_no: usize) -> SimResult<Component> {
    Ok(Component::Coil {
        tag: parse_tag(id, TagFamily::Relay, line_no)?,
        timer,
        delay_secs,
    })
}

fn light(id: &str, color: LightColor, line_no: usize) -> SimResult<Component> {
    Ok(Component::Light {
        tag: parse_tag(id, TagFamily::Lamp, line_no)?,
        color,
    })
}
