use super::types::{ComponentTag, Position, Rail, TagFamily};
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the simulation core. Every variant is recoverable.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("position {pos} is outside the {size}x{size} board")]
    InvalidPlacement { pos: Position, size: usize },

    #[error("{tag} cannot be used here, expected a {expected:?} id")]
    WrongTagFamily { tag: ComponentTag, expected: TagFamily },

    #[error("{tag} is already on the board at {existing}")]
    IdConflict { tag: ComponentTag, existing: Position },

    #[error("supply {rail} is not connected at {pos}")]
    UngroundedSupply { rail: Rail, pos: Position },

    #[error("corrupt board file at line {line}: {reason}")]
    CorruptFile { line: usize, reason: String },

    #[error("invalid value '{input}' for {field}: {reason}")]
    InvalidNumericField {
        field: &'static str,
        input: String,
        reason: String,
    },

    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("operation requires {required:?} mode")]
    WrongMode { required: super::execution::Mode },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimError {
    pub(crate) fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        SimError::CorruptFile {
            line,
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
