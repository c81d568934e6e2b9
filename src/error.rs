//! Error taxonomy shared by every generation stage.

use crate::instance::MeshClass;
use thiserror::Error;

/// Failures that abort a generation pass.
///
/// Structural errors never yield partial output: a malformed derivation or a missing
/// base mesh stops the whole pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FloraError {
    #[error("Invalid iteration count {requested} (allowed range 0..={max})")]
    InvalidIterationCount { requested: i64, max: u32 },

    #[error("Unmatched ']' at symbol {position}: turtle stack is empty")]
    StackUnderflow { position: usize },

    #[error("Push at symbol {position} exceeds the maximum stack depth of {max_depth}")]
    StackOverflow { position: usize, max_depth: usize },

    #[error("No base mesh supplied for mesh class {0:?}")]
    UnknownMeshClass(MeshClass),

    #[error("Invalid {class:?} base mesh: {reason}")]
    InvalidMesh { class: MeshClass, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Symbol storage error: {0}")]
    Symbols(String),
}

pub type Result<T> = std::result::Result<T, FloraError>;
