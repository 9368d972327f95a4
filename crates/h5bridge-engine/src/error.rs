//! Error type reported by storage engines.

use std::fmt;

/// Errors a storage engine can report back across the boundary.
///
/// The marshalling layer treats these as opaque terminal failures; nothing
/// is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A handle did not refer to an open object of the expected class.
    InvalidHandle {
        /// Object class the handle was expected to name.
        kind: &'static str,
        /// The raw id.
        id: u64,
    },
    /// A named object does not exist.
    NotFound(String),
    /// A named object already exists and cannot be created again.
    AlreadyExists(String),
    /// A selection's rank does not match the rank of the dataspace.
    SelectionRank {
        /// Rank of the dataspace being selected in.
        space: usize,
        /// Rank of the supplied selection.
        selection: usize,
    },
    /// A buffer's byte length does not match what the operation requires.
    SizeMismatch {
        /// Required length in bytes.
        expected: usize,
        /// Supplied length in bytes.
        got: usize,
    },
    /// The operation is not supported by this engine.
    Unsupported(&'static str),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidHandle { kind, id } => {
                write!(f, "invalid {kind} handle: {id}")
            }
            EngineError::NotFound(name) => write!(f, "object not found: {name}"),
            EngineError::AlreadyExists(name) => write!(f, "object already exists: {name}"),
            EngineError::SelectionRank { space, selection } => {
                write!(
                    f,
                    "selection rank {selection} does not match dataspace rank {space}"
                )
            }
            EngineError::SizeMismatch { expected, got } => {
                write!(f, "buffer size mismatch: expected {expected} bytes, got {got}")
            }
            EngineError::Unsupported(what) => write!(f, "unsupported operation: {what}"),
        }
    }
}

impl std::error::Error for EngineError {}
