//! Error taxonomy of the marshalling layer.

use std::fmt;

use h5bridge_engine::EngineError;

/// Errors reported by the marshalling layer.
///
/// Every error is terminal and synchronous; nothing is retried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input value has a shape the marshaller cannot accept.
    InvalidInput(&'static str),
    /// The input sequence has no elements.
    EmptyInput,
    /// A tuple's size differs from the size established by the first tuple.
    NonUniformTupleSize {
        /// Tuple size detected from the first element.
        expected: usize,
        /// Size of the offending tuple.
        got: usize,
    },
    /// A cell does not convert to the detected element type.
    TypeMismatch(&'static str),
    /// The first element is neither integer- nor float-representable.
    UnsupportedType,
    /// The four hyperslab coordinate sets do not share one rank.
    RankMismatch {
        /// Coordinate set whose rank differs from the offset's.
        field: &'static str,
        /// Rank of the offset coordinates.
        expected: usize,
        /// Rank of the offending coordinates.
        got: usize,
    },
    /// The intermediate cell buffer could not be allocated.
    AllocationFailure,
    /// The storage engine reported a failure.
    Engine(EngineError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(what) => write!(f, "invalid input: {what}"),
            Error::EmptyInput => write!(f, "empty input sequence"),
            Error::NonUniformTupleSize { expected, got } => {
                write!(f, "non-uniform tuple size: expected {expected}, got {got}")
            }
            Error::TypeMismatch(what) => write!(f, "type mismatch: {what}"),
            Error::UnsupportedType => write!(f, "unsupported cell type"),
            Error::RankMismatch {
                field,
                expected,
                got,
            } => {
                write!(f, "offset and {field} of different ranks: {expected} vs {got}")
            }
            Error::AllocationFailure => write!(f, "cannot allocate intermediate buffer"),
            Error::Engine(e) => write!(f, "storage engine failure: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for Error {
    fn from(e: EngineError) -> Error {
        Error::Engine(e)
    }
}
