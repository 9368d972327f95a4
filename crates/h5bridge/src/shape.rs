//! Shape and element-type detection for input sequences.
//!
//! One look-ahead pass: only the first element of the sequence is
//! inspected. Full uniformity validation is deferred to the flattening
//! pass, which streams the sequence exactly once anyway.

use log::debug;

use crate::error::Error;
use crate::value::{Value, INF_TAG, NAN_TAG};

/// Element type of the cells in a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemType {
    /// Cells are 32-bit integers on the wire.
    Int,
    /// Cells are 64-bit floats on the wire.
    Float,
}

/// Detected shape of an input sequence.
///
/// Derived per call and never persisted. `len` is the number of sequence
/// elements (U); `tuple_size` (V) is 1 for flat sequences of scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Dimensionality: 1 for a sequence of scalars, 2 for a sequence of
    /// fixed-size tuples.
    pub ndims: usize,
    /// Number of sequence elements (U).
    pub len: usize,
    /// Cells per element (V).
    pub tuple_size: usize,
    /// Cell type, probed from the first cell.
    pub elem: ElemType,
}

impl Shape {
    /// Total number of cells, `U * V`.
    pub fn cell_count(&self) -> usize {
        self.len * self.tuple_size
    }
}

/// Detect the shape of an input sequence from its first element.
///
/// The element type probe checks integer representability first, then
/// float representability. Non-sequence input is [`Error::InvalidInput`],
/// an empty sequence is [`Error::EmptyInput`], and a first cell that is
/// representable as neither type is [`Error::UnsupportedType`].
pub fn detect(input: &Value) -> Result<Shape, Error> {
    let items = input
        .as_seq()
        .ok_or(Error::InvalidInput("expected a sequence"))?;
    if items.is_empty() {
        return Err(Error::EmptyInput);
    }

    let shape = match &items[0] {
        Value::Tuple(cells) => {
            if cells.is_empty() {
                return Err(Error::InvalidInput("first tuple is empty"));
            }
            Shape {
                ndims: 2,
                len: items.len(),
                tuple_size: cells.len(),
                elem: cell_type(&cells[0])?,
            }
        }
        first => Shape {
            ndims: 1,
            len: items.len(),
            tuple_size: 1,
            elem: cell_type(first)?,
        },
    };

    debug!(
        "detected shape: {}x{} {:?}",
        shape.len, shape.tuple_size, shape.elem
    );
    Ok(shape)
}

/// Probe one cell for its element type, integers before floats.
fn cell_type(cell: &Value) -> Result<ElemType, Error> {
    match cell {
        Value::Int(v) if i32::try_from(*v).is_ok() => Ok(ElemType::Int),
        Value::Float(_) => Ok(ElemType::Float),
        Value::Symbol(tag) if tag == NAN_TAG || tag == INF_TAG => Ok(ElemType::Float),
        _ => Err(Error::UnsupportedType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_integer_sequence() {
        let input = Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let shape = detect(&input).unwrap();
        assert_eq!(
            shape,
            Shape {
                ndims: 1,
                len: 3,
                tuple_size: 1,
                elem: ElemType::Int
            }
        );
        assert_eq!(shape.cell_count(), 3);
    }

    #[test]
    fn tuple_sequence() {
        let input = Value::seq(vec![
            Value::tuple(vec![Value::Int(1), Value::Int(2)]),
            Value::tuple(vec![Value::Int(3), Value::Int(4)]),
        ]);
        let shape = detect(&input).unwrap();
        assert_eq!(
            shape,
            Shape {
                ndims: 2,
                len: 2,
                tuple_size: 2,
                elem: ElemType::Int
            }
        );
        assert_eq!(shape.cell_count(), 4);
    }

    #[test]
    fn float_and_symbol_cells_detect_as_float() {
        let input = Value::seq(vec![Value::Float(1.5)]);
        assert_eq!(detect(&input).unwrap().elem, ElemType::Float);

        let input = Value::seq(vec![Value::nan(), Value::Float(2.0)]);
        assert_eq!(detect(&input).unwrap().elem, ElemType::Float);
    }

    #[test]
    fn only_the_first_element_is_probed() {
        // The mixed tail is the flattener's problem, not the detector's.
        let input = Value::seq(vec![Value::Int(1), Value::Float(2.0)]);
        assert_eq!(detect(&input).unwrap().elem, ElemType::Int);
    }

    #[test]
    fn non_sequence_input_is_invalid() {
        assert_eq!(
            detect(&Value::Int(5)).unwrap_err(),
            Error::InvalidInput("expected a sequence")
        );
    }

    #[test]
    fn empty_sequence_is_empty_input() {
        assert_eq!(detect(&Value::seq(vec![])).unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn empty_first_tuple_is_invalid() {
        let input = Value::seq(vec![Value::tuple(vec![])]);
        assert!(matches!(detect(&input), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn oversized_integer_is_unsupported() {
        // Not integer-representable on the wire, and integers are not
        // float-representable either.
        let input = Value::seq(vec![Value::Int(i64::from(i32::MAX) + 1)]);
        assert_eq!(detect(&input).unwrap_err(), Error::UnsupportedType);
    }

    #[test]
    fn nested_sequence_is_unsupported() {
        let input = Value::seq(vec![Value::seq(vec![Value::Int(1)])]);
        assert_eq!(detect(&input).unwrap_err(), Error::UnsupportedType);
    }
}
