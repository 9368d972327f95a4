//! Row-major flattening of value sequences into typed cell buffers.
//!
//! The encoder streams the input exactly once, validating uniformity as it
//! goes: tuple sizes against the detected shape, every cell against the
//! detected element type. The in-progress buffer is owned by the call and
//! dropped on every early return; no partial buffer ever reaches a caller.

use h5bridge_engine::ScalarType;

use crate::error::Error;
use crate::numeric::encode_float;
use crate::shape::{ElemType, Shape};
use crate::value::Value;

/// An owned, contiguous, row-major cell buffer ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatBuffer {
    Int(Vec<i32>),
    Float(Vec<f64>),
}

impl FlatBuffer {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            FlatBuffer::Int(v) => v.len(),
            FlatBuffer::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The engine-side cell type of this buffer.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            FlatBuffer::Int(_) => ScalarType::Int32,
            FlatBuffer::Float(_) => ScalarType::Float64,
        }
    }

    /// The cells as raw bytes, without copying.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FlatBuffer::Int(v) => bytemuck::cast_slice(v),
            FlatBuffer::Float(v) => bytemuck::cast_slice(v),
        }
    }
}

/// Flatten a sequence into a [`FlatBuffer`] of `U * V` cells.
///
/// `shape` comes from [`crate::shape::detect`] on the same value. For 2-D
/// shapes every element must be a tuple of exactly `shape.tuple_size`
/// cells; a differing size aborts the pass with
/// [`Error::NonUniformTupleSize`].
pub fn flatten(input: &Value, shape: &Shape) -> Result<FlatBuffer, Error> {
    let items = input
        .as_seq()
        .ok_or(Error::InvalidInput("expected a sequence"))?;
    match shape.elem {
        ElemType::Int => flatten_ints(items, shape).map(FlatBuffer::Int),
        ElemType::Float => flatten_floats(items, shape).map(FlatBuffer::Float),
    }
}

fn flatten_ints(items: &[Value], shape: &Shape) -> Result<Vec<i32>, Error> {
    let mut buffer = new_buffer::<i32>(shape.cell_count())?;
    for item in items {
        for cell in element_cells(item, shape)? {
            buffer.push(int_cell(cell)?);
        }
    }
    Ok(buffer)
}

fn flatten_floats(items: &[Value], shape: &Shape) -> Result<Vec<f64>, Error> {
    let mut buffer = new_buffer::<f64>(shape.cell_count())?;
    for item in items {
        for cell in element_cells(item, shape)? {
            buffer.push(encode_float(cell)?);
        }
    }
    Ok(buffer)
}

/// Allocate the full-size cell buffer up front, reporting allocation
/// failure instead of aborting.
fn new_buffer<T>(cells: usize) -> Result<Vec<T>, Error> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(cells)
        .map_err(|_| Error::AllocationFailure)?;
    Ok(buffer)
}

/// The cells of one sequence element: the tuple contents for 2-D shapes,
/// the element itself for 1-D.
fn element_cells<'a>(item: &'a Value, shape: &Shape) -> Result<&'a [Value], Error> {
    if shape.ndims == 1 {
        return Ok(std::slice::from_ref(item));
    }
    match item {
        Value::Tuple(cells) if cells.len() == shape.tuple_size => Ok(cells),
        Value::Tuple(cells) => Err(Error::NonUniformTupleSize {
            expected: shape.tuple_size,
            got: cells.len(),
        }),
        _ => Err(Error::TypeMismatch("sequence element is not a tuple")),
    }
}

fn int_cell(cell: &Value) -> Result<i32, Error> {
    match cell {
        Value::Int(v) => {
            i32::try_from(*v).map_err(|_| Error::TypeMismatch("integer cell out of range"))
        }
        _ => Err(Error::TypeMismatch("cell does not contain an integer")),
    }
}
