//! Dataset write and read drivers.
//!
//! Writes detect the input's shape, flatten it, and hand the buffer to the
//! engine with a freshly described flat 1-D memory dataspace of `U * V`
//! cells. The file side is either the dataset's entire declared dataspace
//! or a hyperslab selection applied to it. Reads go the other way: extent
//! product → typed read → unflatten.
//!
//! Every dataspace handle a driver creates or fetches is closed on every
//! exit path, success or error.

use bytemuck::pod_collect_to_vec;
use h5bridge_engine::{DataspaceId, DatasetId, EngineError, FileSpace, ScalarType, StorageEngine};
use log::debug;

use crate::error::Error;
use crate::flatten::{flatten, FlatBuffer};
use crate::selection::Hyperslab;
use crate::shape;
use crate::unflatten::{unflatten_floats, unflatten_ints, unflatten_strings};
use crate::value::Value;

/// Write a full dataset from a value sequence.
///
/// The input must be a non-empty sequence of scalars or of uniform
/// fixed-size tuples; shape and cell type are inferred, not declared.
pub fn write<E: StorageEngine>(
    engine: &mut E,
    ds: DatasetId,
    value: &Value,
) -> Result<(), Error> {
    let shape = shape::detect(value)?;
    let buffer = flatten(value, &shape)?;
    debug!("full-extent write of {} cells", buffer.len());
    write_buffer(engine, ds, None, &buffer)
}

/// Write a value sequence into a hyperslab selection of a dataset.
///
/// The selection is applied to the dataset's file dataspace with the
/// descriptor's operator (`Set` replaces the current selection, `Or`
/// unions with it), then paired with a flat 1-D memory dataspace.
pub fn write_slab<E: StorageEngine>(
    engine: &mut E,
    ds: DatasetId,
    slab: &Hyperslab,
    value: &Value,
) -> Result<(), Error> {
    let shape = shape::detect(value)?;
    let buffer = flatten(value, &shape)?;
    debug!(
        "selective write of {} cells, rank-{} selection",
        buffer.len(),
        slab.rank()
    );

    let file_space = engine.dataset_space(ds)?;
    if let Err(e) = engine.select_hyperslab(
        file_space,
        slab.op(),
        slab.offset(),
        slab.stride(),
        slab.count(),
        slab.block(),
    ) {
        let _ = engine.close_space(file_space);
        return Err(e.into());
    }
    let written = write_buffer(engine, ds, Some(file_space), &buffer);
    let closed = engine.close_space(file_space);
    written?;
    Ok(closed?)
}

/// Read a dataset's full contents as a value sequence.
///
/// The cell count is the product of the dataset's current extent; the
/// declared cell type picks the decoder (integer, float, or fixed-width
/// string).
pub fn read<E: StorageEngine>(engine: &mut E, ds: DatasetId) -> Result<Value, Error> {
    let space = engine.dataset_space(ds)?;
    let dims = engine.space_dims(space);
    let closed = engine.close_space(space);
    let dims = dims?;
    closed?;

    let count = dims.iter().product::<u64>() as usize;
    let dtype = engine.dataset_type(ds)?;
    let raw = engine.read_dataset(ds)?;

    let needed = count * dtype.byte_size();
    if raw.len() < needed {
        return Err(Error::Engine(EngineError::SizeMismatch {
            expected: needed,
            got: raw.len(),
        }));
    }

    debug!("read {count} cells of {dtype:?} from extent {dims:?}");
    let values = match dtype {
        ScalarType::Int32 => {
            let cells: Vec<i32> = pod_collect_to_vec(&raw[..needed]);
            unflatten_ints(&cells, count)
        }
        ScalarType::Float64 => {
            let cells: Vec<f64> = pod_collect_to_vec(&raw[..needed]);
            unflatten_floats(&cells, count)
        }
        ScalarType::FixedStr { size } => unflatten_strings(&raw[..needed], size, count),
    };
    Ok(Value::Seq(values))
}

/// Hand a flattened buffer to the engine, scoping the flat 1-D memory
/// dataspace to this call.
pub(crate) fn write_buffer<E: StorageEngine>(
    engine: &mut E,
    ds: DatasetId,
    file_space: Option<DataspaceId>,
    buffer: &FlatBuffer,
) -> Result<(), Error> {
    let mem_space = engine.create_space(&[buffer.len() as u64])?;
    let file = match file_space {
        Some(id) => FileSpace::Space(id),
        None => FileSpace::All,
    };
    let written = engine.write_dataset(
        ds,
        FileSpace::Space(mem_space),
        file,
        buffer.scalar_type(),
        buffer.as_bytes(),
    );
    let closed = engine.close_space(mem_space);
    written?;
    Ok(closed?)
}
