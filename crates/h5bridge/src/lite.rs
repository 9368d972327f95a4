//! One-call convenience entry points.
//!
//! These wrap the create/open → marshal → close choreography for callers
//! that do not want to manage handles themselves. Every handle acquired
//! here is closed on every exit path.

use h5bridge_engine::{DatasetId, FileId, StorageEngine};
use log::debug;

use crate::dataset;
use crate::error::Error;
use crate::flatten::flatten;
use crate::options::Options;
use crate::shape;
use crate::value::Value;

/// Create a dataset named `name` with extent `dims` and write `value`
/// into it in one call.
///
/// The cell type is inferred from the value, not declared; `dims` must
/// describe the same number of cells the value flattens to (the engine
/// rejects the write otherwise).
pub fn make_dataset<E: StorageEngine>(
    engine: &mut E,
    opts: &Options,
    file: FileId,
    name: &str,
    dims: &[u64],
    value: &Value,
) -> Result<(), Error> {
    check_name(opts, name)?;
    let shape = shape::detect(value)?;
    let buffer = flatten(value, &shape)?;
    debug!("make_dataset {name:?}: {dims:?}, {} cells", buffer.len());

    let space = engine.create_space(dims)?;
    let created = engine.create_dataset(file, name, buffer.scalar_type(), space, None);
    let ds = match created {
        Ok(ds) => ds,
        Err(e) => {
            let _ = engine.close_space(space);
            return Err(e.into());
        }
    };
    let written = dataset::write_buffer(engine, ds, None, &buffer);
    let ds_closed = engine.close_dataset(ds);
    let space_closed = engine.close_space(space);
    written?;
    ds_closed?;
    Ok(space_closed?)
}

/// Open the dataset named `name`, read its full contents, close it.
///
/// The declared cell type picks the decoder: integer and float datasets
/// come back as number/symbol sequences, fixed-width string datasets as
/// sequences of text values.
pub fn read_dataset<E: StorageEngine>(
    engine: &mut E,
    opts: &Options,
    file: FileId,
    name: &str,
) -> Result<Value, Error> {
    check_name(opts, name)?;
    let ds = engine.open_dataset(file, name)?;
    let read = dataset::read(engine, ds);
    let closed = engine.close_dataset(ds);
    let value = read?;
    closed?;
    Ok(value)
}

/// Dimensionality of the named dataset's dataspace.
pub fn dataset_ndims<E: StorageEngine>(
    engine: &mut E,
    opts: &Options,
    file: FileId,
    name: &str,
) -> Result<usize, Error> {
    Ok(dataset_info(engine, opts, file, name)?.len())
}

/// Current extent of the named dataset's dataspace.
pub fn dataset_info<E: StorageEngine>(
    engine: &mut E,
    opts: &Options,
    file: FileId,
    name: &str,
) -> Result<Vec<u64>, Error> {
    check_name(opts, name)?;
    let ds = engine.open_dataset(file, name)?;
    let dims = dataset_dims(engine, ds);
    let closed = engine.close_dataset(ds);
    let dims = dims?;
    closed?;
    Ok(dims)
}

fn dataset_dims<E: StorageEngine>(engine: &mut E, ds: DatasetId) -> Result<Vec<u64>, Error> {
    let space = engine.dataset_space(ds)?;
    let dims = engine.space_dims(space);
    let closed = engine.close_space(space);
    let dims = dims?;
    closed?;
    Ok(dims)
}

fn check_name(opts: &Options, name: &str) -> Result<(), Error> {
    if name.len() > opts.max_name_len {
        return Err(Error::InvalidInput("name exceeds configured maximum length"));
    }
    Ok(())
}
