//! The storage engine trait consumed by the marshalling layer.

use crate::error::EngineError;
use crate::types::{
    DataspaceId, DatasetId, FileId, PlistClass, PlistId, ScalarType, SelectOperator, SpaceStatus,
};

/// File-side or memory-side dataspace argument of an I/O call.
///
/// `All` targets an object's entire declared dataspace, the way the
/// engine's native "select everything" sentinel does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSpace {
    /// The whole declared dataspace.
    All,
    /// An explicit dataspace handle, possibly carrying a selection.
    Space(DataspaceId),
}

/// Blocking, handle-based storage engine interface.
///
/// All handles are opaque and engine-owned. A single handle must not be
/// used from multiple callers without external serialisation; distinct
/// handles are independent. Every call either completes or reports one
/// terminal [`EngineError`] — the engine never retries internally.
pub trait StorageEngine {
    // -- files ------------------------------------------------------------

    /// Create a file, truncating any existing one of the same name.
    fn create_file(&mut self, name: &str) -> Result<FileId, EngineError>;

    /// Open an existing file.
    fn open_file(&mut self, name: &str) -> Result<FileId, EngineError>;

    /// Close a file handle.
    fn close_file(&mut self, file: FileId) -> Result<(), EngineError>;

    // -- dataspaces -------------------------------------------------------

    /// Create a simple dataspace with the given extent.
    fn create_space(&mut self, dims: &[u64]) -> Result<DataspaceId, EngineError>;

    /// Close a dataspace handle.
    fn close_space(&mut self, space: DataspaceId) -> Result<(), EngineError>;

    /// Current extent of a dataspace.
    fn space_dims(&self, space: DataspaceId) -> Result<Vec<u64>, EngineError>;

    /// Dimensionality of a dataspace.
    fn space_ndims(&self, space: DataspaceId) -> Result<usize, EngineError>;

    /// Apply a hyperslab selection to a dataspace.
    ///
    /// All four coordinate arrays must have the dataspace's rank.
    fn select_hyperslab(
        &mut self,
        space: DataspaceId,
        op: SelectOperator,
        offset: &[u64],
        stride: &[u64],
        count: &[u64],
        block: &[u64],
    ) -> Result<(), EngineError>;

    // -- property lists ---------------------------------------------------

    /// Create a property list of the given class.
    fn create_plist(&mut self, class: PlistClass) -> Result<PlistId, EngineError>;

    /// Close a property list handle.
    fn close_plist(&mut self, plist: PlistId) -> Result<(), EngineError>;

    // -- datasets ---------------------------------------------------------

    /// Create a dataset in `file` with the given cell type and dataspace.
    fn create_dataset(
        &mut self,
        file: FileId,
        name: &str,
        dtype: ScalarType,
        space: DataspaceId,
        plist: Option<PlistId>,
    ) -> Result<DatasetId, EngineError>;

    /// Open an existing dataset by name.
    fn open_dataset(&mut self, file: FileId, name: &str) -> Result<DatasetId, EngineError>;

    /// Close a dataset handle.
    fn close_dataset(&mut self, ds: DatasetId) -> Result<(), EngineError>;

    /// The cell type a dataset was declared with.
    fn dataset_type(&self, ds: DatasetId) -> Result<ScalarType, EngineError>;

    /// A fresh handle to the dataset's file-side dataspace.
    ///
    /// The caller owns the returned handle and must close it.
    fn dataset_space(&mut self, ds: DatasetId) -> Result<DataspaceId, EngineError>;

    /// Bytes of storage currently allocated for a dataset.
    fn dataset_storage_size(&self, ds: DatasetId) -> Result<u64, EngineError>;

    /// Allocation state of a dataset's storage.
    fn dataset_space_status(&self, ds: DatasetId) -> Result<SpaceStatus, EngineError>;

    /// Write a flat cell buffer into a dataset.
    ///
    /// `mem_space` describes the shape of `data` (a flat 1-D extent for
    /// marshalled writes); `file_space` is the target region, either the
    /// full declared dataspace or a dataspace carrying a selection.
    fn write_dataset(
        &mut self,
        ds: DatasetId,
        mem_space: FileSpace,
        file_space: FileSpace,
        dtype: ScalarType,
        data: &[u8],
    ) -> Result<(), EngineError>;

    /// Read a dataset's full contents as raw cell bytes.
    fn read_dataset(&mut self, ds: DatasetId) -> Result<Vec<u8>, EngineError>;
}
