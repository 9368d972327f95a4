//! Storage engine boundary for the `h5bridge` marshalling layer.
//!
//! This crate defines the opaque-handle surface an HDF5-like array storage
//! engine exposes — files, datasets, dataspaces, property lists, hyperslab
//! selections, typed-buffer I/O — as the [`StorageEngine`] trait, plus an
//! in-memory implementation ([`MemEngine`]) used by tests and benches.
//!
//! The marshalling layer in the `h5bridge` crate is generic over
//! [`StorageEngine`]; a binding to a real engine implements this trait and
//! gets the whole codec layer for free.

pub mod engine;
pub mod error;
pub mod mem;
pub mod types;

pub use engine::{FileSpace, StorageEngine};
pub use error::EngineError;
pub use mem::{AppliedSelection, MemEngine, SlabWrite, StoredDataset};
pub use types::{
    DataspaceId, DatasetId, FileId, PlistClass, PlistId, ScalarType, SelectOperator, SpaceStatus,
    TypeClass,
};
