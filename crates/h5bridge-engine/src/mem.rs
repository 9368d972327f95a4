//! In-memory storage engine.
//!
//! `MemEngine` implements [`StorageEngine`] against plain maps: enough
//! behaviour to exercise the marshalling layer end-to-end (extent
//! bookkeeping, full-extent byte storage, recorded hyperslab selections)
//! and nothing more. Selection-targeted writes are journalled rather than
//! scattered, so tests can assert exactly what the engine was asked to do.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::engine::{FileSpace, StorageEngine};
use crate::error::EngineError;
use crate::types::{
    DataspaceId, DatasetId, FileId, PlistClass, PlistId, ScalarType, SelectOperator, SpaceStatus,
};

/// One hyperslab as applied to a dataspace handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSelection {
    pub op: SelectOperator,
    pub offset: Vec<u64>,
    pub stride: Vec<u64>,
    pub count: Vec<u64>,
    pub block: Vec<u64>,
}

/// One selection-targeted write, journalled in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct SlabWrite {
    /// The selection stack of the file dataspace at write time.
    pub selections: Vec<AppliedSelection>,
    /// The raw cell bytes that were written.
    pub data: Vec<u8>,
}

/// Stored dataset state, exposed for test assertions.
#[derive(Debug, Clone)]
pub struct StoredDataset {
    pub dtype: ScalarType,
    pub dims: Vec<u64>,
    /// Full-extent contents, if a full write has happened.
    pub data: Option<Vec<u8>>,
    /// Journal of selection-targeted writes.
    pub slab_writes: Vec<SlabWrite>,
}

impl StoredDataset {
    fn cell_count(&self) -> usize {
        self.dims.iter().product::<u64>() as usize
    }
}

struct SpaceObj {
    dims: Vec<u64>,
    selections: Vec<AppliedSelection>,
}

/// An in-memory [`StorageEngine`].
#[derive(Default)]
pub struct MemEngine {
    next_id: u64,
    created_files: HashSet<String>,
    open_files: HashMap<u64, String>,
    spaces: HashMap<u64, SpaceObj>,
    plists: HashMap<u64, PlistClass>,
    open_datasets: HashMap<u64, (String, String)>,
    store: HashMap<(String, String), StoredDataset>,
}

impl MemEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored state of a dataset, by file and dataset name.
    pub fn stored(&self, file: &str, name: &str) -> Option<&StoredDataset> {
        self.store.get(&(file.to_string(), name.to_string()))
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn file_name(&self, file: FileId) -> Result<&String, EngineError> {
        self.open_files.get(&file.0).ok_or(EngineError::InvalidHandle {
            kind: "file",
            id: file.0,
        })
    }

    fn space(&self, space: DataspaceId) -> Result<&SpaceObj, EngineError> {
        self.spaces.get(&space.0).ok_or(EngineError::InvalidHandle {
            kind: "dataspace",
            id: space.0,
        })
    }

    fn dataset_key(&self, ds: DatasetId) -> Result<&(String, String), EngineError> {
        self.open_datasets
            .get(&ds.0)
            .ok_or(EngineError::InvalidHandle {
                kind: "dataset",
                id: ds.0,
            })
    }

    fn dataset(&self, ds: DatasetId) -> Result<&StoredDataset, EngineError> {
        let key = self.dataset_key(ds)?;
        self.store
            .get(key)
            .ok_or_else(|| EngineError::NotFound(key.1.clone()))
    }
}

impl StorageEngine for MemEngine {
    fn create_file(&mut self, name: &str) -> Result<FileId, EngineError> {
        // Truncate semantics: drop any datasets belonging to a previous
        // incarnation of this file.
        if self.created_files.contains(name) {
            self.store.retain(|(f, _), _| f != name);
        }
        self.created_files.insert(name.to_string());
        let id = self.next();
        self.open_files.insert(id, name.to_string());
        debug!("mem: created file {name:?} as handle {id}");
        Ok(FileId(id))
    }

    fn open_file(&mut self, name: &str) -> Result<FileId, EngineError> {
        if !self.created_files.contains(name) {
            return Err(EngineError::NotFound(name.to_string()));
        }
        let id = self.next();
        self.open_files.insert(id, name.to_string());
        Ok(FileId(id))
    }

    fn close_file(&mut self, file: FileId) -> Result<(), EngineError> {
        self.open_files
            .remove(&file.0)
            .map(|_| ())
            .ok_or(EngineError::InvalidHandle {
                kind: "file",
                id: file.0,
            })
    }

    fn create_space(&mut self, dims: &[u64]) -> Result<DataspaceId, EngineError> {
        let id = self.next();
        self.spaces.insert(
            id,
            SpaceObj {
                dims: dims.to_vec(),
                selections: Vec::new(),
            },
        );
        Ok(DataspaceId(id))
    }

    fn close_space(&mut self, space: DataspaceId) -> Result<(), EngineError> {
        self.spaces
            .remove(&space.0)
            .map(|_| ())
            .ok_or(EngineError::InvalidHandle {
                kind: "dataspace",
                id: space.0,
            })
    }

    fn space_dims(&self, space: DataspaceId) -> Result<Vec<u64>, EngineError> {
        Ok(self.space(space)?.dims.clone())
    }

    fn space_ndims(&self, space: DataspaceId) -> Result<usize, EngineError> {
        Ok(self.space(space)?.dims.len())
    }

    fn select_hyperslab(
        &mut self,
        space: DataspaceId,
        op: SelectOperator,
        offset: &[u64],
        stride: &[u64],
        count: &[u64],
        block: &[u64],
    ) -> Result<(), EngineError> {
        let rank = self.space(space)?.dims.len();
        for coords in [offset, stride, count, block] {
            if coords.len() != rank {
                return Err(EngineError::SelectionRank {
                    space: rank,
                    selection: coords.len(),
                });
            }
        }
        let applied = AppliedSelection {
            op,
            offset: offset.to_vec(),
            stride: stride.to_vec(),
            count: count.to_vec(),
            block: block.to_vec(),
        };
        let obj = self
            .spaces
            .get_mut(&space.0)
            .ok_or(EngineError::InvalidHandle {
                kind: "dataspace",
                id: space.0,
            })?;
        match op {
            SelectOperator::Set => {
                obj.selections.clear();
                obj.selections.push(applied);
            }
            SelectOperator::Or => obj.selections.push(applied),
        }
        Ok(())
    }

    fn create_plist(&mut self, class: PlistClass) -> Result<PlistId, EngineError> {
        let id = self.next();
        self.plists.insert(id, class);
        Ok(PlistId(id))
    }

    fn close_plist(&mut self, plist: PlistId) -> Result<(), EngineError> {
        self.plists
            .remove(&plist.0)
            .map(|_| ())
            .ok_or(EngineError::InvalidHandle {
                kind: "property list",
                id: plist.0,
            })
    }

    fn create_dataset(
        &mut self,
        file: FileId,
        name: &str,
        dtype: ScalarType,
        space: DataspaceId,
        _plist: Option<PlistId>,
    ) -> Result<DatasetId, EngineError> {
        let file_name = self.file_name(file)?.clone();
        let dims = self.space(space)?.dims.clone();
        let key = (file_name, name.to_string());
        if self.store.contains_key(&key) {
            return Err(EngineError::AlreadyExists(name.to_string()));
        }
        debug!("mem: creating dataset {name:?} ({dtype:?}, dims {dims:?})");
        self.store.insert(
            key.clone(),
            StoredDataset {
                dtype,
                dims,
                data: None,
                slab_writes: Vec::new(),
            },
        );
        let id = self.next();
        self.open_datasets.insert(id, key);
        Ok(DatasetId(id))
    }

    fn open_dataset(&mut self, file: FileId, name: &str) -> Result<DatasetId, EngineError> {
        let file_name = self.file_name(file)?.clone();
        let key = (file_name, name.to_string());
        if !self.store.contains_key(&key) {
            return Err(EngineError::NotFound(name.to_string()));
        }
        let id = self.next();
        self.open_datasets.insert(id, key);
        Ok(DatasetId(id))
    }

    fn close_dataset(&mut self, ds: DatasetId) -> Result<(), EngineError> {
        self.open_datasets
            .remove(&ds.0)
            .map(|_| ())
            .ok_or(EngineError::InvalidHandle {
                kind: "dataset",
                id: ds.0,
            })
    }

    fn dataset_type(&self, ds: DatasetId) -> Result<ScalarType, EngineError> {
        Ok(self.dataset(ds)?.dtype)
    }

    fn dataset_space(&mut self, ds: DatasetId) -> Result<DataspaceId, EngineError> {
        let dims = self.dataset(ds)?.dims.clone();
        self.create_space(&dims)
    }

    fn dataset_storage_size(&self, ds: DatasetId) -> Result<u64, EngineError> {
        let stored = self.dataset(ds)?;
        let full = stored.data.as_ref().map_or(0, Vec::len);
        let slabs: usize = stored.slab_writes.iter().map(|w| w.data.len()).sum();
        Ok((full + slabs) as u64)
    }

    fn dataset_space_status(&self, ds: DatasetId) -> Result<SpaceStatus, EngineError> {
        let stored = self.dataset(ds)?;
        Ok(match (&stored.data, stored.slab_writes.is_empty()) {
            (Some(_), _) => SpaceStatus::Allocated,
            (None, false) => SpaceStatus::PartAllocated,
            (None, true) => SpaceStatus::NotAllocated,
        })
    }

    fn write_dataset(
        &mut self,
        ds: DatasetId,
        mem_space: FileSpace,
        file_space: FileSpace,
        dtype: ScalarType,
        data: &[u8],
    ) -> Result<(), EngineError> {
        // The memory dataspace, when given, must describe the buffer.
        if let FileSpace::Space(mem) = mem_space {
            let mem_cells: u64 = self.space(mem)?.dims.iter().product();
            let expected = mem_cells as usize * dtype.byte_size();
            if expected != data.len() {
                return Err(EngineError::SizeMismatch {
                    expected,
                    got: data.len(),
                });
            }
        }

        // Snapshot the file-side selection before borrowing the store.
        let selections = match file_space {
            FileSpace::All => Vec::new(),
            FileSpace::Space(space) => self.space(space)?.selections.clone(),
        };

        let key = self.dataset_key(ds)?.clone();
        let stored = self
            .store
            .get_mut(&key)
            .ok_or_else(|| EngineError::NotFound(key.1.clone()))?;

        if dtype != stored.dtype {
            return Err(EngineError::Unsupported("cell type conversion"));
        }

        if selections.is_empty() {
            // A dataspace without a selection targets the full extent.
            let expected = stored.cell_count() * stored.dtype.byte_size();
            if expected != data.len() {
                return Err(EngineError::SizeMismatch {
                    expected,
                    got: data.len(),
                });
            }
            stored.data = Some(data.to_vec());
        } else {
            stored.slab_writes.push(SlabWrite {
                selections,
                data: data.to_vec(),
            });
        }
        Ok(())
    }

    fn read_dataset(&mut self, ds: DatasetId) -> Result<Vec<u8>, EngineError> {
        let stored = self.dataset(ds)?;
        Ok(match &stored.data {
            Some(bytes) => bytes.clone(),
            // Unwritten datasets read back as the zero fill value.
            None => vec![0; stored.cell_count() * stored.dtype.byte_size()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_dataset(dims: &[u64], dtype: ScalarType) -> (MemEngine, DatasetId) {
        let mut eng = MemEngine::new();
        let file = eng.create_file("test.h5").unwrap();
        let space = eng.create_space(dims).unwrap();
        let ds = eng.create_dataset(file, "data", dtype, space, None).unwrap();
        eng.close_space(space).unwrap();
        (eng, ds)
    }

    #[test]
    fn full_write_then_read() {
        let (mut eng, ds) = engine_with_dataset(&[4], ScalarType::Int32);
        let bytes: Vec<u8> = [1i32, 2, 3, 4]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        eng.write_dataset(ds, FileSpace::All, FileSpace::All, ScalarType::Int32, &bytes)
            .unwrap();
        assert_eq!(eng.read_dataset(ds).unwrap(), bytes);
        assert_eq!(eng.dataset_storage_size(ds).unwrap(), 16);
        assert_eq!(eng.dataset_space_status(ds).unwrap(), SpaceStatus::Allocated);
    }

    #[test]
    fn unwritten_dataset_reads_as_fill() {
        let (mut eng, ds) = engine_with_dataset(&[2, 3], ScalarType::Float64);
        assert_eq!(eng.dataset_space_status(ds).unwrap(), SpaceStatus::NotAllocated);
        assert_eq!(eng.read_dataset(ds).unwrap(), vec![0; 48]);
    }

    #[test]
    fn full_write_size_is_checked() {
        let (mut eng, ds) = engine_with_dataset(&[4], ScalarType::Int32);
        let err = eng
            .write_dataset(ds, FileSpace::All, FileSpace::All, ScalarType::Int32, &[0; 12])
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::SizeMismatch {
                expected: 16,
                got: 12
            }
        );
    }

    #[test]
    fn hyperslab_rank_is_checked() {
        let mut eng = MemEngine::new();
        let space = eng.create_space(&[10, 10]).unwrap();
        let err = eng
            .select_hyperslab(space, SelectOperator::Set, &[0], &[1], &[2], &[1])
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::SelectionRank {
                space: 2,
                selection: 1
            }
        );
    }

    #[test]
    fn selection_write_is_journalled() {
        let (mut eng, ds) = engine_with_dataset(&[10], ScalarType::Int32);
        let space = eng.dataset_space(ds).unwrap();
        eng.select_hyperslab(space, SelectOperator::Set, &[2], &[1], &[2], &[1])
            .unwrap();
        let mem = eng.create_space(&[2]).unwrap();
        let bytes: Vec<u8> = [7i32, 8].iter().flat_map(|v| v.to_ne_bytes()).collect();
        eng.write_dataset(
            ds,
            FileSpace::Space(mem),
            FileSpace::Space(space),
            ScalarType::Int32,
            &bytes,
        )
        .unwrap();
        eng.close_space(mem).unwrap();
        eng.close_space(space).unwrap();

        let stored = eng.stored("test.h5", "data").unwrap();
        assert_eq!(stored.slab_writes.len(), 1);
        assert_eq!(stored.slab_writes[0].data, bytes);
        assert_eq!(stored.slab_writes[0].selections[0].offset, vec![2]);
        assert_eq!(eng.dataset_space_status(ds).unwrap(), SpaceStatus::PartAllocated);
    }

    #[test]
    fn space_queries() {
        let mut eng = MemEngine::new();
        let space = eng.create_space(&[4, 6]).unwrap();
        assert_eq!(eng.space_dims(space).unwrap(), vec![4, 6]);
        assert_eq!(eng.space_ndims(space).unwrap(), 2);
        eng.close_space(space).unwrap();
    }

    #[test]
    fn plist_lifecycle() {
        let mut eng = MemEngine::new();
        let file = eng.create_file("p.h5").unwrap();
        let space = eng.create_space(&[1]).unwrap();
        let plist = eng.create_plist(PlistClass::DatasetCreate).unwrap();
        eng.create_dataset(file, "d", ScalarType::Int32, space, Some(plist))
            .unwrap();
        eng.close_plist(plist).unwrap();
        assert!(matches!(
            eng.close_plist(plist),
            Err(EngineError::InvalidHandle { .. })
        ));
    }

    #[test]
    fn closed_handles_are_invalid() {
        let (mut eng, ds) = engine_with_dataset(&[1], ScalarType::Int32);
        eng.close_dataset(ds).unwrap();
        assert!(matches!(
            eng.close_dataset(ds),
            Err(EngineError::InvalidHandle { kind: "dataset", .. })
        ));
    }

    #[test]
    fn duplicate_dataset_name_is_rejected() {
        let mut eng = MemEngine::new();
        let file = eng.create_file("dup.h5").unwrap();
        let space = eng.create_space(&[1]).unwrap();
        eng.create_dataset(file, "d", ScalarType::Int32, space, None)
            .unwrap();
        let err = eng
            .create_dataset(file, "d", ScalarType::Int32, space, None)
            .unwrap_err();
        assert_eq!(err, EngineError::AlreadyExists("d".to_string()));
    }
}
