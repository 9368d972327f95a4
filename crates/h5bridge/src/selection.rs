//! Hyperslab selection descriptors.
//!
//! A [`Hyperslab`] pairs a selection operator with four rank-matched
//! coordinate sets. Rank-1 selections may be written with bare scalars
//! instead of one-element arrays; both spell the same selection.
//!
//! # Example
//!
//! ```
//! use h5bridge::{Hyperslab, SelectOperator};
//!
//! // Every other element of 5..11, as scalars...
//! let a = Hyperslab::new(SelectOperator::Set, 5u64, 2u64, 3u64, 1u64).unwrap();
//! // ...and as rank-1 arrays.
//! let b = Hyperslab::new(SelectOperator::Set, [5u64], [2u64], [3u64], [1u64]).unwrap();
//! assert_eq!(a, b);
//! ```

pub use h5bridge_engine::SelectOperator;

use crate::error::Error;

/// Coordinate input for one hyperslab field: a bare scalar (rank 1) or an
/// array of per-dimension values.
pub trait IntoCoords {
    fn into_coords(self) -> Vec<u64>;
}

impl IntoCoords for u64 {
    fn into_coords(self) -> Vec<u64> {
        vec![self]
    }
}

impl IntoCoords for Vec<u64> {
    fn into_coords(self) -> Vec<u64> {
        self
    }
}

impl IntoCoords for &[u64] {
    fn into_coords(self) -> Vec<u64> {
        self.to_vec()
    }
}

impl<const N: usize> IntoCoords for [u64; N] {
    fn into_coords(self) -> Vec<u64> {
        self.to_vec()
    }
}

/// A rank-matched hyperslab region of a file-side dataspace.
///
/// For each dimension `d`: `offset[d]` is the first cell, `stride[d]` the
/// step between blocks, `count[d]` the number of blocks, and `block[d]`
/// the cells per block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperslab {
    op: SelectOperator,
    offset: Vec<u64>,
    stride: Vec<u64>,
    count: Vec<u64>,
    block: Vec<u64>,
}

impl Hyperslab {
    /// Build a hyperslab, validating that all four coordinate sets share
    /// the offset's rank.
    ///
    /// A rank mismatch is [`Error::RankMismatch`]; coordinate sets built
    /// before the mismatch are dropped with the error.
    pub fn new(
        op: SelectOperator,
        offset: impl IntoCoords,
        stride: impl IntoCoords,
        count: impl IntoCoords,
        block: impl IntoCoords,
    ) -> Result<Hyperslab, Error> {
        let offset = offset.into_coords();
        if offset.is_empty() {
            return Err(Error::InvalidInput("selection offset has rank zero"));
        }
        let rank = offset.len();
        let stride = ranked("stride", stride, rank)?;
        let count = ranked("count", count, rank)?;
        let block = ranked("block", block, rank)?;
        Ok(Hyperslab {
            op,
            offset,
            stride,
            count,
            block,
        })
    }

    /// The selection operator.
    pub fn op(&self) -> SelectOperator {
        self.op
    }

    /// Rank shared by all four coordinate sets.
    pub fn rank(&self) -> usize {
        self.offset.len()
    }

    pub fn offset(&self) -> &[u64] {
        &self.offset
    }

    pub fn stride(&self) -> &[u64] {
        &self.stride
    }

    pub fn count(&self) -> &[u64] {
        &self.count
    }

    pub fn block(&self) -> &[u64] {
        &self.block
    }

    /// Number of cells the selection covers, `Π count[d] * block[d]`.
    pub fn cell_count(&self) -> u64 {
        self.count
            .iter()
            .zip(&self.block)
            .map(|(&c, &b)| c * b)
            .product()
    }
}

fn ranked(field: &'static str, coords: impl IntoCoords, rank: usize) -> Result<Vec<u64>, Error> {
    let coords = coords.into_coords();
    if coords.len() == rank {
        Ok(coords)
    } else {
        Err(Error::RankMismatch {
            field,
            expected: rank,
            got: coords.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_array_forms_agree() {
        let scalars = Hyperslab::new(SelectOperator::Set, 5u64, 1u64, 3u64, 1u64).unwrap();
        let arrays = Hyperslab::new(
            SelectOperator::Set,
            vec![5u64],
            vec![1u64],
            vec![3u64],
            vec![1u64],
        )
        .unwrap();
        assert_eq!(scalars, arrays);
        assert_eq!(scalars.rank(), 1);
        assert_eq!(scalars.cell_count(), 3);
    }

    #[test]
    fn two_dimensional_selection() {
        let slab = Hyperslab::new(
            SelectOperator::Or,
            [0u64, 4],
            [1u64, 1],
            [2u64, 3],
            [1u64, 2],
        )
        .unwrap();
        assert_eq!(slab.rank(), 2);
        assert_eq!(slab.op(), SelectOperator::Or);
        assert_eq!(slab.cell_count(), 12); // (2*1) * (3*2)
    }

    #[test]
    fn rank_mismatch_names_the_field() {
        let err = Hyperslab::new(SelectOperator::Set, [0u64, 0], [1u64], [2u64, 2], [1u64, 1])
            .unwrap_err();
        assert_eq!(
            err,
            Error::RankMismatch {
                field: "stride",
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn zero_rank_offset_is_invalid() {
        let err = Hyperslab::new(
            SelectOperator::Set,
            Vec::<u64>::new(),
            Vec::<u64>::new(),
            Vec::<u64>::new(),
            Vec::<u64>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
