//! Sparse matrix data structures and the kernels that change their structure.
//!
//! Matrices are stored in sparse column-oriented format. This format represents each column of
//! the matrix by storing the row indices of its non-zero elements, as well as their values.
//!
//! The indices and the values are each stored in a contiguous slice. In order to specify where
//! each column starts and ends, a slice of size `ncols + 1` stores the start of each column, with
//! the last element being equal to the total number of non-zeros.
//!
//! # Example
//!
//! Consider the 4-by-5 matrix:
//! ```notcode
//! [[10.0, 0.0, 12.0, -1.0, 13.0]
//!  [ 0.0, 0.0, 25.0, -2.0,  0.0]
//!  [ 1.0, 0.0,  0.0,  0.0,  0.0]
//!  [ 4.0, 0.0,  0.0,  0.0,  5.0]]
//! ```
//!
//! The matrix is stored as follows:
//! ```notcode
//! column pointers:  0 |  3 |  3 |  5 |  7 |  9
//!
//! row indices:    0 |    2 |    3 |    0 |    1 |    0 |    1 |    0 |    3
//! values     : 10.0 |  1.0 |  4.0 | 12.0 | 25.0 | -1.0 | -2.0 | 13.0 |  5.0
//! ```
//!
//! Matrices produced by this crate never store an explicit zero, and their row indices are
//! strictly increasing within each column.

use super::*;
use core::iter::zip;

mod mem {
    #[inline]
    pub fn fill_zero<I: bytemuck::Zeroable>(slice: &mut [I]) {
        let len = slice.len();
        unsafe { core::ptr::write_bytes(slice.as_mut_ptr(), 0u8, len) }
    }
}

#[inline(always)]
#[doc(hidden)]
pub fn windows2<I>(slice: &[I]) -> impl DoubleEndedIterator<Item = &[I; 2]> {
    slice
        .windows(2)
        .map(|window| unsafe { &*(window.as_ptr() as *const [I; 2]) })
}

/// Errors that can occur in sparse algorithms.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SparseError {
    /// An index exceeding the maximum value (`I::Signed::MAX` for a given index type `I`).
    #[error("index overflow")]
    IndexOverflow,
    /// Memory allocation failed.
    #[error("out of memory")]
    OutOfMemory,
    /// The shapes of two operands disagree where they are required to be equal.
    #[error("dimension mismatch: {lhs:?} and {rhs:?}")]
    DimensionMismatch {
        /// Shape of the left hand side operand.
        lhs: (usize, usize),
        /// Shape of the right hand side operand.
        rhs: (usize, usize),
    },
    /// A square matrix was required.
    #[error("given matrix must be square sized, found {nrows}x{ncols}")]
    NotSquare {
        /// Row count of the operand.
        nrows: usize,
        /// Column count of the operand.
        ncols: usize,
    },
    /// A dimension selector other than `0` (columns) or `1` (rows).
    #[error("dim must be 0 or 1, found {dim}")]
    InvalidDim {
        /// The rejected selector.
        dim: usize,
    },
}

/// Errors that can occur when creating a sparse matrix from indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum CreationError {
    /// Generic error (allocation or index overflow).
    #[error(transparent)]
    Generic(#[from] SparseError),
    /// Matrix index out-of-bounds error.
    #[error("index ({row}, {col}) is out of bounds")]
    OutOfBounds {
        /// Row of the out-of-bounds index.
        row: usize,
        /// Column of the out-of-bounds index.
        col: usize,
    },
}

#[inline]
#[track_caller]
fn try_zeroed<I: bytemuck::Pod>(n: usize) -> Result<Vec<I>, SparseError> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).map_err(|_| SparseError::OutOfMemory)?;
    unsafe {
        core::ptr::write_bytes::<I>(v.as_mut_ptr(), 0u8, n);
        v.set_len(n);
    }
    Ok(v)
}

#[inline]
#[track_caller]
fn try_with_capacity<T>(n: usize) -> Result<Vec<T>, SparseError> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).map_err(|_| SparseError::OutOfMemory)?;
    Ok(v)
}

#[inline]
fn check_index_range<I: Index>(n: usize) -> Result<(), SparseError> {
    if n > I::Signed::MAX.zx() {
        Err(SparseError::IndexOverflow)
    } else {
        Ok(())
    }
}

mod csc;
mod iter;

pub use csc::*;
pub use iter::{Entry, Iter, Position};

/// Incremental construction of column-major sparse matrices.
pub mod assemble;
pub use assemble::CscAssembler;

/// Merging a rewritten submatrix back into its parent matrix.
pub mod merge;
/// Symmetric and hermitian matrices from a single triangle.
pub mod symmat;
/// Useful sparse matrix primitives.
pub mod utils;
/// Flattening a sparse matrix into a column or row vector.
pub mod vectorise;

impl<I: Index, E: ComplexField> matrixcompare_core::Matrix<E> for SparseColMatRef<'_, I, E> {
    #[inline]
    fn rows(&self) -> usize {
        self.nrows()
    }
    #[inline]
    fn cols(&self) -> usize {
        self.ncols()
    }
    #[inline]
    fn access(&self) -> matrixcompare_core::Access<'_, E> {
        matrixcompare_core::Access::Sparse(self)
    }
}

impl<I: Index, E: ComplexField> matrixcompare_core::SparseAccess<E> for SparseColMatRef<'_, I, E> {
    #[inline]
    fn nnz(&self) -> usize {
        self.compute_nnz()
    }

    #[inline]
    fn fetch_triplets(&self) -> Vec<(usize, usize, E)> {
        let mut triplets = Vec::new();
        for j in 0..self.ncols() {
            for (i, &val) in zip(self.row_indices_of_col(j), self.values_of_col(j)) {
                triplets.push((i, j, val))
            }
        }
        triplets
    }
}

impl<I: Index, E: ComplexField> matrixcompare_core::Matrix<E> for SparseColMat<I, E> {
    #[inline]
    fn rows(&self) -> usize {
        self.nrows()
    }
    #[inline]
    fn cols(&self) -> usize {
        self.ncols()
    }
    #[inline]
    fn access(&self) -> matrixcompare_core::Access<'_, E> {
        matrixcompare_core::Access::Sparse(self)
    }
}

impl<I: Index, E: ComplexField> matrixcompare_core::SparseAccess<E> for SparseColMat<I, E> {
    #[inline]
    fn nnz(&self) -> usize {
        self.compute_nnz()
    }

    #[inline]
    fn fetch_triplets(&self) -> Vec<(usize, usize, E)> {
        self.as_ref().fetch_triplets()
    }
}
