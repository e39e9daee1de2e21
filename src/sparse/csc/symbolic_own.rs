use super::*;
use crate::assert;

/// Symbolic structure of sparse matrix in column format.
///
/// Requires:
/// * `nrows <= I::Signed::MAX` (always checked)
/// * `ncols <= I::Signed::MAX` (always checked)
/// * `col_ptrs` has length `ncols + 1` (always checked)
/// * `col_ptrs[0] == 0`
/// * `col_ptrs` is non-decreasing
/// * `col_ptrs[ncols]` is equal to the length of `row_indices` (always checked)
/// * elements of `row_indices[col_ptrs[j]..col_ptrs[j + 1]]` are less than `nrows`
/// * within each column, row indices are strictly increasing.
#[derive(Clone)]
pub struct SymbolicSparseColMat<I: Index> {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) col_ptr: Vec<I>,
    pub(crate) row_ind: Vec<I>,
}

impl<I: Index> SymbolicSparseColMat<I> {
    /// Creates a new symbolic matrix after asserting its invariants.
    ///
    /// # Panics
    ///
    /// See type level documentation.
    #[inline]
    #[track_caller]
    pub fn new_checked(
        nrows: usize,
        ncols: usize,
        col_ptrs: Vec<I>,
        row_indices: Vec<I>,
    ) -> Self {
        SymbolicSparseColMatRef::new_checked(nrows, ncols, &col_ptrs, &row_indices);

        Self {
            nrows,
            ncols,
            col_ptr: col_ptrs,
            row_ind: row_indices,
        }
    }

    /// Creates a new symbolic matrix without asserting its invariants.
    ///
    /// # Safety
    ///
    /// See type level documentation.
    #[inline(always)]
    #[track_caller]
    pub unsafe fn new_unchecked(
        nrows: usize,
        ncols: usize,
        col_ptrs: Vec<I>,
        row_indices: Vec<I>,
    ) -> Self {
        SymbolicSparseColMatRef::new_unchecked(nrows, ncols, &col_ptrs, &row_indices);

        Self {
            nrows,
            ncols,
            col_ptr: col_ptrs,
            row_ind: row_indices,
        }
    }

    /// Creates the structure of an `nrows × ncols` matrix with no stored entries.
    ///
    /// # Panics
    ///
    /// Panics if either dimension exceeds `I::Signed::MAX`.
    #[inline]
    #[track_caller]
    pub fn new_empty(nrows: usize, ncols: usize) -> Self {
        assert!(all(
            ncols <= I::Signed::MAX.zx(),
            nrows <= I::Signed::MAX.zx(),
        ));
        Self {
            nrows,
            ncols,
            col_ptr: vec![I::truncate(0); ncols + 1],
            row_ind: Vec::new(),
        }
    }

    /// Returns the components of the matrix in the order:
    /// - row count,
    /// - column count,
    /// - column pointers,
    /// - row indices.
    #[inline]
    pub fn into_parts(self) -> (usize, usize, Vec<I>, Vec<I>) {
        (self.nrows, self.ncols, self.col_ptr, self.row_ind)
    }

    /// Returns a view over the symbolic structure of `self`.
    #[inline]
    pub fn as_ref(&self) -> SymbolicSparseColMatRef<'_, I> {
        SymbolicSparseColMatRef {
            nrows: self.nrows,
            ncols: self.ncols,
            col_ptr: &self.col_ptr,
            row_ind: &self.row_ind,
        }
    }

    /// Returns the number of rows of the matrix.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }
    /// Returns the number of columns of the matrix.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns the number of rows and columns of the matrix.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Returns the number of symbolic non-zeros in the matrix.
    #[inline]
    pub fn compute_nnz(&self) -> usize {
        self.row_ind.len()
    }

    /// Returns the column pointers.
    #[inline]
    pub fn col_ptrs(&self) -> &[I] {
        &self.col_ptr
    }

    /// Returns the row indices.
    #[inline]
    pub fn row_indices(&self) -> &[I] {
        &self.row_ind
    }

    /// Returns the row indices of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn row_indices_of_col_raw(&self, j: usize) -> &[I] {
        self.as_ref().row_indices_of_col_raw(j)
    }

    /// Returns the range that the column `j` occupies in `self.row_indices()`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn col_range(&self, j: usize) -> core::ops::Range<usize> {
        self.as_ref().col_range(j)
    }
}

impl<I: Index> core::fmt::Debug for SymbolicSparseColMat<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.as_ref().fmt(f)
    }
}
