use super::*;
use crate::{assert, debug_assert};
use core::ops::Range;

/// Symbolic view structure of sparse matrix in column format.
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
pub struct SymbolicSparseColMatRef<'a, I: Index> {
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
    pub(crate) col_ptr: &'a [I],
    pub(crate) row_ind: &'a [I],
}

impl<I: Index> Copy for SymbolicSparseColMatRef<'_, I> {}
impl<I: Index> Clone for SymbolicSparseColMatRef<'_, I> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I: Index> SymbolicSparseColMatRef<'a, I> {
    /// Creates a new symbolic matrix view after asserting its invariants.
    ///
    /// # Panics
    ///
    /// See type level documentation.
    #[inline]
    #[track_caller]
    pub fn new_checked(
        nrows: usize,
        ncols: usize,
        col_ptrs: &'a [I],
        row_indices: &'a [I],
    ) -> Self {
        assert!(all(
            ncols <= I::Signed::MAX.zx(),
            nrows <= I::Signed::MAX.zx(),
        ));
        assert!(col_ptrs.len() == ncols + 1);
        assert!(col_ptrs[0].zx() == 0);
        for &[c, c_next] in windows2(col_ptrs) {
            assert!(c <= c_next);
        }
        assert!(col_ptrs[ncols].zx() == row_indices.len());

        for &[c, c_next] in windows2(col_ptrs) {
            let row_indices = &row_indices[c.zx()..c_next.zx()];
            if !row_indices.is_empty() {
                let mut i_prev = row_indices[0];
                for &i in &row_indices[1..] {
                    assert!(i_prev < i);
                    i_prev = i;
                }
                assert!(i_prev.zx() < nrows);
            }
        }

        Self {
            nrows,
            ncols,
            col_ptr: col_ptrs,
            row_ind: row_indices,
        }
    }

    /// Creates a new symbolic matrix view without asserting its invariants.
    ///
    /// # Safety
    ///
    /// See type level documentation.
    #[inline(always)]
    #[track_caller]
    pub unsafe fn new_unchecked(
        nrows: usize,
        ncols: usize,
        col_ptrs: &'a [I],
        row_indices: &'a [I],
    ) -> Self {
        assert!(all(
            ncols <= I::Signed::MAX.zx(),
            nrows <= I::Signed::MAX.zx(),
        ));
        assert!(col_ptrs.len() == ncols + 1);
        debug_assert!(col_ptrs[ncols].zx() == row_indices.len());

        Self {
            nrows,
            ncols,
            col_ptr: col_ptrs,
            row_ind: row_indices,
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
    pub fn col_ptrs(&self) -> &'a [I] {
        self.col_ptr
    }

    /// Returns the row indices.
    #[inline]
    pub fn row_indices(&self) -> &'a [I] {
        self.row_ind
    }

    /// Returns the range that the column `j` occupies in `self.row_indices()`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn col_range(&self, j: usize) -> Range<usize> {
        assert!(j < self.ncols);
        self.col_ptr[j].zx()..self.col_ptr[j + 1].zx()
    }

    /// Returns the row indices of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn row_indices_of_col_raw(&self, j: usize) -> &'a [I] {
        &self.row_ind[self.col_range(j)]
    }

    /// Returns the row indices of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn row_indices_of_col(
        &self,
        j: usize,
    ) -> impl 'a + ExactSizeIterator + DoubleEndedIterator<Item = usize> {
        self.row_indices_of_col_raw(j).iter().map(
            #[inline(always)]
            |&i| i.zx(),
        )
    }

    /// Copies the current matrix into a newly allocated matrix.
    #[inline]
    pub fn to_owned(&self) -> Result<SymbolicSparseColMat<I>, SparseError> {
        let mut col_ptr = try_with_capacity(self.col_ptr.len())?;
        let mut row_ind = try_with_capacity(self.row_ind.len())?;
        col_ptr.extend_from_slice(self.col_ptr);
        row_ind.extend_from_slice(self.row_ind);
        Ok(unsafe { SymbolicSparseColMat::new_unchecked(self.nrows, self.ncols, col_ptr, row_ind) })
    }
}

impl<I: Index> core::fmt::Debug for SymbolicSparseColMatRef<'_, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut j = 0;
        f.debug_list()
            .entries(core::iter::from_fn(|| {
                while j < self.ncols {
                    let range = self.col_range(j);
                    if !range.is_empty() {
                        break;
                    }
                    j += 1;
                }
                if j == self.ncols {
                    return None;
                }
                let col = j;
                j += 1;
                Some((col, self.row_indices_of_col_raw(col)))
            }))
            .finish()
    }
}
