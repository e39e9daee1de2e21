//! Kernels that write a freshly built matrix push its entries in column-major order into a
//! [`CscAssembler`], which owns storage reserved up front for a known bound on the entry count.
//! Column pointers are counted while pushing and prefix-summed once at the end.

use super::*;
use crate::assert;

/// Builder for a [`SparseColMat`] whose entries arrive in strictly increasing column-major order.
pub struct CscAssembler<I: Index, E: ComplexField> {
    nrows: usize,
    ncols: usize,
    // col_ptr[j + 1] holds the number of entries pushed into column j until `finalize`
    col_ptr: Vec<I>,
    row_ind: Vec<I>,
    values: Vec<E>,
    last: Option<Position>,
}

impl<I: Index, E: ComplexField> CscAssembler<I, E> {
    /// Creates an assembler for an `nrows × ncols` matrix, reserving room for `bound` entries.
    ///
    /// The reservation is never shrunk, so `bound` may be a worst-case estimate.
    pub fn try_with_capacity(
        nrows: usize,
        ncols: usize,
        bound: usize,
    ) -> Result<Self, SparseError> {
        check_index_range::<I>(nrows)?;
        check_index_range::<I>(ncols)?;
        Ok(Self {
            nrows,
            ncols,
            col_ptr: try_zeroed(ncols + 1)?,
            row_ind: try_with_capacity(bound)?,
            values: try_with_capacity(bound)?,
            last: None,
        })
    }

    /// Returns the number of rows of the matrix being built.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }
    /// Returns the number of columns of the matrix being built.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns the number of entries pushed so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.row_ind.len()
    }

    /// Returns true if no entries were pushed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_ind.is_empty()
    }

    /// Appends an entry, which may be zero.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is out of bounds, or if it does not come strictly after the
    /// previously pushed position in column-major order.
    #[inline]
    #[track_caller]
    pub fn push(&mut self, row: usize, col: usize, value: E) {
        assert!(all(row < self.nrows, col < self.ncols));
        let pos = Position { col, row };
        if let Some(last) = self.last {
            assert!(last < pos);
        }
        self.last = Some(pos);

        self.row_ind.push(I::truncate(row));
        self.values.push(value);
        // at most nrows entries per column, and nrows fits in I
        self.col_ptr[col + 1] += I::truncate(1);
    }

    /// Appends an entry unless `value` is exactly zero. Returns whether it was stored.
    ///
    /// # Panics
    ///
    /// See [`CscAssembler::push`].
    #[inline]
    #[track_caller]
    pub fn push_nonzero(&mut self, row: usize, col: usize, value: E) -> bool {
        if value.sp_is_zero() {
            false
        } else {
            self.push(row, col, value);
            true
        }
    }

    /// Builds the matrix out of the pushed entries.
    pub fn finalize(self) -> Result<SparseColMat<I, E>, SparseError> {
        let Self {
            nrows,
            ncols,
            mut col_ptr,
            row_ind,
            values,
            ..
        } = self;

        check_index_range::<I>(row_ind.len())?;

        for j in 0..ncols {
            let prev = col_ptr[j];
            col_ptr[j + 1] += prev;
        }

        // col_ptr is a prefix sum of the column counts, and rows were pushed strictly increasing
        // within each column
        Ok(unsafe {
            SparseColMat::new(
                SymbolicSparseColMat::new_unchecked(nrows, ncols, col_ptr, row_ind),
                values,
            )
        })
    }
}
