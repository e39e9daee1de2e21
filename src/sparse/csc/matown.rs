use super::*;
use crate::assert;

/// Sparse matrix in column-major format.
#[derive(Clone)]
pub struct SparseColMat<I: Index, E: ComplexField> {
    pub(crate) symbolic: SymbolicSparseColMat<I>,
    pub(crate) values: Vec<E>,
}

impl<I: Index, E: ComplexField> SparseColMat<I, E> {
    /// Creates a new sparse matrix.
    ///
    /// # Panics
    ///
    /// Panics if the length of `values` is not equal to the length of
    /// `symbolic.row_indices()`.
    #[inline]
    #[track_caller]
    pub fn new(symbolic: SymbolicSparseColMat<I>, values: Vec<E>) -> Self {
        assert!(symbolic.row_indices().len() == values.len());
        Self { symbolic, values }
    }

    /// Creates an `nrows × ncols` matrix with no stored entries.
    ///
    /// # Panics
    ///
    /// Panics if either dimension exceeds `I::Signed::MAX`.
    #[inline]
    #[track_caller]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            symbolic: SymbolicSparseColMat::new_empty(nrows, ncols),
            values: Vec::new(),
        }
    }

    /// Returns the number of rows of the matrix.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.symbolic.nrows
    }
    /// Returns the number of columns of the matrix.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.symbolic.ncols
    }

    /// Returns the number of rows and columns of the matrix.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Returns a view over `self`.
    #[inline]
    pub fn as_ref(&self) -> SparseColMatRef<'_, I, E> {
        SparseColMatRef {
            symbolic: self.symbolic.as_ref(),
            values: &self.values,
        }
    }

    /// Returns the symbolic structure of the matrix.
    #[inline]
    pub fn symbolic(&self) -> SymbolicSparseColMatRef<'_, I> {
        self.symbolic.as_ref()
    }

    /// Decomposes the matrix into the symbolic part and the numerical values.
    #[inline]
    pub fn into_parts(self) -> (SymbolicSparseColMat<I>, Vec<E>) {
        (self.symbolic, self.values)
    }

    /// Returns the number of stored entries.
    #[inline]
    pub fn compute_nnz(&self) -> usize {
        self.symbolic.compute_nnz()
    }

    /// Returns the column pointers.
    #[inline]
    pub fn col_ptrs(&self) -> &[I] {
        self.symbolic.col_ptrs()
    }

    /// Returns the row indices.
    #[inline]
    pub fn row_indices(&self) -> &[I] {
        self.symbolic.row_indices()
    }

    /// Returns the numerical values of the matrix.
    #[inline]
    pub fn values(&self) -> &[E] {
        &self.values
    }

    /// Returns the range that the column `j` occupies in `self.row_indices()`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn col_range(&self, j: usize) -> core::ops::Range<usize> {
        self.symbolic.col_range(j)
    }

    /// Returns the row indices of column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn row_indices_of_col_raw(&self, j: usize) -> &[I] {
        self.symbolic.row_indices_of_col_raw(j)
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
    ) -> impl '_ + ExactSizeIterator + DoubleEndedIterator<Item = usize> {
        self.as_ref().row_indices_of_col(j)
    }

    /// Returns the numerical values of column `j` of the matrix.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn values_of_col(&self, j: usize) -> &[E] {
        self.as_ref().values_of_col(j)
    }

    /// Returns an iterator over the stored entries, in column-major order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, I, E> {
        self.as_ref().iter()
    }

    /// Returns a reference to the value at the given index, or None if the symbolic structure
    /// doesn't contain it.
    ///
    /// # Panics
    /// Panics if `row >= self.nrows()`.
    /// Panics if `col >= self.ncols()`.
    #[track_caller]
    pub fn get(&self, row: usize, col: usize) -> Option<&E> {
        self.as_ref().get(row, col)
    }

    /// Returns the value at the given index, or zero if it is not stored.
    ///
    /// # Panics
    /// Panics if `row >= self.nrows()`.
    /// Panics if `col >= self.ncols()`.
    #[track_caller]
    pub fn read(&self, row: usize, col: usize) -> E {
        self.as_ref().read(row, col)
    }

    /// Create a new matrix from triplets `(row, col, value)`.
    ///
    /// Values sharing a position are summed in input order. Positions whose sum is exactly zero
    /// are not stored.
    #[track_caller]
    pub fn try_new_from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, E)],
    ) -> Result<Self, CreationError> {
        check_index_range::<I>(nrows)?;
        check_index_range::<I>(ncols)?;

        for &(row, col, _) in triplets {
            if row >= nrows || col >= ncols {
                return Err(CreationError::OutOfBounds { row, col });
            }
        }

        let mut argsort = try_with_capacity::<usize>(triplets.len())?;
        argsort.extend(0..triplets.len());
        // stable, so duplicates keep their input order
        argsort.sort_by_key(|&k| {
            let (row, col, _) = triplets[k];
            Position { col, row }
        });

        let mut out = CscAssembler::try_with_capacity(nrows, ncols, triplets.len())?;

        let mut pos = 0usize;
        while pos < argsort.len() {
            let (row, col, mut value) = triplets[argsort[pos]];
            pos += 1;
            while pos < argsort.len() {
                let (next_row, next_col, next_value) = triplets[argsort[pos]];
                if (next_row, next_col) != (row, col) {
                    break;
                }
                value = value.sp_add(next_value);
                pos += 1;
            }
            out.push_nonzero(row, col, value);
        }

        Ok(out.finalize()?)
    }

    /// Changes the shape of the matrix to `nrows × ncols`, keeping every stored entry at the same
    /// column-major linear position.
    ///
    /// The row indices are rewritten in place and the column pointers are rebuilt.
    ///
    /// # Panics
    ///
    /// Panics if `nrows * ncols` differs from `self.nrows() * self.ncols()`.
    #[track_caller]
    pub fn reshape(&mut self, nrows: usize, ncols: usize) -> Result<(), SparseError> {
        let n_elem = self
            .nrows()
            .checked_mul(self.ncols())
            .ok_or(SparseError::IndexOverflow)?;
        let new_n_elem = nrows
            .checked_mul(ncols)
            .ok_or(SparseError::IndexOverflow)?;
        assert!(n_elem == new_n_elem);
        check_index_range::<I>(nrows)?;
        check_index_range::<I>(ncols)?;

        if (nrows, ncols) == self.shape() {
            return Ok(());
        }

        let mut new_col_ptr = try_zeroed::<I>(ncols + 1)?;

        let old_nrows = self.nrows();
        let SymbolicSparseColMat {
            col_ptr, row_ind, ..
        } = &mut self.symbolic;

        // the linear index of a stored entry is below n_elem, so it fits in usize. an empty
        // matrix has no entries, which keeps the divisions below away from nrows == 0
        for (j, &[start, end]) in windows2(&col_ptr[..]).enumerate() {
            for i in &mut row_ind[start.zx()..end.zx()] {
                let linear = i.zx() + j * old_nrows;
                *i = I::truncate(linear % nrows);
                new_col_ptr[linear / nrows + 1] += I::truncate(1);
            }
        }

        // the counts sum to nnz, which already fits in I
        for j in 0..ncols {
            let prev = new_col_ptr[j];
            new_col_ptr[j + 1] += prev;
        }

        self.symbolic.nrows = nrows;
        self.symbolic.ncols = ncols;
        self.symbolic.col_ptr = new_col_ptr;

        Ok(())
    }
}

impl<I: Index, E: ComplexField> core::fmt::Debug for SparseColMat<I, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.as_ref().fmt(f)
    }
}
