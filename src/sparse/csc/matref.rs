use super::*;
use crate::assert;
use dyn_stack::{GlobalPodBuffer, PodStack};

/// Sparse matrix view in column-major format.
pub struct SparseColMatRef<'a, I: Index, E: ComplexField> {
    pub(crate) symbolic: SymbolicSparseColMatRef<'a, I>,
    pub(crate) values: &'a [E],
}

impl<I: Index, E: ComplexField> Copy for SparseColMatRef<'_, I, E> {}
impl<I: Index, E: ComplexField> Clone for SparseColMatRef<'_, I, E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, I: Index, E: ComplexField> SparseColMatRef<'a, I, E> {
    /// Creates a new sparse matrix view.
    ///
    /// # Panics
    ///
    /// Panics if the length of `values` is not equal to the length of
    /// `symbolic.row_indices()`.
    #[inline]
    #[track_caller]
    pub fn new(symbolic: SymbolicSparseColMatRef<'a, I>, values: &'a [E]) -> Self {
        assert!(symbolic.row_indices().len() == values.len());
        Self { symbolic, values }
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
        *self
    }

    /// Returns the symbolic structure of the matrix.
    #[inline]
    pub fn symbolic(&self) -> SymbolicSparseColMatRef<'a, I> {
        self.symbolic
    }

    /// Returns the number of stored entries.
    #[inline]
    pub fn compute_nnz(&self) -> usize {
        self.symbolic.compute_nnz()
    }

    /// Returns the column pointers.
    #[inline]
    pub fn col_ptrs(&self) -> &'a [I] {
        self.symbolic.col_ptrs()
    }

    /// Returns the row indices.
    #[inline]
    pub fn row_indices(&self) -> &'a [I] {
        self.symbolic.row_indices()
    }

    /// Returns the numerical values of the matrix.
    #[inline]
    pub fn values(&self) -> &'a [E] {
        self.values
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
    pub fn row_indices_of_col_raw(&self, j: usize) -> &'a [I] {
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
    ) -> impl 'a + ExactSizeIterator + DoubleEndedIterator<Item = usize> {
        self.symbolic.row_indices_of_col(j)
    }

    /// Returns the numerical values of column `j` of the matrix.
    ///
    /// # Panics
    ///
    /// Panics if `j >= self.ncols()`.
    #[inline]
    #[track_caller]
    pub fn values_of_col(&self, j: usize) -> &'a [E] {
        &self.values[self.col_range(j)]
    }

    /// Returns an iterator over the stored entries, in column-major order.
    #[inline]
    pub fn iter(&self) -> Iter<'a, I, E> {
        Iter::new(*self)
    }

    /// Returns a reference to the value at the given index, or None if the symbolic structure
    /// doesn't contain it.
    ///
    /// # Panics
    /// Panics if `row >= self.nrows()`.
    /// Panics if `col >= self.ncols()`.
    #[track_caller]
    pub fn get(self, row: usize, col: usize) -> Option<&'a E> {
        assert!(row < self.nrows());
        assert!(col < self.ncols());

        let Ok(pos) = self
            .row_indices_of_col_raw(col)
            .binary_search(&I::truncate(row))
        else {
            return None;
        };

        Some(&self.values_of_col(col)[pos])
    }

    /// Returns the value at the given index, or zero if it is not stored.
    ///
    /// # Panics
    /// Panics if `row >= self.nrows()`.
    /// Panics if `col >= self.ncols()`.
    #[track_caller]
    pub fn read(self, row: usize, col: usize) -> E {
        self.get(row, col).copied().unwrap_or_else(E::sp_zero)
    }

    /// Copies the current matrix into a newly allocated matrix.
    #[inline]
    pub fn to_owned(&self) -> Result<SparseColMat<I, E>, SparseError> {
        let symbolic = self.symbolic.to_owned()?;
        let mut values = try_with_capacity(self.values.len())?;
        values.extend_from_slice(self.values);
        Ok(SparseColMat { symbolic, values })
    }

    /// Copies the entries on and above (`Side::Upper`) or on and below (`Side::Lower`) the
    /// diagonal into a newly allocated matrix of the same shape.
    pub fn triangle(&self, side: Side) -> Result<SparseColMat<I, E>, SparseError> {
        let keep = |row: usize, col: usize| match side {
            Side::Upper => row <= col,
            Side::Lower => row >= col,
        };

        let mut nnz = 0usize;
        for j in 0..self.ncols() {
            nnz += self.row_indices_of_col(j).filter(|&i| keep(i, j)).count();
        }

        let mut out = CscAssembler::try_with_capacity(self.nrows(), self.ncols(), nnz)?;
        for e in self.iter() {
            if keep(e.row, e.col) {
                out.push(e.row, e.col, e.value);
            }
        }
        out.finalize()
    }

    /// Copies the transpose of `self` into a newly allocated matrix.
    pub fn to_transposed(&self) -> Result<SparseColMat<I, E>, SparseError> {
        self.to_transposed_impl(Conj::No)
    }

    /// Copies the adjoint (conjugate transpose) of `self` into a newly allocated matrix.
    pub fn to_adjoint(&self) -> Result<SparseColMat<I, E>, SparseError> {
        self.to_transposed_impl(Conj::Yes)
    }

    fn to_transposed_impl(&self, conj: Conj) -> Result<SparseColMat<I, E>, SparseError> {
        let nnz = self.compute_nnz();
        let mut col_ptr = try_zeroed::<I>(self.nrows() + 1)?;
        let mut row_ind = try_zeroed::<I>(nnz)?;
        let mut values = try_with_capacity::<E>(nnz)?;
        values.resize(nnz, E::sp_zero());

        let mut mem = GlobalPodBuffer::try_new(
            utils::transpose_req::<I>(self.nrows()).map_err(|_| SparseError::OutOfMemory)?,
        )
        .map_err(|_| SparseError::OutOfMemory)?;
        let stack = PodStack::new(&mut mem);

        match conj {
            Conj::No => {
                utils::transpose(&mut col_ptr, &mut row_ind, &mut values, *self, stack);
            }
            Conj::Yes => {
                utils::adjoint(&mut col_ptr, &mut row_ind, &mut values, *self, stack);
            }
        }

        Ok(unsafe {
            SparseColMat::new(
                SymbolicSparseColMat::new_unchecked(self.ncols(), self.nrows(), col_ptr, row_ind),
                values,
            )
        })
    }
}

impl<I: Index, E: ComplexField> core::fmt::Debug for SparseColMatRef<'_, I, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|e| (e.row, e.col, e.value)))
            .finish()
    }
}
