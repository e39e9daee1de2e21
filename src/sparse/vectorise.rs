//! Flattening a sparse matrix into a single column or a single row.
//!
//! The column vector lists the entries in column-major order, the row vector in row-major order,
//! which is the column-major order of the transpose. Only stored entries are touched, the zeros
//! between them stay implicit.

use super::*;

const PERF_TARGET: &str = "sparse_glue_perf";

#[inline]
fn n_elem<I: Index>(nrows: usize, ncols: usize) -> Result<usize, SparseError> {
    let n_elem = nrows
        .checked_mul(ncols)
        .ok_or(SparseError::IndexOverflow)?;
    check_index_range::<I>(n_elem)?;
    Ok(n_elem)
}

/// Returns the `(nrows * ncols) × 1` column vector holding the entries of `X` in column-major
/// order. The entry at `(row, col)` moves to row `row + col * nrows`.
///
/// # Errors
///
/// Returns [`SparseError::IndexOverflow`] if `nrows * ncols` does not fit in `I`.
pub fn vectorise_col<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
) -> Result<SparseColMat<I, E>, SparseError> {
    let (nrows, ncols) = X.shape();
    let n_elem = n_elem::<I>(nrows, ncols)?;

    if n_elem == 0 || X.compute_nnz() == 0 {
        return Ok(SparseColMat::zeros(n_elem, 1));
    }

    let mut out = CscAssembler::try_with_capacity(n_elem, 1, X.compute_nnz())?;
    for e in X.iter() {
        out.push_nonzero(e.row + e.col * nrows, 0, e.value);
    }
    out.finalize()
}

/// Returns the `1 × (nrows * ncols)` row vector holding the entries of `X` in row-major order.
/// The entry at `(row, col)` moves to column `row * ncols + col`.
///
/// # Errors
///
/// Returns [`SparseError::IndexOverflow`] if `nrows * ncols` does not fit in `I`.
pub fn vectorise_row<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
) -> Result<SparseColMat<I, E>, SparseError> {
    let (nrows, ncols) = X.shape();
    let n_elem = n_elem::<I>(nrows, ncols)?;
    let nnz = X.compute_nnz();

    if n_elem == 0 || nnz == 0 {
        return Ok(SparseColMat::zeros(1, n_elem));
    }

    if n_elem >= 1 << 16 && n_elem / 64 > nnz {
        log::warn!(
            target: PERF_TARGET,
            "vectorise_row: {nrows}x{ncols} matrix with {nnz} entries needs {} column pointers",
            n_elem + 1,
        );
    }

    // the column-major order of the transpose is the row-major order of X
    let T = X.to_transposed()?;
    let mut out = CscAssembler::try_with_capacity(1, n_elem, nnz)?;
    for e in T.iter() {
        out.push_nonzero(0, e.row + e.col * ncols, e.value);
    }
    out.finalize()
}

/// Flattens `X` into a column vector if `dim == 0`, or into a row vector if `dim == 1`.
///
/// # Errors
///
/// Returns [`SparseError::InvalidDim`] for any other `dim`, and [`SparseError::IndexOverflow`]
/// if `nrows * ncols` does not fit in `I`.
pub fn vectorise<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
    dim: usize,
) -> Result<SparseColMat<I, E>, SparseError> {
    match dim {
        0 => vectorise_col(X),
        1 => vectorise_row(X),
        _ => Err(SparseError::InvalidDim { dim }),
    }
}

/// Stores the column vectorisation of `X` into `out`, releasing the previous storage of `out`.
///
/// `out` is left untouched on error.
pub fn vectorise_col_into<I: Index, E: ComplexField>(
    out: &mut SparseColMat<I, E>,
    X: SparseColMatRef<'_, I, E>,
) -> Result<(), SparseError> {
    *out = vectorise_col(X)?;
    Ok(())
}

/// Stores the row vectorisation of `X` into `out`, releasing the previous storage of `out`.
///
/// `out` is left untouched on error.
pub fn vectorise_row_into<I: Index, E: ComplexField>(
    out: &mut SparseColMat<I, E>,
    X: SparseColMatRef<'_, I, E>,
) -> Result<(), SparseError> {
    *out = vectorise_row(X)?;
    Ok(())
}

impl<I: Index, E: ComplexField> SparseColMat<I, E> {
    /// Flattens `self` into a column vector if `dim == 0`, or into a row vector if `dim == 1`.
    ///
    /// The column case reshapes the existing storage and never copies the values, unless `self`
    /// stores explicit zeros, in which case it is rebuilt without them. The row case builds the row
    /// vector and moves it into `self`.
    ///
    /// # Errors
    ///
    /// See [`vectorise`]. `self` is left untouched on error.
    pub fn vectorise_in_place(&mut self, dim: usize) -> Result<(), SparseError> {
        match dim {
            0 => {
                let n_elem = n_elem::<I>(self.nrows(), self.ncols())?;
                if n_elem == 0 || self.compute_nnz() == 0 {
                    *self = SparseColMat::zeros(n_elem, 1);
                    Ok(())
                } else if self.values().iter().any(|v| v.sp_is_zero()) {
                    *self = vectorise_col(self.as_ref())?;
                    Ok(())
                } else {
                    log::trace!(
                        target: "sparse_glue",
                        "vectorise: reshaping to {n_elem}x1 in place"
                    );
                    self.reshape(n_elem, 1)
                }
            }
            1 => {
                *self = vectorise_row(self.as_ref())?;
                Ok(())
            }
            _ => Err(SparseError::InvalidDim { dim }),
        }
    }
}
