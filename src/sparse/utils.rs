use super::*;
use crate::{assert, debug_assert};
use core::cell::Cell;
use dyn_stack::{PodStack, SizeOverflow, StackReq};

/// Computes the workspace size and alignment required to transpose a matrix with `nrows` rows,
/// with [`transpose`] or [`adjoint`].
#[inline]
pub fn transpose_req<I: Index>(nrows: usize) -> Result<StackReq, SizeOverflow> {
    StackReq::try_new::<I>(nrows)
}

/// Computes the transpose of the matrix `A` and returns a view over it.
///
/// The result is stored in `new_col_ptrs`, `new_row_indices` and `new_values`.
///
/// # Panics
///
/// Panics if `new_col_ptrs.len() != A.nrows() + 1`, or if `new_row_indices` or `new_values` are
/// shorter than `A.compute_nnz()`.
#[track_caller]
pub fn transpose<'a, I: Index, E: ComplexField>(
    new_col_ptrs: &'a mut [I],
    new_row_indices: &'a mut [I],
    new_values: &'a mut [E],
    A: SparseColMatRef<'_, I, E>,
    stack: PodStack<'_>,
) -> SparseColMatRef<'a, I, E> {
    transpose_impl(new_col_ptrs, new_row_indices, new_values, A, Conj::No, stack)
}

/// Computes the adjoint of the matrix `A` and returns a view over it.
///
/// The result is stored in `new_col_ptrs`, `new_row_indices` and `new_values`.
///
/// # Panics
///
/// See [`transpose`].
#[track_caller]
pub fn adjoint<'a, I: Index, E: ComplexField>(
    new_col_ptrs: &'a mut [I],
    new_row_indices: &'a mut [I],
    new_values: &'a mut [E],
    A: SparseColMatRef<'_, I, E>,
    stack: PodStack<'_>,
) -> SparseColMatRef<'a, I, E> {
    transpose_impl(new_col_ptrs, new_row_indices, new_values, A, Conj::Yes, stack)
}

#[track_caller]
fn transpose_impl<'a, I: Index, E: ComplexField>(
    new_col_ptrs: &'a mut [I],
    new_row_indices: &'a mut [I],
    new_values: &'a mut [E],
    A: SparseColMatRef<'_, I, E>,
    conj: Conj,
    stack: PodStack<'_>,
) -> SparseColMatRef<'a, I, E> {
    let m = A.nrows();
    let n = A.ncols();
    let nnz = A.compute_nnz();
    assert!(all(
        new_col_ptrs.len() == m + 1,
        new_row_indices.len() >= nnz,
        new_values.len() >= nnz,
    ));

    let (col_count, _) = stack.make_raw::<I>(m);
    mem::fill_zero(col_count);

    // can't overflow because the total count is A.compute_nnz() <= I::MAX
    for j in 0..n {
        for i in A.row_indices_of_col(j) {
            col_count[i] += I::truncate(1);
        }
    }

    new_col_ptrs[0] = I::truncate(0);
    // col_count elements are >= 0
    for (cj, [pj0, pj1]) in zip(
        &mut *col_count,
        windows2(Cell::as_slice_of_cells(Cell::from_mut(&mut *new_col_ptrs))),
    ) {
        let pj = pj0.get();
        // new_col_ptrs is non-decreasing
        pj1.set(pj + *cj);
        *cj = pj;
    }

    let new_row_indices = &mut new_row_indices[..nnz];
    let new_values = &mut new_values[..nnz];
    let current_row_position = &mut *col_count;
    // current_row_position[i] == col_ptr[i]
    for j in 0..n {
        let j_ = I::truncate(j);
        for (i, &val) in zip(A.row_indices_of_col(j), A.values_of_col(j)) {
            let ci = &mut current_row_position[i];
            new_row_indices[ci.zx()] = j_;
            new_values[ci.zx()] = conj.apply(val);
            *ci += I::truncate(1);
        }
    }
    // current_row_position[i] == col_ptr[i] + col_count[i] == col_ptr[i + 1] <= col_ptr[m]
    // so the entire output was filled
    debug_assert!(current_row_position == &new_col_ptrs[1..]);

    // columns of A are visited in increasing order, so the row indices of each output column
    // are strictly increasing
    SparseColMatRef::new(
        unsafe { SymbolicSparseColMatRef::new_unchecked(n, m, new_col_ptrs, new_row_indices) },
        new_values,
    )
}
