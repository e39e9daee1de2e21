//! Writing a rewritten rectangular region back into a sparse matrix.
//!
//! The parent `A` and the patch `B` have the same shape. Inside the region the result takes `B`'s
//! entries, outside it keeps `A`'s. Both operands are streamed once in column-major order and the
//! result is assembled into fresh storage that replaces `A`'s.

use super::*;
use crate::assert;

/// Inclusive rectangle `[row_start, row_end] × [col_start, col_end]` of matrix coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubviewBox {
    /// First row of the box.
    pub row_start: usize,
    /// Last row of the box, inclusive.
    pub row_end: usize,
    /// First column of the box.
    pub col_start: usize,
    /// Last column of the box, inclusive.
    pub col_end: usize,
}

impl SubviewBox {
    /// Creates a new box from its inclusive bounds.
    ///
    /// # Panics
    ///
    /// Panics if `row_start > row_end` or `col_start > col_end`.
    #[inline]
    #[track_caller]
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        assert!(all(row_start <= row_end, col_start <= col_end));
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    /// Returns the number of rows covered by the box.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.row_end - self.row_start + 1
    }

    /// Returns the number of columns covered by the box.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.col_end - self.col_start + 1
    }

    /// Returns true if `(row, col)` lies inside the box.
    #[inline(always)]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start <= row && row <= self.row_end)
            && (self.col_start <= col && col <= self.col_end)
    }

    /// Returns the number of stored entries of `A` inside the box.
    pub fn count_nonzeros<I: Index, E: ComplexField>(&self, A: SparseColMatRef<'_, I, E>) -> usize {
        if self.col_start >= A.ncols() {
            return 0;
        }
        let col_end = Ord::min(self.col_end, A.ncols() - 1);

        let mut count = 0usize;
        for j in self.col_start..=col_end {
            let rows = A.row_indices_of_col_raw(j);
            let start = rows.partition_point(|&i| i.zx() < self.row_start);
            let end = rows.partition_point(|&i| i.zx() <= self.row_end);
            count += end - start;
        }
        count
    }
}

/// Fraction of the parent's entries that must lie inside the box before they are stripped out
/// ahead of the merge.
///
/// Stripping costs one extra pass over the parent, and shortens the stream that the merge
/// itself walks.
///
/// `0.5` is the default value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StripThreshold(pub f64);

impl Default for StripThreshold {
    #[inline]
    fn default() -> Self {
        Self::AUTO
    }
}

impl StripThreshold {
    /// Strip when the box holds the majority of the parent's entries.
    pub const AUTO: Self = Self(0.5);
    /// Strip whenever the box holds any entry.
    pub const ALWAYS: Self = Self(0.0);
    /// Never strip.
    pub const NEVER: Self = Self(f64::INFINITY);

    #[inline]
    fn should_strip(self, subview_nnz: usize, nnz: usize) -> bool {
        subview_nnz as f64 > self.0 * nnz as f64
    }
}

/// Tuning parameters for [`merge_with_params`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MergeParams {
    /// Threshold above which the box entries of the parent are removed before merging.
    pub strip_threshold: StripThreshold,
}

/// Replaces the contents of `subview` in `A` with the entries of `B`, using the default
/// parameters.
///
/// See [`merge_with_params`].
#[track_caller]
pub fn merge<I: Index, E: ComplexField>(
    A: &mut SparseColMat<I, E>,
    A_subview_nnz: usize,
    subview: SubviewBox,
    B: SparseColMatRef<'_, I, E>,
) -> Result<(), SparseError> {
    merge_with_params(A, A_subview_nnz, subview, B, MergeParams::default())
}

/// Replaces the contents of `subview` in `A` with the entries of `B`.
///
/// `A_subview_nnz` is the number of stored entries of `A` inside `subview`, and `B` holds the
/// new contents of the box in the coordinates of `A`. The entries of `B` outside the box must not
/// share a position with an entry of `A`, and `A` must not store explicit zeros outside the box.
///
/// Where both operands store an entry at the same position, `B`'s value is kept. Entries of `A`
/// inside the box are dropped. Values equal to zero are never stored.
///
/// # Errors
///
/// Returns [`SparseError::DimensionMismatch`] if the shapes of `A` and `B` differ, in which case
/// `A` is left untouched.
///
/// # Panics
///
/// Panics if the number of entries produced differs from
/// `A.compute_nnz() - A_subview_nnz + B.compute_nnz()`, which happens when the preconditions
/// above are not met.
#[track_caller]
pub fn merge_with_params<I: Index, E: ComplexField>(
    A: &mut SparseColMat<I, E>,
    A_subview_nnz: usize,
    subview: SubviewBox,
    B: SparseColMatRef<'_, I, E>,
    params: MergeParams,
) -> Result<(), SparseError> {
    if A.shape() != B.shape() {
        return Err(SparseError::DimensionMismatch {
            lhs: A.shape(),
            rhs: B.shape(),
        });
    }

    let (nrows, ncols) = A.shape();
    let A_nnz = A.compute_nnz();
    assert!(A_subview_nnz <= A_nnz);
    let merge_nnz = A_nnz - A_subview_nnz + B.compute_nnz();

    if merge_nnz == 0 {
        log::debug!(target: "sparse_glue", "merge: empty result, clearing {nrows}x{ncols} matrix");
        *A = SparseColMat::zeros(nrows, ncols);
        return Ok(());
    }

    if A_subview_nnz == A_nnz {
        log::debug!(
            target: "sparse_glue",
            "merge: all {A_nnz} entries inside the box, copying patch"
        );
        *A = B.to_owned()?;
        return Ok(());
    }

    let stripped;
    let lhs = if params.strip_threshold.should_strip(A_subview_nnz, A_nnz) {
        log::debug!(
            target: "sparse_glue",
            "merge: stripping {A_subview_nnz} of {A_nnz} entries inside the box"
        );
        let mut tmp = CscAssembler::try_with_capacity(nrows, ncols, A_nnz - A_subview_nnz)?;
        for e in A.iter() {
            if !subview.contains(e.row, e.col) {
                tmp.push(e.row, e.col, e.value);
            }
        }
        stripped = tmp.finalize()?;
        stripped.as_ref()
    } else {
        A.as_ref()
    };

    let mut out = CscAssembler::try_with_capacity(nrows, ncols, merge_nnz)?;

    let mut lhs_iter = lhs.iter().peekable();
    let mut rhs_iter = B.iter().peekable();

    loop {
        let (pos, value) = match (lhs_iter.peek().copied(), rhs_iter.peek().copied()) {
            (None, None) => break,
            (Some(x), Some(y)) if x.position() == y.position() => {
                lhs_iter.next();
                rhs_iter.next();
                (y.position(), y.value)
            }
            (Some(x), Some(y)) if x.position() < y.position() => {
                lhs_iter.next();
                (x.position(), masked(subview, x))
            }
            (Some(x), None) => {
                lhs_iter.next();
                (x.position(), masked(subview, x))
            }
            (_, Some(y)) => {
                rhs_iter.next();
                (y.position(), y.value)
            }
        };
        out.push_nonzero(pos.row, pos.col, value);
    }

    let count = out.len();
    core::assert!(
        count == merge_nnz,
        "merge: internal error: produced {count} entries, expected {merge_nnz}",
    );

    log::trace!(target: "sparse_glue", "merge: produced {count} entries");
    *A = out.finalize()?;
    Ok(())
}

#[inline(always)]
fn masked<E: ComplexField>(subview: SubviewBox, e: Entry<E>) -> E {
    if subview.contains(e.row, e.col) {
        E::sp_zero()
    } else {
        e.value
    }
}

/// Assigns `patch` to the block of `A` covered by `subview`.
///
/// `patch` is given in the local coordinates of the box and must have its shape. Entries of `A`
/// inside the box that are not stored in `patch` become zero. Explicit zeros stored in `A` are
/// dropped from the result.
///
/// # Errors
///
/// Returns [`SparseError::DimensionMismatch`] if `patch.shape()` differs from the shape of the
/// box.
///
/// # Panics
///
/// Panics if the box does not fit inside `A`.
#[track_caller]
pub fn replace_submatrix<I: Index, E: ComplexField>(
    A: &mut SparseColMat<I, E>,
    subview: SubviewBox,
    patch: SparseColMatRef<'_, I, E>,
) -> Result<(), SparseError> {
    assert!(all(subview.row_end < A.nrows(), subview.col_end < A.ncols()));
    if patch.shape() != (subview.nrows(), subview.ncols()) {
        return Err(SparseError::DimensionMismatch {
            lhs: (subview.nrows(), subview.ncols()),
            rhs: patch.shape(),
        });
    }

    let mut embedded =
        CscAssembler::try_with_capacity(A.nrows(), A.ncols(), patch.compute_nnz())?;
    for e in patch.iter() {
        embedded.push_nonzero(
            e.row + subview.row_start,
            e.col + subview.col_start,
            e.value,
        );
    }
    let embedded = embedded.finalize()?;

    if A.values().iter().any(|v| v.sp_is_zero()) {
        let mut cleaned = without_zeros(A.as_ref())?;
        let A_subview_nnz = subview.count_nonzeros(cleaned.as_ref());
        merge(&mut cleaned, A_subview_nnz, subview, embedded.as_ref())?;
        *A = cleaned;
        return Ok(());
    }

    let A_subview_nnz = subview.count_nonzeros(A.as_ref());
    merge(A, A_subview_nnz, subview, embedded.as_ref())
}

fn without_zeros<I: Index, E: ComplexField>(
    A: SparseColMatRef<'_, I, E>,
) -> Result<SparseColMat<I, E>, SparseError> {
    let mut out = CscAssembler::try_with_capacity(A.nrows(), A.ncols(), A.compute_nnz())?;
    for e in A.iter() {
        out.push_nonzero(e.row, e.col, e.value);
    }
    out.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn mat(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> SparseColMat<usize, f64> {
        SparseColMat::try_new_from_triplets(nrows, ncols, triplets).unwrap()
    }

    fn random_triplets(
        rng: &mut StdRng,
        nrows: usize,
        ncols: usize,
        density: f64,
    ) -> Vec<(usize, usize, f64)> {
        let mut triplets = Vec::new();
        for j in 0..ncols {
            for i in 0..nrows {
                if rng.gen::<f64>() < density {
                    triplets.push((i, j, rng.gen_range(1..10) as f64));
                }
            }
        }
        triplets
    }

    fn to_dense(A: SparseColMatRef<'_, usize, f64>) -> Vec<f64> {
        let mut dense = vec![0.0; A.nrows() * A.ncols()];
        for e in A.iter() {
            dense[e.row + e.col * A.nrows()] = e.value;
        }
        dense
    }

    #[test]
    fn test_count_nonzeros() {
        // [[1, 0, 2, 0],
        //  [0, 3, 4, 0],
        //  [5, 0, 6, 7]]
        let A = mat(
            3,
            4,
            &[
                (0, 0, 1.0),
                (2, 0, 5.0),
                (1, 1, 3.0),
                (0, 2, 2.0),
                (1, 2, 4.0),
                (2, 2, 6.0),
                (2, 3, 7.0),
            ],
        );

        assert!(SubviewBox::new(1, 2, 1, 2).count_nonzeros(A.as_ref()) == 3);
        assert!(SubviewBox::new(0, 2, 0, 3).count_nonzeros(A.as_ref()) == 7);
        assert!(SubviewBox::new(0, 0, 1, 1).count_nonzeros(A.as_ref()) == 0);
        // clipped to the matrix
        assert!(SubviewBox::new(2, 9, 3, 9).count_nonzeros(A.as_ref()) == 1);
        assert!(SubviewBox::new(0, 9, 4, 9).count_nonzeros(A.as_ref()) == 0);
    }

    #[test]
    fn test_merge_box_replacement() {
        let mut A = mat(
            3,
            3,
            &[(0, 0, 1.0), (1, 1, 2.0), (2, 1, 3.0), (2, 2, 4.0), (0, 2, 5.0)],
        );
        // box covers rows 1..=2, cols 1..=2 and holds (1,1), (2,1), (2,2)
        let subview = SubviewBox::new(1, 2, 1, 2);
        let B = mat(3, 3, &[(1, 1, 9.0), (1, 2, 8.0)]);

        merge(&mut A, 3, subview, B.as_ref()).unwrap();

        let expected = mat(3, 3, &[(0, 0, 1.0), (1, 1, 9.0), (0, 2, 5.0), (1, 2, 8.0)]);
        matrixcompare::assert_matrix_eq!(A, expected);
        assert!(A.col_ptrs() == &[0, 1, 2, 4]);
        assert!(A.row_indices() == &[0, 1, 0, 1]);
    }

    #[test]
    fn test_merge_empty_result() {
        let mut A = mat(2, 3, &[(1, 2, 1.0)]);
        let B = SparseColMat::<usize, f64>::zeros(2, 3);

        merge(&mut A, 1, SubviewBox::new(0, 1, 2, 2), B.as_ref()).unwrap();
        assert!(A.shape() == (2, 3));
        assert!(A.compute_nnz() == 0);
        assert!(A.col_ptrs() == &[0, 0, 0, 0]);
    }

    #[test]
    fn test_merge_everything_inside_box() {
        let mut A = mat(3, 3, &[(1, 1, 1.0), (2, 2, 2.0)]);
        let B = mat(3, 3, &[(0, 0, 7.0), (1, 2, 3.0)]);

        merge(&mut A, 2, SubviewBox::new(1, 2, 1, 2), B.as_ref()).unwrap();
        assert!(A.col_ptrs() == B.col_ptrs());
        assert!(A.row_indices() == B.row_indices());
        assert!(A.values() == B.values());
    }

    #[test]
    fn test_merge_dimension_mismatch() {
        let mut A = mat(2, 3, &[(0, 0, 1.0)]);
        let B = mat(3, 2, &[(0, 0, 1.0)]);

        let err = merge(&mut A, 0, SubviewBox::new(0, 0, 0, 0), B.as_ref());
        assert!(
            err == Err(SparseError::DimensionMismatch {
                lhs: (2, 3),
                rhs: (3, 2),
            })
        );
        assert!(A.shape() == (2, 3));
        assert!(A.values() == &[1.0]);
    }

    #[test]
    #[should_panic(expected = "internal error")]
    fn test_merge_overlap_outside_box() {
        // B stores an entry outside the box at a position A also stores
        let mut A = mat(3, 3, &[(0, 0, 1.0), (2, 2, 2.0)]);
        let B = mat(3, 3, &[(0, 0, 5.0)]);

        let _ = merge_with_params(
            &mut A,
            1,
            SubviewBox::new(2, 2, 2, 2),
            B.as_ref(),
            MergeParams {
                strip_threshold: StripThreshold::NEVER,
            },
        );
    }

    #[test]
    fn test_replace_submatrix_shape_mismatch() {
        let mut A = mat(4, 4, &[(0, 0, 1.0)]);
        let patch = SparseColMat::<usize, f64>::zeros(2, 3);

        let err = replace_submatrix(&mut A, SubviewBox::new(1, 2, 1, 2), patch.as_ref());
        assert!(
            err == Err(SparseError::DimensionMismatch {
                lhs: (2, 2),
                rhs: (2, 3),
            })
        );
    }

    // [[1, 0],
    //  [0, 2]] with an explicit zero stored at (0, 1)
    fn with_stored_zero() -> SparseColMat<usize, f64> {
        let symbolic = SymbolicSparseColMat::new_checked(2, 2, vec![0, 1, 3], vec![0, 0, 1]);
        SparseColMat::new(symbolic, vec![1.0, 0.0, 2.0])
    }

    #[test]
    fn test_replace_submatrix_explicit_zeros() {
        let mut A = with_stored_zero();
        let patch = mat(1, 1, &[(0, 0, 7.0)]);

        replace_submatrix(&mut A, SubviewBox::new(0, 0, 0, 0), patch.as_ref()).unwrap();
        assert!(A.col_ptrs() == &[0, 1, 2]);
        assert!(A.row_indices() == &[0, 1]);
        assert!(A.values() == &[7.0, 2.0]);

        // the zero inside the box is dropped along with the rest of the box
        let mut A = with_stored_zero();
        let patch = SparseColMat::<usize, f64>::zeros(1, 1);
        replace_submatrix(&mut A, SubviewBox::new(0, 0, 1, 1), patch.as_ref()).unwrap();
        assert!(A.row_indices() == &[0, 1]);
        assert!(A.values() == &[1.0, 2.0]);
    }

    #[test]
    fn test_replace_submatrix_random() {
        let mut rng = StdRng::seed_from_u64(0);

        for threshold in [StripThreshold::AUTO, StripThreshold::ALWAYS, StripThreshold::NEVER] {
            for _ in 0..50 {
                let nrows = rng.gen_range(1..12);
                let ncols = rng.gen_range(1..12);
                let row_start = rng.gen_range(0..nrows);
                let row_end = rng.gen_range(row_start..nrows);
                let col_start = rng.gen_range(0..ncols);
                let col_end = rng.gen_range(col_start..ncols);
                let subview = SubviewBox::new(row_start, row_end, col_start, col_end);

                let density = rng.gen_range(0.0..1.0);
                let A0 = mat(nrows, ncols, &random_triplets(&mut rng, nrows, ncols, density));
                let density = rng.gen_range(0.0..1.0);
                let patch = mat(
                    subview.nrows(),
                    subview.ncols(),
                    &random_triplets(&mut rng, subview.nrows(), subview.ncols(), density),
                );

                let mut expected = to_dense(A0.as_ref());
                let patch_dense = to_dense(patch.as_ref());
                for j in col_start..=col_end {
                    for i in row_start..=row_end {
                        expected[i + j * nrows] =
                            patch_dense[(i - row_start) + (j - col_start) * subview.nrows()];
                    }
                }

                // full-size patch, merged with explicit parameters
                let mut embedded = Vec::new();
                for e in patch.iter() {
                    embedded.push((e.row + row_start, e.col + col_start, e.value));
                }
                let B = mat(nrows, ncols, &embedded);
                let mut A = A0.clone();
                let sv_nnz = subview.count_nonzeros(A.as_ref());
                merge_with_params(
                    &mut A,
                    sv_nnz,
                    subview,
                    B.as_ref(),
                    MergeParams {
                        strip_threshold: threshold,
                    },
                )
                .unwrap();
                assert!(to_dense(A.as_ref()) == expected);
                assert!(A.values().iter().all(|&v| v != 0.0));
                SymbolicSparseColMatRef::new_checked(
                    A.nrows(),
                    A.ncols(),
                    A.col_ptrs(),
                    A.row_indices(),
                );

                let mut A = A0.clone();
                replace_submatrix(&mut A, subview, patch.as_ref()).unwrap();
                assert!(to_dense(A.as_ref()) == expected);
            }
        }
    }
}
