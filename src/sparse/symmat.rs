//! Symmetric and hermitian matrices from one triangle of a square matrix.
//!
//! The selected triangle, diagonal included, is kept as stored and mirrored across the diagonal.
//! Mirrored copies can optionally be conjugated, which yields a hermitian matrix for complex
//! element types.

use super::*;
use crate::{assert, debug_assert};

/// Algorithm used to assemble the output of [`symmat_with_params`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SymmatStrategy {
    /// One counting pass and one scatter pass over the input.
    #[default]
    Direct,
    /// Extract the triangle, transpose it, then merge the two.
    Merge,
}

/// Tuning parameters for [`symmat_with_params`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SymmatParams {
    /// Assembly algorithm.
    pub strategy: SymmatStrategy,
}

/// Returns the symmetric matrix whose `side` triangle is the `side` triangle of `X`.
///
/// # Errors
///
/// Returns [`SparseError::NotSquare`] if `X` is not square.
#[track_caller]
pub fn symmat<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
    side: Side,
) -> Result<SparseColMat<I, E>, SparseError> {
    symmat_with_params(X, side, Conj::No, SymmatParams::default())
}

/// Returns the matrix whose `side` triangle is the `side` triangle of `X`, and whose other
/// triangle holds the mirrored entries, conjugated if `conj == Conj::Yes`.
///
/// Diagonal entries are copied as stored, without conjugation.
///
/// # Errors
///
/// Returns [`SparseError::NotSquare`] if `X` is not square.
#[track_caller]
pub fn symmat_hermitian<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
    side: Side,
    conj: Conj,
) -> Result<SparseColMat<I, E>, SparseError> {
    symmat_with_params(X, side, conj, SymmatParams::default())
}

/// See [`symmat_hermitian`].
#[track_caller]
pub fn symmat_with_params<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
    side: Side,
    conj: Conj,
    params: SymmatParams,
) -> Result<SparseColMat<I, E>, SparseError> {
    let (nrows, ncols) = X.shape();
    if nrows != ncols {
        return Err(SparseError::NotSquare { nrows, ncols });
    }
    let n = nrows;

    if X.compute_nnz() == 0 {
        log::trace!(target: "sparse_glue", "symmat: no stored entries, returning {n}x{n} zeros");
        return Ok(SparseColMat::zeros(n, n));
    }

    log::debug!(
        target: "sparse_glue",
        "symmat: {:?} strategy, side {side:?}, conj {conj:?}, {n}x{n} with {} entries",
        params.strategy,
        X.compute_nnz(),
    );

    match params.strategy {
        SymmatStrategy::Direct => symmat_direct(X, side, conj),
        SymmatStrategy::Merge => symmat_merge(X, side, conj),
    }
}

#[inline(always)]
fn in_triangle(side: Side, row: usize, col: usize) -> bool {
    match side {
        Side::Upper => row <= col,
        Side::Lower => row >= col,
    }
}

// column k of the output is made of the entries of column k of X that lie in the triangle, and of
// the mirror images of the off-diagonal triangle entries in row k of X. for the upper triangle the
// former have rows <= k and the latter rows > k, and the other way around for the lower triangle.
// visiting the columns of X in increasing order writes the mirrored part in increasing row order.
fn symmat_direct<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
    side: Side,
    conj: Conj,
) -> Result<SparseColMat<I, E>, SparseError> {
    let n = X.ncols();

    let mut direct = try_zeroed::<I>(n)?;
    let mut mirror = try_zeroed::<I>(n)?;

    let mut nnz = 0usize;
    for j in 0..n {
        for (i, val) in zip(X.row_indices_of_col(j), X.values_of_col(j)) {
            if val.sp_is_zero() || !in_triangle(side, i, j) {
                continue;
            }
            // at most n entries per column and per row, and n fits in I
            direct[j] += I::truncate(1);
            nnz += 1;
            if i != j {
                mirror[i] += I::truncate(1);
                nnz += 1;
            }
        }
    }
    check_index_range::<I>(nnz)?;

    let mut col_ptr = try_zeroed::<I>(n + 1)?;
    let mut row_ind = try_zeroed::<I>(nnz)?;
    let mut values = try_with_capacity::<E>(nnz)?;
    values.resize(nnz, E::sp_zero());

    // turn the counts into write cursors
    for k in 0..n {
        let start = col_ptr[k];
        let (d, m) = (direct[k], mirror[k]);
        col_ptr[k + 1] = start + d + m;
        match side {
            Side::Upper => {
                direct[k] = start;
                mirror[k] = start + d;
            }
            Side::Lower => {
                mirror[k] = start;
                direct[k] = start + m;
            }
        }
    }

    for j in 0..n {
        let j_ = I::truncate(j);
        for (i, &val) in zip(X.row_indices_of_col(j), X.values_of_col(j)) {
            if val.sp_is_zero() || !in_triangle(side, i, j) {
                continue;
            }

            let pos = &mut direct[j];
            row_ind[pos.zx()] = I::truncate(i);
            values[pos.zx()] = val;
            *pos += I::truncate(1);

            if i != j {
                let pos = &mut mirror[i];
                row_ind[pos.zx()] = j_;
                values[pos.zx()] = conj.apply(val);
                *pos += I::truncate(1);
            }
        }
    }

    match side {
        Side::Upper => debug_assert!(&*mirror == &col_ptr[1..]),
        Side::Lower => debug_assert!(&*direct == &col_ptr[1..]),
    }

    Ok(unsafe {
        SparseColMat::new(
            SymbolicSparseColMat::new_unchecked(n, n, col_ptr, row_ind),
            values,
        )
    })
}

fn symmat_merge<I: Index, E: ComplexField>(
    X: SparseColMatRef<'_, I, E>,
    side: Side,
    conj: Conj,
) -> Result<SparseColMat<I, E>, SparseError> {
    let n = X.ncols();

    let T = X.triangle(side)?;
    let T_mirror = match conj {
        Conj::No => T.as_ref().to_transposed()?,
        Conj::Yes => T.as_ref().to_adjoint()?,
    };

    let bound = T
        .compute_nnz()
        .checked_mul(2)
        .ok_or(SparseError::IndexOverflow)?;
    let mut out = CscAssembler::try_with_capacity(n, n, bound)?;

    let mut lhs = T.iter().peekable();
    let mut rhs = T_mirror.iter().peekable();

    // the two streams can only share diagonal positions, where the stored value is kept
    loop {
        let e = match (lhs.peek().copied(), rhs.peek().copied()) {
            (None, None) => break,
            (Some(x), Some(y)) if x.position() == y.position() => {
                lhs.next();
                rhs.next();
                x
            }
            (Some(x), Some(y)) if x.position() < y.position() => {
                lhs.next();
                x
            }
            (Some(x), None) => {
                lhs.next();
                x
            }
            (_, Some(y)) => {
                rhs.next();
                y
            }
        };
        out.push_nonzero(e.row, e.col, e.value);
    }

    assert!(out.len() <= bound);
    out.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const STRATEGIES: [SymmatParams; 2] = [
        SymmatParams {
            strategy: SymmatStrategy::Direct,
        },
        SymmatParams {
            strategy: SymmatStrategy::Merge,
        },
    ];

    fn assert_same<I: Index, E: ComplexField>(a: &SparseColMat<I, E>, b: &SparseColMat<I, E>) {
        assert!(a.shape() == b.shape());
        assert!(a.col_ptrs() == b.col_ptrs());
        assert!(a.row_indices() == b.row_indices());
        assert!(a.values() == b.values());
    }

    #[test]
    fn test_symmat_example() {
        let A = SparseColMat::<usize, f64>::try_new_from_triplets(
            3,
            3,
            &[(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0), (0, 2, 5.0)],
        )
        .unwrap();
        let expected = SparseColMat::<usize, f64>::try_new_from_triplets(
            3,
            3,
            &[(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0), (0, 2, 5.0), (2, 0, 5.0)],
        )
        .unwrap();

        for params in STRATEGIES {
            let S = symmat_with_params(A.as_ref(), Side::Upper, Conj::No, params).unwrap();
            assert_same(&S, &expected);
        }

        // the entry above the diagonal is ignored when mirroring the lower triangle
        let S = symmat(A.as_ref(), Side::Lower).unwrap();
        assert!(S.col_ptrs() == &[0, 1, 2, 3]);
        assert!(S.values() == &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_symmat_column_order() {
        // [[1, 2, 3],
        //  [4, 5, 6],
        //  [7, 8, 9]]
        let mut triplets = Vec::new();
        for j in 0..3 {
            for i in 0..3 {
                triplets.push((i, j, (1 + 3 * i + j) as f64));
            }
        }
        let A = SparseColMat::<u32, f64>::try_new_from_triplets(3, 3, &triplets).unwrap();

        let U = symmat(A.as_ref(), Side::Upper).unwrap();
        assert!(U.col_ptrs() == &[0, 3, 6, 9]);
        assert!(U.row_indices() == &[0, 1, 2, 0, 1, 2, 0, 1, 2]);
        assert!(U.values() == &[1.0, 2.0, 3.0, 2.0, 5.0, 6.0, 3.0, 6.0, 9.0]);

        let L = symmat(A.as_ref(), Side::Lower).unwrap();
        assert!(L.values() == &[1.0, 4.0, 7.0, 4.0, 5.0, 8.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_symmat_hermitian() {
        let A = SparseColMat::<usize, c64>::try_new_from_triplets(
            2,
            2,
            &[
                (0, 0, c64::new(1.0, 0.5)),
                (0, 1, c64::new(2.0, 3.0)),
                (1, 0, c64::new(9.0, 9.0)),
            ],
        )
        .unwrap();

        for params in STRATEGIES {
            let H = symmat_with_params(A.as_ref(), Side::Upper, Conj::Yes, params).unwrap();
            assert!(H.read(0, 1) == c64::new(2.0, 3.0));
            assert!(H.read(1, 0) == c64::new(2.0, -3.0));
            // diagonal entries are kept as stored
            assert!(H.read(0, 0) == c64::new(1.0, 0.5));
            assert!(H.compute_nnz() == 3);

            let S = symmat_with_params(A.as_ref(), Side::Upper, Conj::No, params).unwrap();
            assert!(S.read(1, 0) == c64::new(2.0, 3.0));
        }
    }

    #[test]
    fn test_symmat_not_square() {
        let A = SparseColMat::<usize, f64>::try_new_from_triplets(2, 3, &[(0, 0, 1.0)]).unwrap();
        for params in STRATEGIES {
            let err = symmat_with_params(A.as_ref(), Side::Upper, Conj::No, params);
            assert!(err.err() == Some(SparseError::NotSquare { nrows: 2, ncols: 3 }));
        }
    }

    #[test]
    fn test_symmat_empty() {
        let A = SparseColMat::<usize, f64>::zeros(4, 4);
        for params in STRATEGIES {
            let S = symmat_with_params(A.as_ref(), Side::Lower, Conj::No, params).unwrap();
            assert!(S.shape() == (4, 4));
            assert!(S.col_ptrs() == &[0, 0, 0, 0, 0]);
        }

        let A = SparseColMat::<usize, f64>::zeros(0, 0);
        let S = symmat(A.as_ref(), Side::Upper).unwrap();
        assert!(S.shape() == (0, 0));
    }

    #[test]
    fn test_symmat_drops_explicit_zeros() {
        let A = SparseColMat::<usize, f64>::new(
            SymbolicSparseColMat::new_checked(2, 2, vec![0, 1, 3], vec![0, 0, 1]),
            vec![1.0, 0.0, 2.0],
        );
        for params in STRATEGIES {
            let S = symmat_with_params(A.as_ref(), Side::Upper, Conj::No, params).unwrap();
            assert!(S.col_ptrs() == &[0, 1, 2]);
            assert!(S.row_indices() == &[0, 1]);
            assert!(S.values() == &[1.0, 2.0]);
        }
    }

    #[test]
    fn test_symmat_random() {
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..100 {
            let n = rng.gen_range(1..16);
            let density = rng.gen_range(0.0..1.0);
            let mut triplets = Vec::new();
            for j in 0..n {
                for i in 0..n {
                    if rng.gen::<f64>() < density {
                        let re = rng.gen_range(1..10) as f64;
                        let im = rng.gen_range(-3..4) as f64;
                        triplets.push((i, j, c64::new(re, im)));
                    }
                }
            }
            let A = SparseColMat::<usize, c64>::try_new_from_triplets(n, n, &triplets).unwrap();

            for side in [Side::Upper, Side::Lower] {
                for conj in [Conj::No, Conj::Yes] {
                    let direct = symmat_with_params(A.as_ref(), side, conj, STRATEGIES[0]).unwrap();
                    let merged = symmat_with_params(A.as_ref(), side, conj, STRATEGIES[1]).unwrap();
                    assert_same(&direct, &merged);

                    SymbolicSparseColMatRef::new_checked(
                        n,
                        n,
                        direct.col_ptrs(),
                        direct.row_indices(),
                    );

                    for j in 0..n {
                        for i in 0..n {
                            let (src_row, src_col) = if in_triangle(side, i, j) {
                                (i, j)
                            } else {
                                (j, i)
                            };
                            let mut expected = A.read(src_row, src_col);
                            if (src_row, src_col) != (i, j) {
                                expected = conj.apply(expected);
                            }
                            assert!(direct.read(i, j) == expected);
                        }
                    }
                }
            }
        }
    }
}
