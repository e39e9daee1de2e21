#![allow(non_snake_case)]

use equator::assert;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sparse_glue::sparse::merge::{replace_submatrix, SubviewBox};
use sparse_glue::sparse::symmat::{symmat, symmat_hermitian};
use sparse_glue::sparse::vectorise::vectorise;
use sparse_glue::sparse::{SparseColMat, SymbolicSparseColMatRef};
use sparse_glue::{c64, ComplexField, Conj, Index, Side};

fn check_csc<I: Index, E: ComplexField>(A: &SparseColMat<I, E>) {
    // panics on any structural violation
    SymbolicSparseColMatRef::new_checked(A.nrows(), A.ncols(), A.col_ptrs(), A.row_indices());
    assert!(A.values().len() == A.compute_nnz());
    assert!(A.values().iter().all(|v| !v.sp_is_zero()));
}

fn random_matrix(rng: &mut StdRng, nrows: usize, ncols: usize) -> SparseColMat<u32, c64> {
    let density = rng.gen_range(0.0..0.6);
    let mut triplets = Vec::new();
    for j in 0..ncols {
        for i in 0..nrows {
            if rng.gen::<f64>() < density {
                let value = c64::new(rng.gen_range(-4..5) as f64, rng.gen_range(-4..5) as f64);
                triplets.push((i, j, value));
            }
        }
    }
    SparseColMat::try_new_from_triplets(nrows, ncols, &triplets).unwrap()
}

#[test]
fn every_engine_outputs_valid_csc() {
    let mut rng = StdRng::seed_from_u64(0);

    for _ in 0..200 {
        let nrows = rng.gen_range(1..10);
        let ncols = rng.gen_range(1..10);
        let A = random_matrix(&mut rng, nrows, ncols);
        check_csc(&A);

        let row_start = rng.gen_range(0..nrows);
        let row_end = rng.gen_range(row_start..nrows);
        let col_start = rng.gen_range(0..ncols);
        let col_end = rng.gen_range(col_start..ncols);
        let subview = SubviewBox::new(row_start, row_end, col_start, col_end);
        let patch = random_matrix(&mut rng, subview.nrows(), subview.ncols());

        let mut merged = A.clone();
        replace_submatrix(&mut merged, subview, patch.as_ref()).unwrap();
        check_csc(&merged);
        for j in 0..ncols {
            for i in 0..nrows {
                let expected = if subview.contains(i, j) {
                    patch.read(i - row_start, j - col_start)
                } else {
                    A.read(i, j)
                };
                assert!(merged.read(i, j) == expected);
            }
        }

        for dim in [0, 1] {
            let v = vectorise(A.as_ref(), dim).unwrap();
            check_csc(&v);
            assert!(v.compute_nnz() == A.compute_nnz());
        }

        let n = Ord::min(nrows, ncols);
        let square = random_matrix(&mut rng, n, n);
        for side in [Side::Upper, Side::Lower] {
            let S = symmat(square.as_ref(), side).unwrap();
            check_csc(&S);
            let H = symmat_hermitian(square.as_ref(), side, Conj::Yes).unwrap();
            check_csc(&H);

            for j in 0..n {
                for i in 0..n {
                    assert!(S.read(i, j) == S.read(j, i));
                    if i != j {
                        assert!(H.read(i, j) == H.read(j, i).conj());
                    }
                }
            }
        }
    }
}

#[test]
fn symmat_end_to_end() {
    let A = SparseColMat::<usize, f64>::try_new_from_triplets(
        3,
        3,
        &[(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0), (0, 2, 5.0)],
    )
    .unwrap();
    let S = symmat(A.as_ref(), Side::Upper).unwrap();

    let expected = SparseColMat::<usize, f64>::try_new_from_triplets(
        3,
        3,
        &[(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0), (0, 2, 5.0), (2, 0, 5.0)],
    )
    .unwrap();
    matrixcompare::assert_matrix_eq!(S, expected);
}
