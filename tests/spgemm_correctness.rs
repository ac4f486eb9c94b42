//! Tests for SpGEMM correctness against the reference implementation and sprs

use grb::matrix::reference_mxm;
use grb::{
    execute, from_sprs_csr, lor_land, min_plus, mxm, mxm_pattern, plus_times, to_sprs_csr,
    Descriptor, GrbError, Matrix, Phase, SparseMatrixCSR,
};

/// Create a diagonal matrix
fn create_diagonal_matrix(n: usize, value: f64) -> SparseMatrixCSR<f64> {
    let row_ptr: Vec<usize> = (0..=n).collect();
    let col_idx: Vec<usize> = (0..n).collect();
    SparseMatrixCSR::new(n, n, row_ptr, col_idx, vec![value; n])
}

/// Create a tridiagonal matrix
fn create_tridiagonal_matrix(n: usize) -> SparseMatrixCSR<f64> {
    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for i in 0..n {
        if i > 0 {
            col_idx.push(i - 1);
            values.push(1.0);
        }
        col_idx.push(i);
        values.push(2.0);
        if i < n - 1 {
            col_idx.push(i + 1);
            values.push(1.0);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(n, n, row_ptr, col_idx, values)
}

/// Deterministic scattered pattern: row `i` holds up to `per_row` columns
/// picked by a linear congruential walk
fn create_scattered_matrix(m: usize, n: usize, per_row: usize, seed: u64) -> SparseMatrixCSR<f64> {
    let mut state = seed;
    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    for _ in 0..m {
        let mut cols: Vec<usize> = (0..per_row)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (state >> 33) as usize % n
            })
            .collect();
        cols.sort_unstable();
        cols.dedup();
        for j in cols {
            col_idx.push(j);
            values.push(((j % 7) + 1) as f64);
        }
        row_ptr.push(col_idx.len());
    }
    SparseMatrixCSR::new(m, n, row_ptr, col_idx, values)
}

fn product(a: &SparseMatrixCSR<f64>, b: &SparseMatrixCSR<f64>) -> Matrix<f64> {
    let a = Matrix::from_csr(a.clone());
    let b = Matrix::from_csr(b.clone());
    let mut c = Matrix::new(a.nrows(), b.ncols());
    execute(|p| mxm(&mut c, &a, &b, &plus_times::<f64>(), Descriptor::NO_OPERATION, p)).unwrap();
    c
}

#[test]
fn test_identity_multiplication() {
    let a = create_diagonal_matrix(10, 1.0);
    let b = create_diagonal_matrix(10, 2.0);

    let c = product(&a, &b);
    assert_eq!(c.nnz(), 10);
    for i in 0..10 {
        assert_eq!(c.get(i, i), Some(2.0));
    }
}

#[test]
fn test_tridiagonal_square_matches_reference() {
    let a = create_tridiagonal_matrix(50);
    let c = product(&a, &a);
    let expected = reference_mxm(&a, &a, &plus_times::<f64>());

    assert_eq!(c.crs(), &expected);
    // pentadiagonal: 5 per interior row, 3 on the first and last row
    assert_eq!(c.nnz(), 5 * 50 - 6);
    assert_eq!(c.get(1, 1), Some(6.0));
}

#[test]
fn test_rectangular_matches_reference() {
    let a = create_scattered_matrix(40, 70, 6, 7);
    let b = create_scattered_matrix(70, 30, 9, 11);
    let c = product(&a, &b);
    assert_eq!(c.crs(), &reference_mxm(&a, &b, &plus_times::<f64>()));
}

#[test]
fn test_dense_rows_match_reference() {
    // rows with many products take the dense accumulator
    let a = create_scattered_matrix(20, 64, 48, 3);
    let b = create_scattered_matrix(64, 64, 40, 5);
    let c = product(&a, &b);
    assert_eq!(c.crs(), &reference_mxm(&a, &b, &plus_times::<f64>()));
}

#[test]
fn test_parallel_path_matches_reference() {
    let a = create_scattered_matrix(5000, 300, 4, 17);
    let b = create_scattered_matrix(300, 200, 5, 19);
    let c = product(&a, &b);
    assert_eq!(c.crs(), &reference_mxm(&a, &b, &plus_times::<f64>()));
}

#[test]
fn test_matches_sprs_product() {
    let a = create_scattered_matrix(30, 25, 5, 23);
    let b = create_scattered_matrix(25, 35, 5, 29);
    let c = product(&a, &b);

    let expected = &to_sprs_csr(&Matrix::from_csr(a)) * &to_sprs_csr(&Matrix::from_csr(b));
    let expected = from_sprs_csr(expected).unwrap();
    let mut got: Vec<_> = c.iter().filter(|&(_, _, v)| v != 0.0).collect();
    let mut want: Vec<_> = expected.iter().filter(|&(_, _, v)| v != 0.0).collect();
    got.sort_by_key(|&(i, j, _)| (i, j));
    want.sort_by_key(|&(i, j, _)| (i, j));
    assert_eq!(got, want);
}

#[test]
fn test_transposed_operands() {
    let a = create_scattered_matrix(12, 9, 3, 31);
    let b = create_scattered_matrix(12, 15, 4, 37);
    let a_t = Matrix::from_csr(a.clone());
    let b_m = Matrix::from_csr(b.clone());

    let mut c = Matrix::<f64>::new(9, 15);
    execute(|p| mxm(&mut c, &a_t, &b_m, &plus_times::<f64>(), Descriptor::TRANSPOSE_LEFT, p))
        .unwrap();
    assert_eq!(c.crs(), &reference_mxm(&a.transpose(), &b, &plus_times::<f64>()));

    let mut wrong = Matrix::<f64>::new(12, 15);
    let err = mxm(&mut wrong, &a_t, &b_m, &plus_times::<f64>(), Descriptor::NO_OPERATION, Phase::Execute)
        .unwrap_err();
    assert!(matches!(err, GrbError::Mismatch(_)));
}

#[test]
fn test_min_plus_two_hop_paths() {
    // 0 -> 1 -> 2 and 0 -> 2 directly
    let a = Matrix::from_csr(SparseMatrixCSR::new(
        3,
        3,
        vec![0, 2, 3, 3],
        vec![1, 2, 2],
        vec![1u32, 9, 2],
    ));
    let mut c = Matrix::<u32>::new(3, 3);
    execute(|p| mxm(&mut c, &a, &a, &min_plus::<u32>(), Descriptor::NO_OPERATION, p)).unwrap();
    assert_eq!(c.iter().collect::<Vec<_>>(), vec![(0, 2, 3)]);
}

#[test]
fn test_pattern_product() {
    let a = create_tridiagonal_matrix(6);
    let a = Matrix::from_csr(a);
    let mut pattern = Matrix::<()>::new(6, 6);
    execute(|p| mxm_pattern(&mut pattern, &a, &a, Descriptor::NO_OPERATION, p)).unwrap();

    let mut reach = Matrix::<bool>::new(6, 6);
    execute(|p| mxm(&mut reach, &pattern, &pattern, &lor_land(), Descriptor::NO_OPERATION, p))
        .unwrap();
    // two squarings of a tridiagonal pattern reach distance four
    assert_eq!(pattern.nnz(), 5 * 6 - 6);
    assert!(reach.iter().all(|(i, j, v)| v && i.abs_diff(j) <= 4));
    assert_eq!(reach.get(0, 4), Some(true));
    assert_eq!(reach.get(0, 5), None);
}

#[test]
fn test_try_phase_without_capacity_fails() {
    let a = Matrix::from_csr(create_tridiagonal_matrix(8));
    let mut c = Matrix::<f64>::with_capacity(8, 8, 4).unwrap();
    let err = mxm(&mut c, &a, &a, &plus_times::<f64>(), Descriptor::NO_OPERATION, Phase::Try)
        .unwrap_err();
    assert!(matches!(err, GrbError::Failed(_)));

    mxm(&mut c, &a, &a, &plus_times::<f64>(), Descriptor::NO_OPERATION, Phase::Resize).unwrap();
    mxm(&mut c, &a, &a, &plus_times::<f64>(), Descriptor::NO_OPERATION, Phase::Try).unwrap();
    assert_eq!(c.nnz(), 5 * 8 - 6);
}
