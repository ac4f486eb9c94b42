//! Conversion between CRS and CCS by counting and scattering

use crate::algebra::Domain;
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};
use crate::utils::exclusive_scan;

/// Scatter a compressed layout into its transpose layout.
///
/// Minor indices of the result come out ascending within each lane because
/// the major lanes are visited in order.
fn scatter<T: Domain>(
    n_major: usize,
    n_minor: usize,
    ptr: &[usize],
    idx: &[usize],
    values: &[T],
) -> (Vec<usize>, Vec<usize>, Vec<T>) {
    // Count non-zeros per minor lane
    let mut counts = vec![0; n_minor];
    for &j in idx {
        counts[j] += 1;
    }

    let out_ptr = exclusive_scan(&counts);

    let nnz = idx.len();
    let mut out_idx = vec![0; nnz];
    let mut out_values = vec![T::default(); nnz];
    let mut cursor = out_ptr[..n_minor].to_vec();

    for i in 0..n_major {
        for k in ptr[i]..ptr[i + 1] {
            let j = idx[k];
            let pos = cursor[j];
            out_idx[pos] = i;
            out_values[pos] = values[k];
            cursor[j] += 1;
        }
    }

    (out_ptr, out_idx, out_values)
}

impl<T: Domain> SparseMatrixCSR<T> {
    /// Converts this CRS matrix to CCS format
    pub fn to_csc(&self) -> SparseMatrixCSC<T> {
        let (col_ptr, row_idx, values) = scatter(
            self.n_rows,
            self.n_cols,
            &self.row_ptr,
            &self.col_idx,
            &self.values,
        );
        SparseMatrixCSC {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// The CRS of the transpose, sharing no storage with `self`.
    pub fn transpose(&self) -> SparseMatrixCSR<T> {
        let csc = self.to_csc();
        SparseMatrixCSR {
            n_rows: csc.n_cols,
            n_cols: csc.n_rows,
            row_ptr: csc.col_ptr,
            col_idx: csc.row_idx,
            values: csc.values,
        }
    }
}

impl<T: Domain> SparseMatrixCSC<T> {
    /// Converts this CCS matrix to CRS format
    pub fn to_csr(&self) -> SparseMatrixCSR<T> {
        let (row_ptr, col_idx, values) = scatter(
            self.n_cols,
            self.n_rows,
            &self.col_ptr,
            &self.row_idx,
            &self.values,
        );
        SparseMatrixCSR {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //    [1 2 0]
    //    [0 3 0]
    //    [4 0 5]
    fn sample() -> SparseMatrixCSR<i32> {
        SparseMatrixCSR::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
        )
    }

    #[test]
    fn test_csr_to_csc_conversion() {
        let csc = sample().to_csc();

        assert_eq!(csc.nnz(), 5);
        assert_eq!(csc.col_ptr, vec![0, 2, 4, 5]);

        let col0: Vec<_> = csc.col_iter(0).collect();
        assert_eq!(col0, vec![(0, &1), (2, &4)]);

        let col1: Vec<_> = csc.col_iter(1).collect();
        assert_eq!(col1, vec![(0, &2), (1, &3)]);

        let col2: Vec<_> = csc.col_iter(2).collect();
        assert_eq!(col2, vec![(2, &5)]);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let original = sample();
        let roundtrip = original.to_csc().to_csr();
        assert_eq!(roundtrip, original);
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!(t.get(0, 2), Some(4));
        assert_eq!(t.get(1, 0), Some(2));
        assert_eq!(t.get(2, 0), None);
        assert_eq!(t.transpose(), sample());
    }

    #[test]
    fn test_pattern_conversion() {
        let pattern = SparseMatrixCSR::new(2, 3, vec![0, 1, 2], vec![2, 0], vec![(), ()]);
        let csc = pattern.to_csc();
        assert_eq!(csc.col_ptr, vec![0, 1, 1, 2]);
        assert_eq!(csc.row_idx, vec![1, 0]);
    }
}
