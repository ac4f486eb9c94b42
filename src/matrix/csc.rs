//! Compressed Sparse Column (CCS) storage

use std::fmt;

use crate::algebra::Domain;
use crate::matrix::view::{check_lanes, fmt_lanes, Compressed};

/// A sparse matrix in Compressed Sparse Column (CCS) format
///
/// The column-major twin of [`crate::SparseMatrixCSR`]. Every
/// [`crate::Matrix`] keeps one of these next to its CRS so that column
/// sweeps never need a transpose.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSC<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Column pointers (size: n_cols + 1)
    /// col_ptr[j] is the index in row_idx and values where column j starts
    /// col_ptr[n_cols] is equal to nnz
    pub col_ptr: Vec<usize>,

    /// Row indices (size: nnz), ascending within each column
    pub row_idx: Vec<usize>,

    /// Entry values (size: nnz)
    pub values: Vec<T>,
}

impl<T: Domain> SparseMatrixCSC<T> {
    /// # Panics
    ///
    /// Panics if the arrays do not describe an `n_rows x n_cols` matrix
    /// with ascending, unique row indices per column.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        if let Err(msg) = check_lanes(n_cols, n_rows, &col_ptr, &row_idx, values.len()) {
            panic!("invalid CCS arrays: {}", msg);
        }
        Self { n_rows, n_cols, col_ptr, row_idx, values }
    }

    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            col_ptr: vec![0; n_cols + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn nnz(&self) -> usize {
        self.row_idx.len()
    }

    /// `(row, value)` pairs of column `j`, rows ascending.
    pub fn col_iter(&self, j: usize) -> impl Iterator<Item = (usize, &T)> {
        let range = self.col_ptr[j]..self.col_ptr[j + 1];
        self.row_idx[range.clone()].iter().copied().zip(&self.values[range])
    }
}

impl<T: Domain> fmt::Debug for SparseMatrixCSC<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lanes = Compressed::from_csc(self);
        fmt_lanes(f, "SparseMatrixCSC", "col", (self.n_rows, self.n_cols), lanes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_iter() {
        let matrix = SparseMatrixCSC::new(
            3, 3,
            vec![0, 2, 4, 5],
            vec![0, 2, 0, 1, 2],
            vec![1, 4, 2, 3, 5],
        );

        assert_eq!(matrix.nnz(), 5);
        let col0: Vec<_> = matrix.col_iter(0).collect();
        assert_eq!(col0, vec![(0, &1), (2, &4)]);

        let col2: Vec<_> = matrix.col_iter(2).collect();
        assert_eq!(col2, vec![(2, &5)]);
    }

    #[test]
    fn test_zeros() {
        let empty = SparseMatrixCSC::<f32>::zeros(4, 2);
        assert_eq!(empty.col_ptr, vec![0, 0, 0]);
        assert_eq!(empty.col_iter(1).count(), 0);
        assert_eq!(format!("{:?}", empty), "SparseMatrixCSC(4 x 2, nnz 0)");
    }

    #[test]
    #[should_panic(expected = "4 indices but 3 values")]
    fn test_inconsistent_lengths() {
        SparseMatrixCSC::new(
            3, 3,
            vec![0, 2, 3, 4],
            vec![0, 2, 0, 1],
            vec![1, 4, 2], // Missing last element
        );
    }
}
