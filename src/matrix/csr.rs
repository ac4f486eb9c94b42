//! Compressed Sparse Row (CRS) storage

use std::fmt;

use crate::algebra::{Domain, IdentityOf, One};
use crate::error::{GrbError, Result};
use crate::matrix::view::{check_lanes, fmt_lanes, Compressed};

/// A sparse matrix in Compressed Sparse Row (CRS) format
///
/// Row `i` occupies `col_idx[row_ptr[i]..row_ptr[i + 1]]` and the matching
/// slice of `values`. Within each row, column indices are ascending and
/// unique. For a pattern matrix (`T = ()`) the value array occupies no
/// memory.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz), ascending within each row
    pub col_idx: Vec<usize>,

    /// Entry values (size: nnz; zero-sized for pattern matrices)
    pub values: Vec<T>,
}

impl<T: Domain> SparseMatrixCSR<T> {
    /// Wraps CRS arrays.
    ///
    /// # Panics
    ///
    /// Panics if the arrays do not describe an `n_rows x n_cols` matrix
    /// with ascending, unique column indices per row. Use
    /// [`SparseMatrixCSR::try_new`] for input that is not trusted.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        if let Err(msg) = check_lanes(n_rows, n_cols, &row_ptr, &col_idx, values.len()) {
            panic!("invalid CRS arrays: {}", msg);
        }
        Self { n_rows, n_cols, row_ptr, col_idx, values }
    }

    /// Like [`SparseMatrixCSR::new`], reporting inconsistent input as
    /// `Mismatch` instead of panicking.
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        check_lanes(n_rows, n_cols, &row_ptr, &col_idx, values.len())
            .map_err(|msg| GrbError::mismatch(format!("invalid CRS arrays: {}", msg)))?;
        Ok(Self { n_rows, n_cols, row_ptr, col_idx, values })
    }

    /// An `n_rows x n_cols` matrix without entries.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn identity(n: usize) -> Self
    where
        T: IdentityOf<One>,
    {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![<T as IdentityOf<One>>::identity(); n],
        }
    }

    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// `(column, value)` pairs of row `i`, columns ascending.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_rows`.
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()].iter().copied().zip(&self.values[range])
    }

    /// Value at `(i, j)`, found by binary search within row `i`
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i >= self.n_rows {
            return None;
        }
        let start = self.row_ptr[i];
        let row = &self.col_idx[start..self.row_ptr[i + 1]];
        row.binary_search(&j).ok().map(|k| self.values[start + k])
    }
}

impl<T: Domain> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lanes = Compressed::from_csr(self);
        fmt_lanes(f, "SparseMatrixCSR", "row", (self.n_rows, self.n_cols), lanes)
    }
}
