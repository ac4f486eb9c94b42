//! The user-facing matrix: a CRS and a CCS of the same triples.

use std::fmt;

use tracing::trace;

use crate::algebra::Domain;
use crate::alloc::{self, AllocMode};
use crate::error::{GrbError, Result};
use crate::id::ContainerId;
use crate::matrix::view::Compressed;
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};
use crate::phase::Phase;

/// An `m × n` sparse matrix holding at most `capacity` entries.
///
/// Both orientations are stored and kept consistent: every primitive that
/// writes a matrix rebuilds the CCS from the CRS it produced. `Matrix<()>`
/// is a pattern matrix.
pub struct Matrix<T: Domain> {
    id: ContainerId,
    crs: SparseMatrixCSR<T>,
    ccs: SparseMatrixCSC<T>,
    capacity: usize,
}

fn default_capacity(m: usize, n: usize) -> usize {
    m.max(n).min(m.saturating_mul(n))
}

impl<T: Domain> Matrix<T> {
    /// An empty `m × n` matrix with capacity `max(m, n)`, clamped to `m·n`.
    pub fn new(m: usize, n: usize) -> Self {
        Self {
            id: ContainerId::next(),
            crs: SparseMatrixCSR::zeros(m, n),
            ccs: SparseMatrixCSC::zeros(m, n),
            capacity: default_capacity(m, n),
        }
    }

    /// An empty `m × n` matrix able to hold `capacity` entries.
    pub fn with_capacity(m: usize, n: usize, capacity: usize) -> Result<Self> {
        let mut matrix = Self::new(m, n);
        matrix.capacity = 0;
        matrix.grow(capacity)?;
        Ok(matrix)
    }

    /// Wrap an existing CRS; the CCS is derived from it.
    pub fn from_csr(crs: SparseMatrixCSR<T>) -> Self {
        let capacity = default_capacity(crs.n_rows, crs.n_cols).max(crs.nnz());
        let ccs = crs.to_csc();
        Self {
            id: ContainerId::next(),
            crs,
            ccs,
            capacity,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn nrows(&self) -> usize {
        self.crs.n_rows
    }

    pub fn ncols(&self) -> usize {
        self.crs.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.crs.nnz()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The value at `(i, j)`, if present.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        self.crs.get(i, j)
    }

    /// `(row, column, value)` triples in CRS order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.crs.n_rows).flat_map(move |i| self.crs.row_iter(i).map(move |(j, &v)| (i, j, v)))
    }

    /// Read-only row-major storage.
    pub fn crs(&self) -> &SparseMatrixCSR<T> {
        &self.crs
    }

    /// Read-only column-major storage.
    pub fn ccs(&self) -> &SparseMatrixCSC<T> {
        &self.ccs
    }

    /// Remove every entry; capacity is kept.
    pub fn clear(&mut self) {
        let (m, n) = (self.nrows(), self.ncols());
        self.crs.row_ptr.iter_mut().for_each(|p| *p = 0);
        self.crs.col_idx.clear();
        self.crs.values.clear();
        self.ccs = SparseMatrixCSC::zeros(m, n);
    }

    /// Guarantee room for `capacity` entries (clamped to `m·n`).
    ///
    /// # Errors
    ///
    /// `Illegal` when asked for less than the current number of entries,
    /// `OutOfMem` if the allocation fails.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.nnz() {
            return Err(GrbError::illegal(format!(
                "cannot shrink matrix capacity to {} below {} present entries",
                capacity,
                self.nnz()
            )));
        }
        self.grow(capacity)
    }

    fn grow(&mut self, capacity: usize) -> Result<()> {
        let capacity = capacity.min(self.nrows().saturating_mul(self.ncols()));
        if capacity <= self.capacity {
            return Ok(());
        }
        trace!(id = %self.id, capacity, "matrix resize");
        let additional = capacity - self.nnz();
        alloc::reserve(&mut self.crs.col_idx, additional, AllocMode::Interleaved, "CRS indices")?;
        alloc::reserve(&mut self.crs.values, additional, AllocMode::Interleaved, "CRS values")?;
        self.capacity = capacity;
        Ok(())
    }

    /// Install `crs` as the new content and rebuild the CCS mirror.
    pub(crate) fn assign(&mut self, crs: SparseMatrixCSR<T>, phase: Phase) -> Result<()> {
        debug_assert_eq!((crs.n_rows, crs.n_cols), (self.nrows(), self.ncols()));
        if crs.nnz() > self.capacity {
            return Err(phase.capacity_error("matrix nonzero count", self.capacity));
        }
        self.ccs = crs.to_csc();
        self.crs = crs;
        Ok(())
    }

    /// Lanes are the rows of `A`, or of `Aᵀ` when `transpose` is set.
    pub(crate) fn rows(&self, transpose: bool) -> Compressed<'_, T> {
        if transpose {
            Compressed::from_csc(&self.ccs)
        } else {
            Compressed::from_csr(&self.crs)
        }
    }

    /// Lanes are the columns of `A`, or of `Aᵀ` when `transpose` is set.
    pub(crate) fn cols(&self, transpose: bool) -> Compressed<'_, T> {
        if transpose {
            Compressed::from_csr(&self.crs)
        } else {
            Compressed::from_csc(&self.ccs)
        }
    }
}

impl<T: Domain> Clone for Matrix<T> {
    /// A copy with a fresh identifier.
    fn clone(&self) -> Self {
        Self {
            id: ContainerId::next(),
            crs: self.crs.clone(),
            ccs: self.ccs.clone(),
            capacity: self.capacity,
        }
    }
}

impl<T: Domain> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {} (capacity {})", self.id, self.capacity)?;
        write!(f, "{:?}", self.crs)
    }
}
