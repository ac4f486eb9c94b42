//! Keeping the entries of a matrix that satisfy a predicate.

use tracing::trace;

use crate::algebra::Domain;
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::matrix::{Matrix, SparseMatrixCSR};
use crate::phase::Phase;

/// Diagonal offset for [`tril`] and [`triu`]: `0` is the main diagonal,
/// positive offsets lie above it, negative ones below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset(pub isize);

impl Offset {
    pub const DIAGONAL: Self = Self(0);
    /// First diagonal strictly above the main one.
    pub const STRICT_UPPER: Self = Self(1);
    /// First diagonal strictly below the main one.
    pub const STRICT_LOWER: Self = Self(-1);

    /// Signed distance of `(i, j)` from the main diagonal.
    #[inline]
    fn of(i: usize, j: usize) -> isize {
        j as isize - i as isize
    }
}

/// `out` gets the entries `(i, j, v)` of `A` (of `Aᵀ` under
/// `TRANSPOSE_MATRIX`) for which `predicate(i, j, &v)` holds.
///
/// # Errors
///
/// `Mismatch` if `out` does not have the shape of the (transposed) input.
pub fn select<T, F>(
    out: &mut Matrix<T>,
    a: &Matrix<T>,
    predicate: F,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    T: Domain,
    F: Fn(usize, usize, &T) -> bool,
{
    let rows = a.rows(desc.transpose());
    if (out.nrows(), out.ncols()) != (rows.major, rows.minor) {
        return Err(GrbError::mismatch(format!(
            "select into a {}x{} matrix from a {}x{} one",
            out.nrows(),
            out.ncols(),
            rows.major,
            rows.minor
        )));
    }
    if phase.is_resize() {
        return out.resize(rows.nnz().max(out.nnz()));
    }

    let mut row_ptr = Vec::with_capacity(rows.major + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);
    for i in 0..rows.major {
        let (idx, vals) = rows.lane(i);
        for (&j, v) in idx.iter().zip(vals) {
            if predicate(i, j, v) {
                col_idx.push(j);
                values.push(*v);
            }
        }
        row_ptr.push(col_idx.len());
    }
    trace!(from = %a.id(), to = %out.id(), kept = col_idx.len(), of = rows.nnz(), "select");
    out.assign(
        SparseMatrixCSR {
            n_rows: rows.major,
            n_cols: rows.minor,
            row_ptr,
            col_idx,
            values,
        },
        phase,
    )
}

/// Entries on or below the diagonal `k`: `j - i <= k`.
pub fn tril<T: Domain>(
    out: &mut Matrix<T>,
    a: &Matrix<T>,
    k: Offset,
    desc: Descriptor,
    phase: Phase,
) -> Result<()> {
    select(out, a, |i, j, _| Offset::of(i, j) <= k.0, desc, phase)
}

/// Entries on or above the diagonal `k`: `j - i >= k`.
pub fn triu<T: Domain>(
    out: &mut Matrix<T>,
    a: &Matrix<T>,
    k: Offset,
    desc: Descriptor,
    phase: Phase,
) -> Result<()> {
    select(out, a, |i, j, _| Offset::of(i, j) >= k.0, desc, phase)
}
