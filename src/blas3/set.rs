//! Matrix assignment, clearing and capacity management.

use tracing::trace;

use crate::algebra::{check_no_casting, Cast, Domain};
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::matrix::{Matrix, SparseMatrixCSR};
use crate::phase::Phase;

fn check_shape<A: Domain, B: Domain>(out: &Matrix<A>, input: &Matrix<B>) -> Result<()> {
    if (out.nrows(), out.ncols()) != (input.nrows(), input.ncols()) {
        return Err(GrbError::mismatch(format!(
            "cannot assign a {}x{} matrix to a {}x{} one",
            input.nrows(),
            input.ncols(),
            out.nrows(),
            out.ncols()
        )));
    }
    Ok(())
}

/// `out` takes the pattern of `input` with values from `value(v)`.
fn copy_pattern<TO, TI>(
    out: &mut Matrix<TO>,
    input: &Matrix<TI>,
    phase: Phase,
    value: impl Fn(TI) -> TO,
) -> Result<()>
where
    TO: Domain,
    TI: Domain,
{
    check_shape(out, input)?;
    if phase.is_resize() {
        return out.resize(input.nnz().max(out.nnz()));
    }
    let crs = input.crs();
    trace!(from = %input.id(), to = %out.id(), nnz = crs.nnz(), "set matrix");
    out.assign(
        SparseMatrixCSR {
            n_rows: crs.n_rows,
            n_cols: crs.n_cols,
            row_ptr: crs.row_ptr.clone(),
            col_idx: crs.col_idx.clone(),
            values: crs.values.iter().map(|&v| value(v)).collect(),
        },
        phase,
    )
}

/// Copy `input` into `out`, casting every value.
pub fn set_matrix<TO, TI>(
    out: &mut Matrix<TO>,
    input: &Matrix<TI>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TI: Domain + Cast<TO>,
{
    check_no_casting::<TI, TO>(desc, "input matrix")?;
    copy_pattern(out, input, phase, |v| v.cast())
}

/// Write `value` at every entry of `input`'s pattern; the values of
/// `input` are ignored.
pub fn set_matrix_pattern<TO, TI, TS>(
    out: &mut Matrix<TO>,
    input: &Matrix<TI>,
    value: TS,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TI: Domain,
    TS: Domain + Cast<TO>,
{
    check_no_casting::<TS, TO>(desc, "scalar")?;
    let value: TO = value.cast();
    copy_pattern(out, input, phase, |_| value)
}

/// Remove every entry of `a`; its capacity is kept.
pub fn clear_matrix<T: Domain>(a: &mut Matrix<T>) {
    a.clear();
}

/// Guarantee room for `capacity` entries in `a`.
///
/// # Errors
///
/// `Illegal` if `capacity` is below the current number of entries.
pub fn resize_matrix<T: Domain>(a: &mut Matrix<T>, capacity: usize) -> Result<()> {
    a.resize(capacity)
}
