//! Level-1 primitives: vector–vector and vector–scalar operations.
//!
//! Every primitive takes a [`Descriptor`] and a [`Phase`]. Under `Resize`
//! it only grows the output to an upper bound on the entries it may write;
//! under `Execute` or `Try` it computes within the capacity present.
//! Outputs are cleared first unless `IN_PLACE` is given, in which case
//! results are folded into the existing entries.

pub mod ewise;
pub mod fold;
pub mod set;
pub mod zip;

use crate::algebra::Domain;
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::phase::Phase;
use crate::vector::Vector;

pub use ewise::{
    dot, e_wise_apply, e_wise_apply_monoid, e_wise_apply_scalar_left, e_wise_apply_scalar_right,
    e_wise_mul_add, Operand,
};
pub use fold::{foldl, foldl_reduce, foldl_scalar, foldr, foldr_reduce, foldr_scalar, reduce};
pub use set::{set_index, set_masked_vector, set_scalar, set_vector};
pub use zip::{unzip, zip};

pub(crate) fn check_size(role: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(GrbError::mismatch(format!(
            "{} has size {}, expected {}",
            role, got, expected
        )));
    }
    Ok(())
}

/// Under `DENSE`, every vector argument must be fully populated.
pub(crate) fn check_dense<T: Domain>(desc: Descriptor, v: &Vector<T>, role: &str) -> Result<()> {
    if desc.dense() && !v.is_dense() {
        return Err(GrbError::illegal(format!(
            "{} is not dense ({} of {} entries) under the dense descriptor",
            role,
            v.nnz(),
            v.size()
        )));
    }
    Ok(())
}

/// Shared preamble of every vector-output primitive.
///
/// Under `Resize` grows `out` so that `bound` more entries fit and returns
/// `false`: the caller is done. Otherwise clears `out` unless `IN_PLACE` is
/// set and returns `true`.
pub(crate) fn begin_output<T: Domain>(
    out: &mut Vector<T>,
    desc: Descriptor,
    phase: Phase,
    bound: usize,
) -> Result<bool> {
    if phase.is_resize() {
        let kept = if desc.in_place() { out.nnz() } else { 0 };
        let required = kept.saturating_add(bound).min(out.size());
        if required > out.capacity() {
            out.resize(required)?;
        }
        return Ok(false);
    }
    if !desc.in_place() {
        out.clear();
    }
    Ok(true)
}
