//! Accumulators for intermediate products
//!
//! A row of an SpGEMM (or the whole output of an SpMV) is built by feeding
//! `(column, product)` pairs into an accumulator, which folds products that
//! land on the same column and then emits the row sorted by column. Rows
//! with few products use the sort-based accumulator; all others use the
//! thread-local dense SPA.

pub mod dense;
pub mod sort;

use crate::algebra::{Cast, Domain, SemiringOps};
use crate::matrix::view::Compressed;

pub use dense::{with_spa, DenseAccumulator};
pub use sort::SortAccumulator;

/// Strategy for folding intermediate products that share a column
///
/// `combine` must be the same function for every call between two resets.
pub trait Accumulator<T> {
    /// Drop every live entry without releasing storage.
    fn reset(&mut self);

    /// Fold `val` into column `col`; the first value for a column is stored
    /// as is.
    fn accumulate(&mut self, col: usize, val: T, combine: &impl Fn(T, T) -> T);

    /// Append the live entries to `cols`/`values` by ascending column, then
    /// reset.
    fn emit(&mut self, cols: &mut Vec<usize>, values: &mut Vec<T>, combine: &impl Fn(T, T) -> T);

    /// Number of pending entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Number of intermediate products a row of `A` generates against `B`.
pub(crate) fn row_products<TB: Domain>(a_cols: &[usize], b: &Compressed<'_, TB>) -> usize {
    a_cols.iter().map(|&k| b.lane_len(k)).sum()
}

/// Gustavson inner loop: fold `a_row ⊗ B` into `acc`.
pub(crate) fn multiply_row<R, TA, TB, A>(
    acc: &mut A,
    a_cols: &[usize],
    a_vals: &[TA],
    b: &Compressed<'_, TB>,
    ring: &R,
) where
    R: SemiringOps,
    TA: Domain + Cast<R::Left>,
    TB: Domain + Cast<R::Right>,
    A: Accumulator<R::Sum>,
{
    let add = |x: R::Sum, y: R::Sum| ring.add(x, y);
    for (&k, &a_val) in a_cols.iter().zip(a_vals) {
        let left = a_val.cast_or(ring.one_left());
        let (b_cols, b_vals) = b.lane(k);
        for (&j, &b_val) in b_cols.iter().zip(b_vals) {
            let product = ring.multiply(left, b_val.cast_or(ring.one_right()));
            acc.accumulate(j, product, &add);
        }
    }
}
