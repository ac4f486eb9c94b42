//! Reference implementations of the multiply primitives
//!
//! These use a hashmap accumulator per row. They are not optimized for
//! performance but give a correct result for any semiring, so tests and
//! the launcher's verification mode compare the real kernels against them.

use std::collections::HashMap;

use crate::algebra::{Cast, Domain, SemiringOps};
use crate::matrix::SparseMatrixCSR;

/// `C = A ⊕.⊗ B` computed row by row with a hashmap accumulator
///
/// Explicit zeros produced by the semiring are kept.
pub fn reference_mxm<R, TA, TB>(
    a: &SparseMatrixCSR<TA>,
    b: &SparseMatrixCSR<TB>,
    ring: &R,
) -> SparseMatrixCSR<R::Sum>
where
    R: SemiringOps,
    TA: Domain + Cast<R::Left>,
    TB: Domain + Cast<R::Right>,
{
    assert_eq!(
        a.n_cols, b.n_rows,
        "Matrix dimensions must be compatible for multiplication"
    );

    let mut row_ptr = Vec::with_capacity(a.n_rows + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for i in 0..a.n_rows {
        let mut accum: HashMap<usize, R::Sum> = HashMap::new();

        for (k, &a_val) in a.row_iter(i) {
            let left = a_val.cast_or(ring.one_left());
            for (j, &b_val) in b.row_iter(k) {
                let product = ring.multiply(left, b_val.cast_or(ring.one_right()));
                accum
                    .entry(j)
                    .and_modify(|acc| *acc = ring.add(*acc, product))
                    .or_insert(product);
            }
        }

        let mut row_entries: Vec<_> = accum.into_iter().collect();
        row_entries.sort_by_key(|&(col, _)| col);
        for (j, val) in row_entries {
            col_idx.push(j);
            values.push(val);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(a.n_rows, b.n_cols, row_ptr, col_idx, values)
}

/// `y = A ⊕.⊗ x` for a dense `x`, with `None` marking rows that received
/// no contribution.
pub fn reference_mxv<R, TA, TX>(a: &SparseMatrixCSR<TA>, x: &[TX], ring: &R) -> Vec<Option<R::Sum>>
where
    R: SemiringOps,
    TA: Domain + Cast<R::Left>,
    TX: Domain + Cast<R::Right>,
{
    assert_eq!(a.n_cols, x.len(), "Matrix and vector dimensions must agree");
    (0..a.n_rows)
        .map(|i| {
            a.row_iter(i)
                .map(|(j, &v)| {
                    ring.multiply(v.cast_or(ring.one_left()), x[j].cast_or(ring.one_right()))
                })
                .reduce(|acc, p| ring.add(acc, p))
        })
        .collect()
}
