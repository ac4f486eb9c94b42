//! Sort-based accumulator
//!
//! Collects intermediate products in an unsorted list, then sorts and merges
//! duplicate columns. Cheaper than the dense SPA when a row produces only a
//! handful of products.

use crate::accumulator::Accumulator;
use crate::algebra::Domain;

/// Sort-based accumulator for a single output row
pub struct SortAccumulator<T> {
    /// `(column, product)` in arrival order
    products: Vec<(usize, T)>,
}

impl<T: Domain> SortAccumulator<T> {
    pub fn new(initial_capacity: usize) -> Self {
        Self { products: Vec::with_capacity(initial_capacity) }
    }
}

impl<T: Domain> Accumulator<T> for SortAccumulator<T> {
    fn reset(&mut self) {
        self.products.clear();
    }

    #[inline]
    fn accumulate(&mut self, col: usize, val: T, _combine: &impl Fn(T, T) -> T) {
        self.products.push((col, val));
    }

    /// Sort by column and merge duplicates with `combine`, in the order the
    /// products were accumulated.
    fn emit(&mut self, cols: &mut Vec<usize>, values: &mut Vec<T>, combine: &impl Fn(T, T) -> T) {
        // stable: products of one column stay in arrival order
        self.products.sort_by_key(|&(col, _)| col);

        let mut products = self.products.drain(..);
        let Some((mut col, mut folded)) = products.next() else {
            return;
        };
        for (next_col, val) in products {
            if next_col == col {
                folded = combine(folded, val);
            } else {
                cols.push(col);
                values.push(folded);
                (col, folded) = (next_col, val);
            }
        }
        cols.push(col);
        values.push(folded);
    }

    /// Number of products collected, duplicates included.
    fn len(&self) -> usize {
        self.products.len()
    }
}
