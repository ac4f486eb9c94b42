//! Dense sparse accumulator (SPA)
//!
//! A dense value array indexed by column, plus a coordinate index recording
//! which columns are live. Accumulating is O(1) and resetting touches only
//! the live columns. Each thread keeps one SPA per element type, grown on
//! demand and never released between primitives.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use aligned_vec::AVec;
use tracing::trace;

use crate::accumulator::Accumulator;
use crate::algebra::Domain;
use crate::coordinates::Coordinates;

const ALIGN: usize = 64;

/// Dense accumulator for one output row (or one output vector)
pub struct DenseAccumulator<T> {
    /// The dense accumulation array
    values: AVec<T>,

    /// Live columns, in first-touch order
    coords: Coordinates,
}

impl<T: Domain> DenseAccumulator<T> {
    /// Create a new dense accumulator over columns `[0, n)`
    pub fn new(n: usize) -> Self {
        Self {
            values: AVec::from_iter(ALIGN, (0..n).map(|_| T::default())),
            coords: Coordinates::new(n),
        }
    }

    /// Number of columns the accumulator can address.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Grow to address at least `n` columns. Must be called while empty.
    fn ensure_size(&mut self, n: usize) {
        debug_assert!(self.coords.is_empty());
        if n > self.values.len() {
            trace!(from = self.values.len(), to = n, "growing SPA");
            *self = Self::new(n);
        }
    }

    /// Number of live columns.
    pub fn nnz(&self) -> usize {
        self.coords.nnz()
    }

    #[inline]
    pub fn get(&self, col: usize) -> Option<T> {
        if self.coords.contains(col) {
            Some(self.values[col])
        } else {
            None
        }
    }

    /// Live `(column, value)` pairs in first-touch order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.coords.iter().map(move |c| (c, self.values[c]))
    }
}

impl<T: Domain> Accumulator<T> for DenseAccumulator<T> {
    fn reset(&mut self) {
        self.coords.clear();
    }

    #[inline]
    fn accumulate(&mut self, col: usize, val: T, combine: &impl Fn(T, T) -> T) {
        if self.coords.set(col) {
            self.values[col] = val;
        } else {
            self.values[col] = combine(self.values[col], val);
        }
    }

    fn emit(&mut self, cols: &mut Vec<usize>, values: &mut Vec<T>, _combine: &impl Fn(T, T) -> T) {
        self.coords.sort();
        for c in self.coords.iter() {
            cols.push(c);
            values.push(self.values[c]);
        }
        self.reset();
    }

    fn len(&self) -> usize {
        self.coords.nnz()
    }
}

thread_local! {
    static SPA: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Run `f` with this thread's SPA for `T`, empty and addressing at least
/// `n` columns.
///
/// The SPA is taken out of the thread-local slot for the duration of `f`;
/// a nested call for the same `T` gets a fresh one.
pub fn with_spa<T: Domain, R>(n: usize, f: impl FnOnce(&mut DenseAccumulator<T>) -> R) -> R {
    let key = TypeId::of::<T>();
    let cached = SPA.with(|slot| slot.borrow_mut().remove(&key));
    let mut spa = cached
        .and_then(|boxed| boxed.downcast::<DenseAccumulator<T>>().ok())
        .map(|boxed| *boxed)
        .unwrap_or_else(|| DenseAccumulator::new(0));
    spa.reset();
    spa.ensure_size(n);

    let out = f(&mut spa);

    spa.reset();
    SPA.with(|slot| slot.borrow_mut().insert(key, Box::new(spa)));
    out
}
