//! Sparse vectors: a dense value array backed by a coordinate index.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::algebra::Domain;
use crate::alloc::{self, AllocMode};
use crate::coordinates::Coordinates;
use crate::error::{GrbError, Result};
use crate::id::ContainerId;
use crate::phase::Phase;

/// Storage shared between a vector and its pinned views.
#[derive(Debug, Clone)]
pub(crate) struct VectorStorage<T> {
    /// Length `n`; only positions present in `coords` are defined.
    pub(crate) values: Vec<T>,
    pub(crate) coords: Coordinates,
    pub(crate) capacity: usize,
}

impl<T: Domain> VectorStorage<T> {
    #[inline]
    pub(crate) fn get(&self, i: usize) -> Option<T> {
        if self.coords.contains(i) {
            Some(self.values[i])
        } else {
            None
        }
    }

    /// Write `value` at `i`, adding `i` to the pattern if needed.
    #[inline]
    pub(crate) fn write(&mut self, i: usize, value: T, phase: Phase) -> Result<()> {
        if !self.coords.contains(i) {
            if self.coords.nnz() == self.capacity {
                return Err(phase.capacity_error("vector nonzero count", self.capacity));
            }
            self.coords.set(i);
        }
        self.values[i] = value;
        Ok(())
    }

    /// Combine `value` into position `i` with `fold`, or write it if absent.
    #[inline]
    pub(crate) fn accumulate<F>(&mut self, i: usize, value: T, phase: Phase, fold: F) -> Result<()>
    where
        F: FnOnce(T, T) -> T,
    {
        if self.coords.contains(i) {
            self.values[i] = fold(self.values[i], value);
            Ok(())
        } else {
            self.write(i, value, phase)
        }
    }

    pub(crate) fn clear(&mut self) {
        self.coords.clear();
    }

    pub(crate) fn ensure_capacity(&mut self, capacity: usize) -> Result<()> {
        let capacity = capacity.min(self.values.len());
        if capacity > self.capacity {
            self.coords.reserve(capacity)?;
            self.capacity = capacity;
        }
        Ok(())
    }
}

/// A vector of size `n` with at most `capacity` present entries.
///
/// Position `i` holds a value iff it is in the coordinate index. `Vector<()>`
/// is a pattern vector.
pub struct Vector<T: Domain> {
    id: ContainerId,
    storage: Arc<VectorStorage<T>>,
}

impl<T: Domain> Vector<T> {
    /// An empty vector of size `n` with capacity `n`.
    pub fn new(n: usize) -> Self {
        Self {
            id: ContainerId::next(),
            storage: Arc::new(VectorStorage {
                values: vec![T::default(); n],
                coords: Coordinates::new(n),
                capacity: n,
            }),
        }
    }

    /// An empty vector of size `n` able to hold `capacity` entries; the
    /// capacity is clamped to `n`.
    pub fn with_capacity(n: usize, capacity: usize) -> Result<Self> {
        let capacity = capacity.min(n);
        let mut coords = Coordinates::try_new(n)?;
        coords.reserve(capacity)?;
        Ok(Self {
            id: ContainerId::next(),
            storage: Arc::new(VectorStorage {
                values: alloc::allocate(n, T::default(), AllocMode::Interleaved, "vector values")?,
                coords,
                capacity,
            }),
        })
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.storage.values.len()
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity
    }

    pub fn nnz(&self) -> usize {
        self.storage.coords.nnz()
    }

    pub fn is_dense(&self) -> bool {
        self.storage.coords.is_dense()
    }

    pub fn contains(&self, i: usize) -> bool {
        i < self.size() && self.storage.coords.contains(i)
    }

    /// The value at `i`, if present.
    pub fn get(&self, i: usize) -> Option<T> {
        if i < self.size() {
            self.storage.get(i)
        } else {
            None
        }
    }

    /// Present `(index, value)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, T)> + '_ {
        let storage = &*self.storage;
        storage.coords.iter().map(move |i| (i, storage.values[i]))
    }

    /// Present `(index, value)` pairs by ascending index.
    pub fn iter_sorted(&self) -> std::vec::IntoIter<(usize, T)> {
        let mut entries: Vec<(usize, T)> = self.iter().collect();
        entries.sort_unstable_by_key(|&(i, _)| i);
        entries.into_iter()
    }

    /// Write `value` at position `i`.
    ///
    /// # Errors
    ///
    /// `Mismatch` if `i` is out of range, `Illegal` if `i` is absent and the
    /// vector is at capacity.
    pub fn set_element(&mut self, value: T, i: usize) -> Result<()> {
        if i >= self.size() {
            return Err(GrbError::mismatch(format!(
                "index {} out of range for vector of size {}",
                i,
                self.size()
            )));
        }
        self.storage_mut().write(i, value, Phase::Execute)
    }

    /// Remove every entry; capacity is kept.
    pub fn clear(&mut self) {
        if self.nnz() > 0 {
            self.storage_mut().clear();
        }
    }

    /// Guarantee room for `capacity` entries (clamped to the size).
    ///
    /// # Errors
    ///
    /// `Illegal` if fewer than the current number of entries is requested,
    /// `OutOfMem` if the allocation fails.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.nnz() {
            return Err(GrbError::illegal(format!(
                "cannot shrink capacity to {} below {} present entries",
                capacity,
                self.nnz()
            )));
        }
        trace!(id = %self.id, capacity, "vector resize");
        self.storage_mut().ensure_capacity(capacity)
    }

    pub(crate) fn storage(&self) -> &VectorStorage<T> {
        &self.storage
    }

    /// Exclusive access to the storage; detaches from pinned views first.
    pub(crate) fn storage_mut(&mut self) -> &mut VectorStorage<T> {
        Arc::make_mut(&mut self.storage)
    }

    pub(crate) fn shared_storage(&self) -> Arc<VectorStorage<T>> {
        Arc::clone(&self.storage)
    }
}

impl<T: Domain> Clone for Vector<T> {
    /// A copy with a fresh identifier.
    fn clone(&self) -> Self {
        Self {
            id: ContainerId::next(),
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<T: Domain> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vector {{")?;
        writeln!(f, "  id: {}", self.id)?;
        writeln!(f, "  size: {}, capacity: {}, nnz: {}", self.size(), self.capacity(), self.nnz())?;
        let sample: Vec<_> = self.iter_sorted().take(8).collect();
        if !sample.is_empty() {
            write!(f, "  entries:")?;
            for (i, v) in &sample {
                write!(f, " ({}, {:?})", i, v)?;
            }
            if self.nnz() > sample.len() {
                write!(f, " ... ({} more)", self.nnz() - sample.len())?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_vector_is_empty() {
        let v = Vector::<f64>::new(5);
        assert_eq!(v.size(), 5);
        assert_eq!(v.capacity(), 5);
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.get(2), None);
    }

    #[test]
    fn test_set_element() {
        let mut v = Vector::<i32>::new(4);
        v.set_element(7, 2).unwrap();
        v.set_element(8, 2).unwrap();
        assert_eq!(v.get(2), Some(8));
        assert_eq!(v.nnz(), 1);
        assert!(matches!(v.set_element(1, 4), Err(GrbError::Mismatch(_))));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut v = Vector::<i32>::with_capacity(10, 1).unwrap();
        v.set_element(1, 0).unwrap();
        assert!(matches!(v.set_element(1, 1), Err(GrbError::Illegal(_))));
        v.resize(2).unwrap();
        v.set_element(1, 1).unwrap();
        assert!(v.nnz() <= v.capacity() && v.capacity() <= v.size());
    }

    #[test]
    fn test_capacity_clamped_to_size() {
        let v = Vector::<u8>::with_capacity(3, 100).unwrap();
        assert_eq!(v.capacity(), 3);
    }

    #[test]
    fn test_clone_takes_new_id_and_detaches() {
        let mut a = Vector::<f32>::new(3);
        a.set_element(1.0, 0).unwrap();
        let b = a.clone();
        assert_ne!(a.id(), b.id());
        a.set_element(2.0, 0).unwrap();
        assert_eq!(b.get(0), Some(1.0));
        assert_eq!(a.get(0), Some(2.0));
    }

    #[test]
    fn test_swap_exchanges_ids() {
        let mut a = Vector::<u8>::new(2);
        let mut b = Vector::<u8>::new(3);
        let (ida, idb) = (a.id(), b.id());
        std::mem::swap(&mut a, &mut b);
        assert_eq!(a.id(), idb);
        assert_eq!(b.id(), ida);
        assert_eq!(a.size(), 3);
    }

    #[test]
    fn test_iter_sorted() {
        let mut v = Vector::<u8>::new(6);
        v.set_element(5, 5).unwrap();
        v.set_element(1, 1).unwrap();
        assert_eq!(v.iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![5, 1]);
        assert_eq!(v.iter_sorted().collect::<Vec<_>>(), vec![(1, 1), (5, 5)]);
    }
}
