//! Read-only views of a vector that may outlive it.

use std::sync::Arc;

use crate::algebra::Domain;
use crate::id::ContainerId;
use crate::vector::{Vector, VectorStorage};

/// A pinned snapshot of a vector's nonzeroes.
///
/// The view shares storage with the vector it was taken from. Later writes
/// to the vector detach it from the view, so the view keeps seeing the
/// contents it was pinned with, and the storage lives as long as its longest
/// holder.
#[derive(Debug, Clone)]
pub struct PinnedVector<T: Domain> {
    id: ContainerId,
    storage: Arc<VectorStorage<T>>,
}

impl<T: Domain> PinnedVector<T> {
    pub fn new(vector: &Vector<T>) -> Self {
        Self {
            id: vector.id(),
            storage: vector.shared_storage(),
        }
    }

    /// Identifier of the pinned vector.
    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn size(&self) -> usize {
        self.storage.values.len()
    }

    pub fn nonzeroes(&self) -> usize {
        self.storage.coords.nnz()
    }

    /// Index of the `k`-th nonzero, `k < nonzeroes()`.
    pub fn nonzero_index(&self, k: usize) -> usize {
        self.storage.coords.index(k)
    }

    /// Value of the `k`-th nonzero, `k < nonzeroes()`.
    pub fn nonzero_value(&self, k: usize) -> T {
        self.storage.values[self.storage.coords.index(k)]
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, T)> + '_ {
        (0..self.nonzeroes()).map(move |k| (self.nonzero_index(k), self.nonzero_value(k)))
    }
}

impl<T: Domain> Vector<T> {
    /// Pin the current contents.
    pub fn pin(&self) -> PinnedVector<T> {
        PinnedVector::new(self)
    }
}
