//! Coordinate index: the set of present positions of a sparse vector.
//!
//! A dense stack holds the members in insertion order; a position array maps
//! each member back to its slot in the stack. Membership tests and inserts
//! are O(1), and clearing only touches the members.

use crate::alloc::{self, AllocMode};
use crate::error::Result;

const ABSENT: usize = usize::MAX;

/// Set of integers in `[0, size)`.
#[derive(Debug, Clone, Default)]
pub struct Coordinates {
    stack: Vec<usize>,
    position: Vec<usize>,
}

impl Coordinates {
    /// An empty set over `[0, size)`.
    pub fn new(size: usize) -> Self {
        Self {
            stack: Vec::new(),
            position: vec![ABSENT; size],
        }
    }

    /// Like [`Coordinates::new`], reporting allocation failure as `OutOfMem`.
    pub fn try_new(size: usize) -> Result<Self> {
        Ok(Self {
            stack: Vec::new(),
            position: alloc::allocate(size, ABSENT, AllocMode::Interleaved, "coordinates")?,
        })
    }

    /// Universe size.
    pub fn size(&self) -> usize {
        self.position.len()
    }

    /// Number of members.
    pub fn nnz(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether every position is a member.
    pub fn is_dense(&self) -> bool {
        self.stack.len() == self.position.len()
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.position[i] != ABSENT
    }

    /// Insert `i`; returns whether it was newly added.
    #[inline]
    pub fn set(&mut self, i: usize) -> bool {
        if self.position[i] != ABSENT {
            return false;
        }
        self.position[i] = self.stack.len();
        self.stack.push(i);
        true
    }

    /// The `k`-th member in insertion order.
    #[inline]
    pub fn index(&self, k: usize) -> usize {
        self.stack[k]
    }

    /// Members in insertion order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, usize>> {
        self.stack.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.stack
    }

    /// Remove every member, in time proportional to their number.
    pub fn clear(&mut self) {
        for &i in &self.stack {
            self.position[i] = ABSENT;
        }
        self.stack.clear();
    }

    /// Make every position a member.
    pub fn assign_all(&mut self) {
        if self.is_dense() {
            return;
        }
        self.stack.clear();
        self.stack.extend(0..self.position.len());
        for (k, p) in self.position.iter_mut().enumerate() {
            *p = k;
        }
    }

    /// Reserve room for `capacity` members so inserts never reallocate.
    pub(crate) fn reserve(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity.saturating_sub(self.stack.len());
        alloc::reserve(&mut self.stack, additional, AllocMode::Interleaved, "coordinate stack")
    }

    /// Sort the stack so that iteration is ascending.
    pub(crate) fn sort(&mut self) {
        self.stack.sort_unstable();
        for (k, &i) in self.stack.iter().enumerate() {
            self.position[i] = k;
        }
    }

    #[cfg(test)]
    fn consistent(&self) -> bool {
        self.stack.iter().enumerate().all(|(k, &i)| self.position[i] == k)
            && self.position.iter().filter(|&&p| p != ABSENT).count() == self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_contains() {
        let mut c = Coordinates::new(8);
        assert!(c.set(3));
        assert!(c.set(1));
        assert!(!c.set(3));
        assert!(c.contains(1));
        assert!(!c.contains(0));
        assert_eq!(c.nnz(), 2);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![3, 1]);
        assert!(c.consistent());
    }

    #[test]
    fn test_clear_resets_membership() {
        let mut c = Coordinates::try_new(5).unwrap();
        c.set(4);
        c.set(0);
        c.clear();
        assert!(c.is_empty());
        assert!(!c.contains(4));
        assert!(c.consistent());
    }

    #[test]
    fn test_assign_all_and_sort() {
        let mut c = Coordinates::new(4);
        c.set(2);
        c.assign_all();
        assert!(c.is_dense());
        assert!(c.consistent());

        let mut c = Coordinates::new(6);
        for i in [5, 2, 4] {
            c.set(i);
        }
        c.sort();
        assert_eq!(c.as_slice(), &[2, 4, 5]);
        assert_eq!(c.index(1), 4);
        assert!(c.consistent());
    }
}
