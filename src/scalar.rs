//! Scalars with an initialization flag.

use crate::algebra::Domain;

/// A single value that may not have been set yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scalar<T> {
    value: T,
    initialized: bool,
}

impl<T: Domain> Scalar<T> {
    /// An uninitialized scalar.
    pub fn new() -> Self {
        Self {
            value: T::default(),
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn value(&self) -> Option<T> {
        self.initialized.then_some(self.value)
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.initialized = true;
    }

    pub fn clear(&mut self) {
        self.initialized = false;
    }

    /// The value, or `fallback` when uninitialized.
    pub fn value_or(&self, fallback: T) -> T {
        if self.initialized {
            self.value
        } else {
            fallback
        }
    }
}

impl<T: Domain> From<T> for Scalar<T> {
    fn from(value: T) -> Self {
        Self {
            value,
            initialized: true,
        }
    }
}
