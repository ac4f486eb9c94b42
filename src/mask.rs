//! Output masks.
//!
//! Whether position `i` participates:
//!
//! | structural | invert | condition                         |
//! |------------|--------|-----------------------------------|
//! | off        | off    | `m[i]` present and truthy         |
//! | off        | on     | `m[i]` absent or falsy            |
//! | on         | off    | `m[i]` present                    |
//! | on         | on     | `m[i]` absent                     |
//!
//! A call without a mask lets every position participate.

use crate::algebra::{Cast, Domain};
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::vector::{Vector, VectorStorage};

/// Pass as the mask argument of a primitive to run it unmasked.
pub const NO_MASK: Option<&'static Vector<bool>> = None;

pub(crate) struct MaskView<'a, M: Domain> {
    mask: Option<&'a VectorStorage<M>>,
    structural: bool,
    invert: bool,
}

impl<'a, M: Domain + Cast<bool>> MaskView<'a, M> {
    /// Interpret `mask` under `desc` for an output of size `n`.
    pub(crate) fn new(mask: Option<&'a Vector<M>>, desc: Descriptor, n: usize) -> Result<Self> {
        if let Some(m) = mask {
            if m.size() != n {
                return Err(GrbError::mismatch(format!(
                    "mask of size {} for output of size {}",
                    m.size(),
                    n
                )));
            }
        }
        Ok(Self {
            mask: mask.map(Vector::storage),
            structural: desc.structural(),
            invert: desc.invert_mask(),
        })
    }

    pub(crate) fn is_some(&self) -> bool {
        self.mask.is_some()
    }

    #[inline]
    pub(crate) fn permits(&self, i: usize) -> bool {
        let Some(mask) = self.mask else {
            return true;
        };
        let hit = match mask.get(i) {
            None => false,
            Some(_) if self.structural => true,
            Some(v) => v.cast_or(true),
        };
        hit != self.invert
    }

    /// Positions that can possibly participate, if fewer than all of them.
    ///
    /// Only a non-inverted mask narrows the candidates: its entries, in the
    /// mask's insertion order. Each candidate must still pass `permits`.
    pub(crate) fn candidates(&self) -> Option<&'a [usize]> {
        match self.mask {
            Some(mask) if !self.invert => Some(mask.coords.as_slice()),
            _ => None,
        }
    }

    /// Whether iterating `candidates` beats sweeping all `n` positions.
    pub(crate) fn is_sparse(&self, n: usize) -> bool {
        self.candidates().map_or(false, |c| c.len() < n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask() -> Vector<i32> {
        let mut m = Vector::new(4);
        m.set_element(1, 0).unwrap();
        m.set_element(0, 1).unwrap();
        m
    }

    #[test]
    fn test_unified_rule() {
        let m = mask();
        let cases = [
            (Descriptor::NO_OPERATION, [true, false, false, false]),
            (Descriptor::INVERT_MASK, [false, true, true, true]),
            (Descriptor::STRUCTURAL, [true, true, false, false]),
            (Descriptor::STRUCTURAL_COMPLEMENT, [false, false, true, true]),
        ];
        for (desc, expected) in cases {
            let view = MaskView::new(Some(&m), desc, 4).unwrap();
            let got: Vec<bool> = (0..4).map(|i| view.permits(i)).collect();
            assert_eq!(got, expected, "descriptor {}", desc);
        }
    }

    #[test]
    fn test_no_mask_permits_everything() {
        let view = MaskView::new(NO_MASK, Descriptor::INVERT_MASK, 3).unwrap();
        assert!((0..3).all(|i| view.permits(i)));
        assert!(view.candidates().is_none());
    }

    #[test]
    fn test_pattern_mask_reads_true() {
        let mut m = Vector::<()>::new(3);
        m.set_element((), 2).unwrap();
        let view = MaskView::new(Some(&m), Descriptor::NO_OPERATION, 3).unwrap();
        assert!(view.permits(2));
        assert!(!view.permits(0));
        assert_eq!(view.candidates(), Some(&[2usize][..]));
        assert!(view.is_sparse(3));
    }

    #[test]
    fn test_size_mismatch() {
        let m = mask();
        assert!(matches!(
            MaskView::new(Some(&m), Descriptor::NO_OPERATION, 5),
            Err(GrbError::Mismatch(_))
        ));
    }
}
