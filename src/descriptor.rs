//! Descriptors: a runtime bitset that modifies how a primitive behaves.
//!
//! Bits compose with `|`:
//!
//! ```
//! use grb::Descriptor;
//!
//! let d = Descriptor::STRUCTURAL | Descriptor::INVERT_MASK;
//! assert_eq!(d, Descriptor::STRUCTURAL_COMPLEMENT);
//! assert!(d.contains(Descriptor::INVERT_MASK));
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bitset of flags passed to a primitive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Descriptor(u32);

impl Descriptor {
    /// No flags set.
    pub const NO_OPERATION: Self = Self(0);
    /// Absent or false mask entries include a position, present-and-true exclude it.
    pub const INVERT_MASK: Self = Self(1);
    /// Use the transpose of the supplied matrix.
    pub const TRANSPOSE_MATRIX: Self = Self(2);
    /// The caller guarantees that ingested input has no duplicates.
    pub const NO_DUPLICATES: Self = Self(4);
    /// Masks are interpreted by membership only, values are ignored.
    pub const STRUCTURAL: Self = Self(8);
    /// `STRUCTURAL | INVERT_MASK`.
    pub const STRUCTURAL_COMPLEMENT: Self = Self(8 | 1);
    /// All inputs and outputs are fully dense.
    pub const DENSE: Self = Self(16);
    /// Matrix arguments of `mxv`/`vxm` act as `A + I`.
    pub const ADD_IDENTITY: Self = Self(32);
    /// `set` writes the position index instead of the given value.
    pub const USE_INDEX: Self = Self(64);
    /// Domains of containers and operators must match exactly.
    pub const NO_CASTING: Self = Self(256);
    /// Keep explicitly computed zeroes as nonzeroes.
    pub const EXPLICIT_ZERO: Self = Self(512);
    /// The caller guarantees that aliased inputs and outputs are read and
    /// written on disjoint positions.
    pub const SAFE_OVERLAP: Self = Self(1024);
    /// Transpose the left matrix operand of `mxm`.
    pub const TRANSPOSE_LEFT: Self = Self(2048);
    /// Transpose the right matrix operand of `mxm`.
    pub const TRANSPOSE_RIGHT: Self = Self(4096);
    /// Fold results into the output instead of clearing it first.
    pub const IN_PLACE: Self = Self(1 << 14);

    const NAMES: [(Self, &'static str); 14] = [
        (Self::INVERT_MASK, "invert_mask"),
        (Self::TRANSPOSE_MATRIX, "transpose_matrix"),
        (Self::NO_DUPLICATES, "no_duplicates"),
        (Self::STRUCTURAL, "structural"),
        (Self::DENSE, "dense"),
        (Self::ADD_IDENTITY, "add_identity"),
        (Self::USE_INDEX, "use_index"),
        (Self::NO_CASTING, "no_casting"),
        (Self::EXPLICIT_ZERO, "explicit_zero"),
        (Self::SAFE_OVERLAP, "safe_overlap"),
        (Self::TRANSPOSE_LEFT, "transpose_left"),
        (Self::TRANSPOSE_RIGHT, "transpose_right"),
        (Self::IN_PLACE, "in_place"),
        (Self::NO_OPERATION, "no_operation"),
    ];

    /// Raw bit pattern.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `flags` is set in `self`.
    pub fn contains(self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// `self` without the bits of `flags`.
    pub fn without(self, flags: Self) -> Self {
        Self(self.0 & !flags.0)
    }

    pub fn invert_mask(self) -> bool {
        self.contains(Self::INVERT_MASK)
    }

    pub fn structural(self) -> bool {
        self.contains(Self::STRUCTURAL)
    }

    pub fn transpose(self) -> bool {
        self.contains(Self::TRANSPOSE_MATRIX)
    }

    pub fn dense(self) -> bool {
        self.contains(Self::DENSE)
    }

    pub fn in_place(self) -> bool {
        self.contains(Self::IN_PLACE)
    }

    pub fn no_casting(self) -> bool {
        self.contains(Self::NO_CASTING)
    }
}

impl BitOr for Descriptor {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Descriptor {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "no_operation");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES.iter() {
            if flag.0 != 0 && self.contains(*flag) {
                if !first {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}
