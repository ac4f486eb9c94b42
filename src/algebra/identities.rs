//! Identity kinds and their value in every domain.
//!
//! A kind is a marker type; `T: IdentityOf<Kind>` supplies the value of that
//! kind in domain `T`. Pairs take their identity component-wise.

use num_traits::{Bounded, Float};

/// Marker trait of identity kinds.
pub trait Identity {
    const NAME: &'static str;
}

/// Value of the identity kind `I` in the implementing domain.
pub trait IdentityOf<I: Identity> {
    fn identity() -> Self;
}

macro_rules! identity_kinds {
    ($($(#[$doc:meta])* $kind:ident => $name:literal),* $(,)?) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $kind;

            impl Identity for $kind {
                const NAME: &'static str = $name;
            }
        )*
    };
}

identity_kinds! {
    /// Additive identity.
    Zero => "zero",
    /// Multiplicative identity.
    One => "one",
    /// Identity of `min`: the largest value of the domain.
    Infinity => "infinity",
    /// Identity of `max`: the smallest value of the domain.
    NegativeInfinity => "negative_infinity",
    /// Identity of logical and.
    LogicalTrue => "logical_true",
    /// Identity of logical or.
    LogicalFalse => "logical_false",
}

macro_rules! integer_identities {
    ($($t:ty),*) => {
        $(
            impl IdentityOf<Zero> for $t {
                fn identity() -> Self { 0 }
            }
            impl IdentityOf<One> for $t {
                fn identity() -> Self { 1 }
            }
            impl IdentityOf<Infinity> for $t {
                fn identity() -> Self { <$t as Bounded>::max_value() }
            }
            impl IdentityOf<NegativeInfinity> for $t {
                fn identity() -> Self { <$t as Bounded>::min_value() }
            }
            impl IdentityOf<LogicalTrue> for $t {
                fn identity() -> Self { 1 }
            }
            impl IdentityOf<LogicalFalse> for $t {
                fn identity() -> Self { 0 }
            }
        )*
    };
}

macro_rules! float_identities {
    ($($t:ty),*) => {
        $(
            impl IdentityOf<Zero> for $t {
                fn identity() -> Self { 0.0 }
            }
            impl IdentityOf<One> for $t {
                fn identity() -> Self { 1.0 }
            }
            impl IdentityOf<Infinity> for $t {
                fn identity() -> Self { <$t as Float>::infinity() }
            }
            impl IdentityOf<NegativeInfinity> for $t {
                fn identity() -> Self { <$t as Float>::neg_infinity() }
            }
            impl IdentityOf<LogicalTrue> for $t {
                fn identity() -> Self { 1.0 }
            }
            impl IdentityOf<LogicalFalse> for $t {
                fn identity() -> Self { 0.0 }
            }
        )*
    };
}

integer_identities!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
float_identities!(f32, f64);

impl IdentityOf<Zero> for bool {
    fn identity() -> Self {
        false
    }
}

impl IdentityOf<One> for bool {
    fn identity() -> Self {
        true
    }
}

impl IdentityOf<Infinity> for bool {
    fn identity() -> Self {
        true
    }
}

impl IdentityOf<NegativeInfinity> for bool {
    fn identity() -> Self {
        false
    }
}

impl IdentityOf<LogicalTrue> for bool {
    fn identity() -> Self {
        true
    }
}

impl IdentityOf<LogicalFalse> for bool {
    fn identity() -> Self {
        false
    }
}

impl<I: Identity, A: IdentityOf<I>, B: IdentityOf<I>> IdentityOf<I> for (A, B) {
    fn identity() -> Self {
        (A::identity(), B::identity())
    }
}

/// The unit domain has a single value, which is every identity.
impl<I: Identity> IdentityOf<I> for () {
    fn identity() -> Self {}
}

/// Shorthand for `<T as IdentityOf<I>>::identity()`.
pub fn identity<I: Identity, T: IdentityOf<I>>() -> T {
    T::identity()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_identities() {
        assert_eq!(identity::<Zero, i32>(), 0);
        assert_eq!(identity::<Infinity, u8>(), u8::MAX);
        assert_eq!(identity::<NegativeInfinity, u8>(), 0);
        assert_eq!(identity::<Infinity, f64>(), f64::INFINITY);
        assert!(identity::<LogicalTrue, bool>());
    }

    #[test]
    fn test_pair_identity_is_componentwise() {
        let id: (usize, f64) = identity::<Infinity, _>();
        assert_eq!(id, (usize::MAX, f64::INFINITY));
    }

    #[test]
    fn test_names() {
        assert_eq!(Zero::NAME, "zero");
        assert_eq!(LogicalFalse::NAME, "logical_false");
    }
}
