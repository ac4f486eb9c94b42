//! Algebraic structures the primitives are parameterized by.

pub mod domain;
pub mod identities;
pub mod monoid;
pub mod operators;
pub mod semiring;

use std::any::{type_name, TypeId};

use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};

pub use domain::{Cast, Domain};
pub use identities::{
    Identity, IdentityOf, Infinity, LogicalFalse, LogicalTrue, NegativeInfinity, One, Zero,
};
pub use monoid::Monoid;
pub use operators::{BinaryOp, Foldable, Operator};
pub use semiring::{Semiring, SemiringOps};

/// Under `NO_CASTING`, fail unless the container domain `C` equals the
/// operator domain `D`.
pub(crate) fn check_no_casting<C: 'static, D: 'static>(desc: Descriptor, role: &str) -> Result<()> {
    if desc.no_casting() && TypeId::of::<C>() != TypeId::of::<D>() {
        return Err(GrbError::illegal(format!(
            "no_casting: {} has domain {} but the operator expects {}",
            role,
            type_name::<C>(),
            type_name::<D>()
        )));
    }
    Ok(())
}

/// Fail when a pattern container (domain `()`) would have to supply values
/// for a valued domain `D`; without an operator that implies a value, there
/// is nothing to read.
pub(crate) fn check_not_pattern<C: 'static, D: 'static>(role: &str) -> Result<()> {
    if TypeId::of::<C>() == TypeId::of::<()>() && TypeId::of::<D>() != TypeId::of::<()>() {
        return Err(GrbError::illegal(format!(
            "{} is a pattern container and cannot be read as {}",
            role,
            type_name::<D>()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_no_casting() {
        assert!(check_no_casting::<f64, f64>(Descriptor::NO_CASTING, "x").is_ok());
        assert!(check_no_casting::<f32, f64>(Descriptor::NO_OPERATION, "x").is_ok());
        let err = check_no_casting::<f32, f64>(Descriptor::NO_CASTING, "x").unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
    }

    #[test]
    fn test_check_not_pattern() {
        assert!(check_not_pattern::<(), ()>("x").is_ok());
        assert!(check_not_pattern::<f64, i32>("x").is_ok());
        let err = check_not_pattern::<(), f64>("x").unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
    }
}
