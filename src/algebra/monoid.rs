//! Monoids: an associative operator paired with its identity.

use std::ops;

use tracing::warn;

use crate::algebra::domain::{Cast, Domain};
use crate::algebra::identities::{
    Identity, IdentityOf, Infinity, LogicalFalse, LogicalTrue, NegativeInfinity, One, Zero,
};
use crate::algebra::operators::{
    Add, ArgMax, ArgMin, Foldable, LogicalAnd, LogicalOr, Max, Min, Mul,
};
use crate::error::{GrbError, Result};

/// An associative operator together with its identity element.
#[derive(Debug, Clone, Copy)]
pub struct Monoid<O: Foldable> {
    op: O,
    identity: O::D3,
}

impl<O: Foldable> Monoid<O> {
    /// Pair `op` with `identity`.
    ///
    /// # Errors
    ///
    /// `Illegal` if `op` does not declare itself associative. The identity law
    /// is the caller's responsibility.
    pub fn new(op: O, identity: O::D3) -> Result<Self> {
        if !op.is_associative() {
            warn!(op = op.name(), "rejecting non-associative monoid operator");
            return Err(GrbError::illegal(format!(
                "operator `{}` is not associative",
                op.name()
            )));
        }
        Ok(Self { op, identity })
    }

    /// Pair `op` with the identity of kind `I` in its result domain.
    pub fn with_identity<I: Identity>(op: O) -> Result<Self>
    where
        O::D3: IdentityOf<I>,
    {
        Self::new(op, <O::D3 as IdentityOf<I>>::identity())
    }

    pub fn op(&self) -> &O {
        &self.op
    }

    pub fn identity(&self) -> O::D3 {
        self.identity
    }

    /// `left ⊕ right`.
    #[inline]
    pub fn fold(&self, left: O::D3, right: O::D3) -> O::D3 {
        self.op.fold_values(left, right)
    }

    /// Fold every item of `values` into the identity, left to right.
    pub fn fold_all<I>(&self, values: I) -> O::D3
    where
        I: IntoIterator<Item = O::D3>,
    {
        values
            .into_iter()
            .fold(self.identity, |acc, v| self.op.fold_values(acc, v))
    }
}

// The standard monoids are built from operators known to be associative, so
// construction cannot fail.

impl<T> Monoid<Add<T>>
where
    T: Domain + Cast<T> + ops::Add<Output = T> + IdentityOf<Zero>,
{
    pub fn plus() -> Self {
        Self {
            op: Add::new(),
            identity: <T as IdentityOf<Zero>>::identity(),
        }
    }
}

impl<T> Monoid<Mul<T>>
where
    T: Domain + Cast<T> + ops::Mul<Output = T> + IdentityOf<One>,
{
    pub fn times() -> Self {
        Self {
            op: Mul::new(),
            identity: <T as IdentityOf<One>>::identity(),
        }
    }
}

impl<T> Monoid<Min<T>>
where
    T: Domain + Cast<T> + PartialOrd + IdentityOf<Infinity>,
{
    pub fn min() -> Self {
        Self {
            op: Min::new(),
            identity: <T as IdentityOf<Infinity>>::identity(),
        }
    }
}

impl<T> Monoid<Max<T>>
where
    T: Domain + Cast<T> + PartialOrd + IdentityOf<NegativeInfinity>,
{
    pub fn max() -> Self {
        Self {
            op: Max::new(),
            identity: <T as IdentityOf<NegativeInfinity>>::identity(),
        }
    }
}

impl<T> Monoid<LogicalOr<T>>
where
    T: Domain + Cast<T> + Cast<bool> + IdentityOf<LogicalFalse>,
    bool: Cast<T>,
{
    pub fn logical_or() -> Self {
        Self {
            op: LogicalOr::new(),
            identity: <T as IdentityOf<LogicalFalse>>::identity(),
        }
    }
}

impl<T> Monoid<LogicalAnd<T>>
where
    T: Domain + Cast<T> + Cast<bool> + IdentityOf<LogicalTrue>,
    bool: Cast<T>,
{
    pub fn logical_and() -> Self {
        Self {
            op: LogicalAnd::new(),
            identity: <T as IdentityOf<LogicalTrue>>::identity(),
        }
    }
}

impl<I, V> Monoid<ArgMin<I, V>>
where
    I: Domain + IdentityOf<Infinity>,
    V: Domain + PartialOrd + IdentityOf<Infinity>,
{
    pub fn argmin() -> Self {
        Self {
            op: ArgMin::new(),
            identity: <(I, V) as IdentityOf<Infinity>>::identity(),
        }
    }
}

impl<I, V> Monoid<ArgMax<I, V>>
where
    I: Domain + IdentityOf<NegativeInfinity>,
    V: Domain + PartialOrd + IdentityOf<NegativeInfinity>,
{
    pub fn argmax() -> Self {
        Self {
            op: ArgMax::new(),
            identity: <(I, V) as IdentityOf<NegativeInfinity>>::identity(),
        }
    }
}
