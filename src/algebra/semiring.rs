//! Semirings: an additive monoid, a multiplicative operator and the
//! multiplicative identity.

use std::ops;

use tracing::warn;

use crate::algebra::domain::{Cast, Domain};
use crate::algebra::identities::{
    Identity, IdentityOf, Infinity, LogicalTrue, NegativeInfinity, One, Zero,
};
use crate::algebra::monoid::Monoid;
use crate::algebra::operators::{
    Add, Foldable, LeftAssignIf, LogicalAnd, LogicalOr, Max, Min, Mul, Operator, RightAssignIf,
};
use crate::error::{GrbError, Result};

/// What the primitives need from a semiring.
///
/// Products land in `Left × Right → Sum`; sums are folded in `Sum`, whose
/// additive identity is [`SemiringOps::zero`]. Pattern entries read as
/// [`SemiringOps::one_left`] or [`SemiringOps::one_right`], depending on
/// the side they multiply from.
pub trait SemiringOps: Clone + Send + Sync {
    type Left: Domain;
    type Right: Domain;
    type Sum: Domain;

    fn zero(&self) -> Self::Sum;
    fn one_left(&self) -> Self::Left;
    fn one_right(&self) -> Self::Right;
    fn multiply(&self, left: Self::Left, right: Self::Right) -> Self::Sum;
    fn add(&self, left: Self::Sum, right: Self::Sum) -> Self::Sum;
}

/// `(⊕, ⊗, 1)` with `0` the identity of `⊕`.
#[derive(Debug, Clone)]
pub struct Semiring<A: Foldable, M: Operator> {
    additive: Monoid<A>,
    multiplicative: M,
    one_left: M::D1,
    one_right: M::D2,
}

impl<A: Foldable, M: Operator> Semiring<A, M> {
    /// Assemble a semiring.
    ///
    /// # Errors
    ///
    /// `Illegal` if the additive operator is not both associative and
    /// commutative. Distributivity is not checked.
    pub fn new(
        additive: Monoid<A>,
        multiplicative: M,
        one_left: M::D1,
        one_right: M::D2,
    ) -> Result<Self> {
        let add = additive.op();
        if !(add.is_associative() && add.is_commutative()) {
            warn!(op = add.name(), "rejecting semiring additive operator");
            return Err(GrbError::illegal(format!(
                "additive operator `{}` must be associative and commutative",
                add.name()
            )));
        }
        Ok(Self {
            additive,
            multiplicative,
            one_left,
            one_right,
        })
    }

    /// Assemble a semiring from identity kinds: `Z` for the additive
    /// identity, `U` for the multiplicative one.
    pub fn with_identities<Z: Identity, U: Identity>(add: A, multiplicative: M) -> Result<Self>
    where
        A::D3: IdentityOf<Z>,
        M::D1: IdentityOf<U>,
        M::D2: IdentityOf<U>,
    {
        let additive = Monoid::with_identity::<Z>(add)?;
        Self::new(
            additive,
            multiplicative,
            <M::D1 as IdentityOf<U>>::identity(),
            <M::D2 as IdentityOf<U>>::identity(),
        )
    }

    pub fn additive(&self) -> &Monoid<A> {
        &self.additive
    }

    pub fn multiplicative(&self) -> &M {
        &self.multiplicative
    }
}

impl<A, M> SemiringOps for Semiring<A, M>
where
    A: Foldable,
    M: Operator,
    M::D3: Cast<A::D3>,
{
    type Left = M::D1;
    type Right = M::D2;
    type Sum = A::D3;

    #[inline]
    fn zero(&self) -> A::D3 {
        self.additive.identity()
    }

    #[inline]
    fn one_left(&self) -> M::D1 {
        self.one_left
    }

    #[inline]
    fn one_right(&self) -> M::D2 {
        self.one_right
    }

    #[inline]
    fn multiply(&self, left: M::D1, right: M::D2) -> A::D3 {
        self.multiplicative.apply(left, right).cast()
    }

    #[inline]
    fn add(&self, left: A::D3, right: A::D3) -> A::D3 {
        self.additive.fold(left, right)
    }
}

/// `(+, ×)` over `T`.
pub type PlusTimes<T> = Semiring<Add<T>, Mul<T>>;
/// `(min, +)` over `T`, the tropical semiring of shortest paths.
pub type MinPlus<T> = Semiring<Min<T>, Add<T>>;
/// `(max, +)` over `T`.
pub type MaxPlus<T> = Semiring<Max<T>, Add<T>>;
/// `(max, ×)` over `T`.
pub type MaxTimes<T> = Semiring<Max<T>, Mul<T>>;
/// `(min, ×)` over `T`.
pub type MinTimes<T> = Semiring<Min<T>, Mul<T>>;
/// `(∨, ∧)` over `bool`.
pub type LorLand = Semiring<LogicalOr<bool>, LogicalAnd<bool>>;
/// Counts the left values selected by a truthy right operand.
pub type PlusLeftAssignIf<T, B = bool> = Semiring<Add<T>, LeftAssignIf<T, B, T>>;
/// Counts the right values selected by a truthy left operand.
pub type PlusRightAssignIf<T, B = bool> = Semiring<Add<T>, RightAssignIf<B, T, T>>;

pub fn plus_times<T>() -> PlusTimes<T>
where
    T: Domain + Cast<T> + ops::Add<Output = T> + ops::Mul<Output = T>,
    T: IdentityOf<Zero> + IdentityOf<One>,
{
    Semiring {
        additive: Monoid::plus(),
        multiplicative: Mul::new(),
        one_left: <T as IdentityOf<One>>::identity(),
        one_right: <T as IdentityOf<One>>::identity(),
    }
}

pub fn min_plus<T>() -> MinPlus<T>
where
    T: Domain + Cast<T> + PartialOrd + ops::Add<Output = T>,
    T: IdentityOf<Infinity> + IdentityOf<Zero>,
{
    Semiring {
        additive: Monoid::min(),
        multiplicative: Add::new(),
        one_left: <T as IdentityOf<Zero>>::identity(),
        one_right: <T as IdentityOf<Zero>>::identity(),
    }
}

pub fn max_plus<T>() -> MaxPlus<T>
where
    T: Domain + Cast<T> + PartialOrd + ops::Add<Output = T>,
    T: IdentityOf<NegativeInfinity> + IdentityOf<Zero>,
{
    Semiring {
        additive: Monoid::max(),
        multiplicative: Add::new(),
        one_left: <T as IdentityOf<Zero>>::identity(),
        one_right: <T as IdentityOf<Zero>>::identity(),
    }
}

pub fn max_times<T>() -> MaxTimes<T>
where
    T: Domain + Cast<T> + PartialOrd + ops::Mul<Output = T>,
    T: IdentityOf<NegativeInfinity> + IdentityOf<One>,
{
    Semiring {
        additive: Monoid::max(),
        multiplicative: Mul::new(),
        one_left: <T as IdentityOf<One>>::identity(),
        one_right: <T as IdentityOf<One>>::identity(),
    }
}

pub fn min_times<T>() -> MinTimes<T>
where
    T: Domain + Cast<T> + PartialOrd + ops::Mul<Output = T>,
    T: IdentityOf<Infinity> + IdentityOf<One>,
{
    Semiring {
        additive: Monoid::min(),
        multiplicative: Mul::new(),
        one_left: <T as IdentityOf<One>>::identity(),
        one_right: <T as IdentityOf<One>>::identity(),
    }
}

pub fn lor_land() -> LorLand {
    Semiring {
        additive: Monoid::logical_or(),
        multiplicative: LogicalAnd::new(),
        one_left: true,
        one_right: true,
    }
}

pub fn plus_left_assign_if<T, B>() -> PlusLeftAssignIf<T, B>
where
    T: Domain + Cast<T> + ops::Add<Output = T> + IdentityOf<Zero> + IdentityOf<LogicalTrue>,
    B: Domain + Cast<bool> + IdentityOf<LogicalTrue>,
{
    Semiring {
        additive: Monoid::plus(),
        multiplicative: LeftAssignIf::new(),
        one_left: <T as IdentityOf<LogicalTrue>>::identity(),
        one_right: <B as IdentityOf<LogicalTrue>>::identity(),
    }
}

pub fn plus_right_assign_if<T, B>() -> PlusRightAssignIf<T, B>
where
    T: Domain + Cast<T> + ops::Add<Output = T> + IdentityOf<Zero> + IdentityOf<LogicalTrue>,
    B: Domain + Cast<bool> + IdentityOf<LogicalTrue>,
{
    Semiring {
        additive: Monoid::plus(),
        multiplicative: RightAssignIf::new(),
        one_left: <B as IdentityOf<LogicalTrue>>::identity(),
        one_right: <T as IdentityOf<LogicalTrue>>::identity(),
    }
}
