//! Binary operators with fixed domains and algebraic trait flags.
//!
//! Standard operators are zero-sized generic structs over their left, right
//! and result domains `L`, `R`, `O`; both operands are cast into the result
//! domain before the operation is applied, unless noted otherwise. User
//! functions are wrapped with [`BinaryOp`].

use std::fmt;
use std::marker::PhantomData;
use std::ops;

use crate::algebra::domain::{Cast, Domain};

/// A binary function `D1 × D2 → D3`.
pub trait Operator: Clone + Send + Sync {
    type D1: Domain;
    type D2: Domain;
    type D3: Domain;

    fn apply(&self, left: Self::D1, right: Self::D2) -> Self::D3;

    fn is_associative(&self) -> bool {
        false
    }

    fn is_commutative(&self) -> bool {
        false
    }

    fn is_idempotent(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

/// Operators whose result can be fed back into either operand slot, which is
/// what repeated folding needs.
pub trait Foldable: Operator {
    fn fold_values(&self, left: Self::D3, right: Self::D3) -> Self::D3;
}

impl<T> Foldable for T
where
    T: Operator,
    T::D3: Cast<T::D1> + Cast<T::D2>,
{
    #[inline]
    fn fold_values(&self, left: T::D3, right: T::D3) -> T::D3 {
        self.apply(
            <T::D3 as Cast<T::D1>>::cast(left),
            <T::D3 as Cast<T::D2>>::cast(right),
        )
    }
}

macro_rules! operator_struct {
    ($($(#[$doc:meta])* $name:ident<O = $o:ty>;)*) => {
        $(
            $(#[$doc])*
            pub struct $name<L, R = L, O = $o>(PhantomData<fn(L, R) -> O>);

            impl<L, R, O> $name<L, R, O> {
                pub const fn new() -> Self {
                    Self(PhantomData)
                }
            }

            impl<L, R, O> Default for $name<L, R, O> {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl<L, R, O> Clone for $name<L, R, O> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<L, R, O> Copy for $name<L, R, O> {}

            impl<L, R, O> fmt::Debug for $name<L, R, O> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        )*
    };
}

operator_struct! {
    /// `a + b`
    Add<O = L>;
    /// `a - b`
    Subtract<O = L>;
    /// `a * b`
    Mul<O = L>;
    /// `a / b`
    Divide<O = L>;
    /// `b / a`
    DivideReverse<O = L>;
    /// The smaller operand.
    Min<O = L>;
    /// The larger operand.
    Max<O = L>;
    /// `max(a, b)`, named after its use as an activation.
    Relu<O = L>;
    /// `|a - b|`
    AbsDiff<O = L>;
    /// `(a - b)²`
    SquareDiff<O = L>;
    /// `a && b` on truth values.
    LogicalAnd<O = L>;
    /// `a || b` on truth values.
    LogicalOr<O = L>;
    /// `a != b` on truth values.
    LogicalXor<O = L>;
    /// `a == b` on truth values.
    LogicalXnor<O = L>;
    /// `a` if it is truthy, otherwise `b`.
    AnyOr<O = L>;
    /// Always `a`.
    LeftAssign<O = L>;
    /// Always `b`.
    RightAssign<O = L>;
    /// `a` if `b` is truthy, otherwise the default value.
    LeftAssignIf<O = L>;
    /// `b` if `a` is truthy, otherwise the default value.
    RightAssignIf<O = R>;
    /// `a == b`, compared in the left domain.
    Equal<O = bool>;
    /// `a != b`, compared in the left domain.
    NotEqual<O = bool>;
    /// `a < b`, compared in the left domain.
    LessThan<O = bool>;
    /// `a <= b`, compared in the left domain.
    Leq<O = bool>;
    /// `a > b`, compared in the left domain.
    GreaterThan<O = bool>;
    /// `a >= b`, compared in the left domain.
    Geq<O = bool>;
}

macro_rules! arithmetic_operator {
    ($name:ident, $label:literal, [$($bound:tt)+], |$a:ident, $b:ident| $body:expr,
     assoc: $assoc:expr, comm: $comm:expr, idem: $idem:expr) => {
        impl<L, R, O> Operator for $name<L, R, O>
        where
            L: Domain + Cast<O>,
            R: Domain + Cast<O>,
            O: Domain + $($bound)+,
        {
            type D1 = L;
            type D2 = R;
            type D3 = O;

            #[inline]
            fn apply(&self, left: L, right: R) -> O {
                let $a: O = left.cast();
                let $b: O = right.cast();
                $body
            }

            fn is_associative(&self) -> bool {
                $assoc
            }

            fn is_commutative(&self) -> bool {
                $comm
            }

            fn is_idempotent(&self) -> bool {
                $idem
            }

            fn name(&self) -> &'static str {
                $label
            }
        }
    };
}

arithmetic_operator!(Add, "add", [ops::Add<Output = O>], |a, b| a + b,
    assoc: true, comm: true, idem: false);
arithmetic_operator!(Subtract, "subtract", [ops::Sub<Output = O>], |a, b| a - b,
    assoc: false, comm: false, idem: false);
arithmetic_operator!(Mul, "mul", [ops::Mul<Output = O>], |a, b| a * b,
    assoc: true, comm: true, idem: false);
arithmetic_operator!(Divide, "divide", [ops::Div<Output = O>], |a, b| a / b,
    assoc: false, comm: false, idem: false);
arithmetic_operator!(DivideReverse, "divide_reverse", [ops::Div<Output = O>], |a, b| b / a,
    assoc: false, comm: false, idem: false);
arithmetic_operator!(Min, "min", [PartialOrd], |a, b| if b < a { b } else { a },
    assoc: true, comm: true, idem: true);
arithmetic_operator!(Max, "max", [PartialOrd], |a, b| if b > a { b } else { a },
    assoc: true, comm: true, idem: true);
arithmetic_operator!(Relu, "relu", [PartialOrd], |a, b| if b > a { b } else { a },
    assoc: true, comm: true, idem: true);
arithmetic_operator!(AbsDiff, "abs_diff", [PartialOrd + ops::Sub<Output = O>],
    |a, b| if a > b { a - b } else { b - a },
    assoc: false, comm: true, idem: false);
arithmetic_operator!(SquareDiff, "square_diff",
    [PartialOrd + ops::Sub<Output = O> + ops::Mul<Output = O>],
    |a, b| {
        let d = if a > b { a - b } else { b - a };
        d * d
    },
    assoc: false, comm: true, idem: false);

macro_rules! logical_operator {
    ($name:ident, $label:literal, |$a:ident, $b:ident| $body:expr,
     assoc: $assoc:expr, comm: $comm:expr, idem: $idem:expr) => {
        impl<L, R, O> Operator for $name<L, R, O>
        where
            L: Domain + Cast<bool>,
            R: Domain + Cast<bool>,
            O: Domain,
            bool: Cast<O>,
        {
            type D1 = L;
            type D2 = R;
            type D3 = O;

            #[inline]
            fn apply(&self, left: L, right: R) -> O {
                let $a: bool = left.cast();
                let $b: bool = right.cast();
                let result: bool = $body;
                result.cast()
            }

            fn is_associative(&self) -> bool {
                $assoc
            }

            fn is_commutative(&self) -> bool {
                $comm
            }

            fn is_idempotent(&self) -> bool {
                $idem
            }

            fn name(&self) -> &'static str {
                $label
            }
        }
    };
}

logical_operator!(LogicalAnd, "logical_and", |a, b| a && b,
    assoc: true, comm: true, idem: true);
logical_operator!(LogicalOr, "logical_or", |a, b| a || b,
    assoc: true, comm: true, idem: true);
logical_operator!(LogicalXor, "logical_xor", |a, b| a != b,
    assoc: true, comm: true, idem: false);
logical_operator!(LogicalXnor, "logical_xnor", |a, b| a == b,
    assoc: true, comm: true, idem: false);

macro_rules! comparison_operator {
    ($name:ident, $label:literal, [$($bound:tt)+], |$a:ident, $b:ident| $body:expr,
     comm: $comm:expr) => {
        impl<L, R, O> Operator for $name<L, R, O>
        where
            L: Domain + $($bound)+,
            R: Domain + Cast<L>,
            O: Domain,
            bool: Cast<O>,
        {
            type D1 = L;
            type D2 = R;
            type D3 = O;

            #[inline]
            fn apply(&self, left: L, right: R) -> O {
                let $a = left;
                let $b: L = right.cast();
                let result: bool = $body;
                result.cast()
            }

            fn is_commutative(&self) -> bool {
                $comm
            }

            fn name(&self) -> &'static str {
                $label
            }
        }
    };
}

comparison_operator!(Equal, "equal", [PartialEq], |a, b| a == b, comm: true);
comparison_operator!(NotEqual, "not_equal", [PartialEq], |a, b| a != b, comm: true);
comparison_operator!(LessThan, "less_than", [PartialOrd], |a, b| a < b, comm: false);
comparison_operator!(Leq, "leq", [PartialOrd], |a, b| a <= b, comm: false);
comparison_operator!(GreaterThan, "greater_than", [PartialOrd], |a, b| a > b, comm: false);
comparison_operator!(Geq, "geq", [PartialOrd], |a, b| a >= b, comm: false);

impl<L, R, O> Operator for AnyOr<L, R, O>
where
    L: Domain + Cast<bool> + Cast<O>,
    R: Domain + Cast<O>,
    O: Domain,
{
    type D1 = L;
    type D2 = R;
    type D3 = O;

    #[inline]
    fn apply(&self, left: L, right: R) -> O {
        if <L as Cast<bool>>::cast(left) {
            <L as Cast<O>>::cast(left)
        } else {
            right.cast()
        }
    }

    fn is_associative(&self) -> bool {
        true
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "any_or"
    }
}

impl<L, R, O> Operator for LeftAssign<L, R, O>
where
    L: Domain + Cast<O>,
    R: Domain,
    O: Domain,
{
    type D1 = L;
    type D2 = R;
    type D3 = O;

    #[inline]
    fn apply(&self, left: L, _right: R) -> O {
        left.cast()
    }

    fn is_associative(&self) -> bool {
        true
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "left_assign"
    }
}

impl<L, R, O> Operator for RightAssign<L, R, O>
where
    L: Domain,
    R: Domain + Cast<O>,
    O: Domain,
{
    type D1 = L;
    type D2 = R;
    type D3 = O;

    #[inline]
    fn apply(&self, _left: L, right: R) -> O {
        right.cast()
    }

    fn is_associative(&self) -> bool {
        true
    }

    fn is_idempotent(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "right_assign"
    }
}

impl<L, R, O> Operator for LeftAssignIf<L, R, O>
where
    L: Domain + Cast<O>,
    R: Domain + Cast<bool>,
    O: Domain,
{
    type D1 = L;
    type D2 = R;
    type D3 = O;

    #[inline]
    fn apply(&self, left: L, right: R) -> O {
        if right.cast() {
            left.cast()
        } else {
            O::default()
        }
    }

    fn is_associative(&self) -> bool {
        true
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "left_assign_if"
    }
}

impl<L, R, O> Operator for RightAssignIf<L, R, O>
where
    L: Domain + Cast<bool>,
    R: Domain + Cast<O>,
    O: Domain,
{
    type D1 = L;
    type D2 = R;
    type D3 = O;

    #[inline]
    fn apply(&self, left: L, right: R) -> O {
        if left.cast() {
            right.cast()
        } else {
            O::default()
        }
    }

    fn is_associative(&self) -> bool {
        true
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "right_assign_if"
    }
}

macro_rules! pair_operator_struct {
    ($($(#[$doc:meta])* $name:ident;)*) => {
        $(
            $(#[$doc])*
            pub struct $name<I, V>(PhantomData<fn(I, V)>);

            impl<I, V> $name<I, V> {
                pub const fn new() -> Self {
                    Self(PhantomData)
                }
            }

            impl<I, V> Default for $name<I, V> {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl<I, V> Clone for $name<I, V> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<I, V> Copy for $name<I, V> {}

            impl<I, V> fmt::Debug for $name<I, V> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        )*
    };
}

pair_operator_struct! {
    /// On `(index, value)` pairs: the left pair if its value is strictly
    /// smaller, otherwise the right pair.
    ArgMin;
    /// On `(index, value)` pairs: the left pair if its value is strictly
    /// larger, otherwise the right pair.
    ArgMax;
    /// Combines `a` and `b` into the pair `(a, b)`.
    Zip;
    /// On `(index, value)` pairs: whether the indices are equal.
    EqualFirst;
}

impl<I, V> Operator for ArgMin<I, V>
where
    I: Domain,
    V: Domain + PartialOrd,
{
    type D1 = (I, V);
    type D2 = (I, V);
    type D3 = (I, V);

    #[inline]
    fn apply(&self, left: (I, V), right: (I, V)) -> (I, V) {
        if left.1 < right.1 {
            left
        } else {
            right
        }
    }

    fn is_associative(&self) -> bool {
        true
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "argmin"
    }
}

impl<I, V> Operator for ArgMax<I, V>
where
    I: Domain,
    V: Domain + PartialOrd,
{
    type D1 = (I, V);
    type D2 = (I, V);
    type D3 = (I, V);

    #[inline]
    fn apply(&self, left: (I, V), right: (I, V)) -> (I, V) {
        if left.1 > right.1 {
            left
        } else {
            right
        }
    }

    fn is_associative(&self) -> bool {
        true
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "argmax"
    }
}

impl<A, B> Operator for Zip<A, B>
where
    A: Domain,
    B: Domain,
{
    type D1 = A;
    type D2 = B;
    type D3 = (A, B);

    #[inline]
    fn apply(&self, left: A, right: B) -> (A, B) {
        (left, right)
    }

    fn name(&self) -> &'static str {
        "zip"
    }
}

impl<I, V> Operator for EqualFirst<I, V>
where
    I: Domain + PartialEq,
    V: Domain,
{
    type D1 = (I, V);
    type D2 = (I, V);
    type D3 = bool;

    #[inline]
    fn apply(&self, left: (I, V), right: (I, V)) -> bool {
        left.0 == right.0
    }

    fn name(&self) -> &'static str {
        "equal_first"
    }
}

/// Negates the truth value of the wrapped operator's result. Never
/// associative, whatever the wrapped operator is.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalNot<Op>(pub Op);

impl<Op> Operator for LogicalNot<Op>
where
    Op: Operator,
    Op::D3: Cast<bool>,
    bool: Cast<Op::D3>,
{
    type D1 = Op::D1;
    type D2 = Op::D2;
    type D3 = Op::D3;

    #[inline]
    fn apply(&self, left: Op::D1, right: Op::D2) -> Op::D3 {
        let value: bool = self.0.apply(left, right).cast();
        (!value).cast()
    }

    fn is_commutative(&self) -> bool {
        self.0.is_commutative()
    }

    fn name(&self) -> &'static str {
        "logical_not"
    }
}

/// A user function lifted into an operator. Trait flags default to false and
/// are declared by the caller.
pub struct BinaryOp<F, L, R, O> {
    f: F,
    name: &'static str,
    associative: bool,
    commutative: bool,
    idempotent: bool,
    _domains: PhantomData<fn(L, R) -> O>,
}

impl<F, L, R, O> BinaryOp<F, L, R, O>
where
    F: Fn(L, R) -> O,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            f,
            name,
            associative: false,
            commutative: false,
            idempotent: false,
            _domains: PhantomData,
        }
    }

    pub fn associative(mut self) -> Self {
        self.associative = true;
        self
    }

    pub fn commutative(mut self) -> Self {
        self.commutative = true;
        self
    }

    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }
}

impl<F: Clone, L, R, O> Clone for BinaryOp<F, L, R, O> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            name: self.name,
            associative: self.associative,
            commutative: self.commutative,
            idempotent: self.idempotent,
            _domains: PhantomData,
        }
    }
}

impl<F, L, R, O> fmt::Debug for BinaryOp<F, L, R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOp")
            .field("name", &self.name)
            .field("associative", &self.associative)
            .field("commutative", &self.commutative)
            .finish()
    }
}

impl<F, L, R, O> Operator for BinaryOp<F, L, R, O>
where
    F: Fn(L, R) -> O + Clone + Send + Sync,
    L: Domain,
    R: Domain,
    O: Domain,
{
    type D1 = L;
    type D2 = R;
    type D3 = O;

    #[inline]
    fn apply(&self, left: L, right: R) -> O {
        (self.f)(left, right)
    }

    fn is_associative(&self) -> bool {
        self.associative
    }

    fn is_commutative(&self) -> bool {
        self.commutative
    }

    fn is_idempotent(&self) -> bool {
        self.idempotent
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
