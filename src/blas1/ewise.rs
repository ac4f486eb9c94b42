//! Elementwise application, fused multiply-add and dot products.
//!
//! With an operator, only positions where both operands are present
//! produce an entry. With a monoid, a position where one operand is
//! missing uses the monoid identity in its place, so the output pattern is
//! the union of the operand patterns. A scalar operand is present
//! everywhere.

use crate::algebra::{check_no_casting, Cast, Domain, Foldable, Monoid, Operator, SemiringOps};
use crate::blas1::{begin_output, check_dense, check_size};
use crate::coordinates::Coordinates;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::mask::MaskView;
use crate::phase::Phase;
use crate::vector::{Vector, VectorStorage};

/// A scalar or a vector argument of an elementwise primitive.
#[derive(Debug)]
pub enum Operand<'a, T: Domain> {
    Scalar(T),
    Vector(&'a Vector<T>),
}

impl<'a, T: Domain> Clone for Operand<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Domain> Copy for Operand<'a, T> {}

impl<'a, T: Domain> From<&'a Vector<T>> for Operand<'a, T> {
    fn from(v: &'a Vector<T>) -> Self {
        Operand::Vector(v)
    }
}

impl<'a, T: Domain> Operand<'a, T> {
    #[inline]
    fn get(&self, i: usize) -> Option<T> {
        match self {
            Operand::Scalar(s) => Some(*s),
            Operand::Vector(v) => v.storage().get(i),
        }
    }

    fn storage(&self) -> Option<&'a VectorStorage<T>> {
        match self {
            Operand::Scalar(_) => None,
            Operand::Vector(v) => Some(v.storage()),
        }
    }

    /// Present positions, or `None` when present everywhere.
    fn coords(&self) -> Option<&'a Coordinates> {
        self.storage().map(|s| &s.coords)
    }

    fn pattern(&self) -> Option<&'a [usize]> {
        self.coords().map(Coordinates::as_slice)
    }

    fn check(&self, desc: Descriptor, n: usize, role: &str) -> Result<()> {
        if let Operand::Vector(v) = self {
            check_size(role, n, v.size())?;
            check_dense(desc, v, role)?;
        }
        Ok(())
    }
}

/// Smaller of two patterns; `None` means everywhere.
fn narrower<'a>(a: Option<&'a Coordinates>, b: Option<&'a Coordinates>) -> Option<&'a Coordinates> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if a.nnz() <= b.nnz() { a } else { b }),
        (Some(p), None) | (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

/// Visit `driver` (or all of `[0, n)`), or the mask candidates when fewer.
fn visit(
    n: usize,
    driver: Option<&[usize]>,
    candidates: Option<&[usize]>,
    mut f: impl FnMut(usize) -> Result<()>,
) -> Result<()> {
    let driver_len = driver.map_or(n, <[usize]>::len);
    match (candidates, driver) {
        (Some(c), _) if c.len() < driver_len => c.iter().try_for_each(|&i| f(i)),
        (_, Some(d)) => d.iter().try_for_each(|&i| f(i)),
        (_, None) => (0..n).try_for_each(f),
    }
}

/// `out[i] = op(left[i], right[i])` where both operands are present.
pub fn e_wise_apply<TO, TL, TR, M, O>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    left: Operand<'_, TL>,
    right: Operand<'_, TR>,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TL: Domain + Cast<O::D1>,
    TR: Domain + Cast<O::D2>,
    M: Domain + Cast<bool>,
    O: Operator,
    O::D3: Cast<TO>,
{
    let n = out.size();
    left.check(desc, n, "left operand")?;
    right.check(desc, n, "right operand")?;
    check_no_casting::<TL, O::D1>(desc, "left operand")?;
    check_no_casting::<TR, O::D2>(desc, "right operand")?;
    check_no_casting::<O::D3, TO>(desc, "output vector")?;
    let view = MaskView::new(mask, desc, n)?;

    let driver = narrower(left.coords(), right.coords()).map(Coordinates::as_slice);
    if !begin_output(out, desc, phase, driver.map_or(n, <[usize]>::len))? {
        return Ok(());
    }

    let storage = out.storage_mut();
    visit(n, driver, view.candidates(), |i| {
        if !view.permits(i) {
            return Ok(());
        }
        if let (Some(l), Some(r)) = (left.get(i), right.get(i)) {
            storage.write(i, op.apply(l.cast(), r.cast()).cast(), phase)?;
        }
        Ok(())
    })
}

/// [`e_wise_apply`] with `left` a scalar.
pub fn e_wise_apply_scalar_left<TO, TL, TR, M, O>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    left: TL,
    right: &Vector<TR>,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TL: Domain + Cast<O::D1>,
    TR: Domain + Cast<O::D2>,
    M: Domain + Cast<bool>,
    O: Operator,
    O::D3: Cast<TO>,
{
    e_wise_apply(out, mask, Operand::Scalar(left), right.into(), op, desc, phase)
}

/// [`e_wise_apply`] with `right` a scalar.
pub fn e_wise_apply_scalar_right<TO, TL, TR, M, O>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    left: &Vector<TL>,
    right: TR,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TL: Domain + Cast<O::D1>,
    TR: Domain + Cast<O::D2>,
    M: Domain + Cast<bool>,
    O: Operator,
    O::D3: Cast<TO>,
{
    e_wise_apply(out, mask, left.into(), Operand::Scalar(right), op, desc, phase)
}

/// `out[i] = left[i] ⊕ right[i]` over the union of both patterns.
pub fn e_wise_apply_monoid<TO, TL, TR, M, O>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    left: Operand<'_, TL>,
    right: Operand<'_, TR>,
    monoid: &Monoid<O>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TL: Domain + Cast<O::D3>,
    TR: Domain + Cast<O::D3>,
    M: Domain + Cast<bool>,
    O: Foldable,
    O::D3: Cast<TO>,
{
    let n = out.size();
    left.check(desc, n, "left operand")?;
    right.check(desc, n, "right operand")?;
    check_no_casting::<TL, O::D3>(desc, "left operand")?;
    check_no_casting::<TR, O::D3>(desc, "right operand")?;
    check_no_casting::<O::D3, TO>(desc, "output vector")?;
    let view = MaskView::new(mask, desc, n)?;

    let bound = match (left.pattern(), right.pattern()) {
        (Some(l), Some(r)) => l.len() + r.len(),
        _ => n,
    };
    if !begin_output(out, desc, phase, bound)? {
        return Ok(());
    }

    let id = monoid.identity();
    let storage = out.storage_mut();
    let mut emit = |i: usize| -> Result<()> {
        if !view.permits(i) {
            return Ok(());
        }
        let value = match (left.get(i), right.get(i)) {
            (Some(l), Some(r)) => monoid.fold(l.cast_or(id), r.cast_or(id)),
            (Some(l), None) => monoid.fold(l.cast_or(id), id),
            (None, Some(r)) => monoid.fold(id, r.cast_or(id)),
            (None, None) => return Ok(()),
        };
        storage.write(i, value.cast(), phase)
    };

    match (left.storage(), right.pattern()) {
        (Some(l), Some(r_pattern)) if view.candidates().map_or(true, |c| c.len() >= bound) => {
            l.coords.iter().try_for_each(&mut emit)?;
            r_pattern
                .iter()
                .filter(|&&i| !l.coords.contains(i))
                .try_for_each(|&i| emit(i))
        }
        (Some(_), Some(_)) => visit(n, view.candidates(), None, emit),
        _ => visit(n, None, view.candidates(), emit),
    }
}

/// `z = z ⊕ (a ⊗ x ⊕ y)`.
///
/// The product is present where both `a` and `x` are; the sum is present
/// where the product or `y` is. Present sums are folded into `z` with the
/// additive monoid of `ring`.
#[allow(clippy::too_many_arguments)]
pub fn e_wise_mul_add<TZ, TA, TX, TY, M, R>(
    z: &mut Vector<TZ>,
    mask: Option<&Vector<M>>,
    a: Operand<'_, TA>,
    x: Operand<'_, TX>,
    y: Operand<'_, TY>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TZ: Domain + Cast<R::Sum>,
    TA: Domain + Cast<R::Left>,
    TX: Domain + Cast<R::Right>,
    TY: Domain + Cast<R::Sum>,
    M: Domain + Cast<bool>,
    R: SemiringOps,
    R::Sum: Cast<TZ>,
{
    let n = z.size();
    a.check(desc, n, "a")?;
    x.check(desc, n, "x")?;
    y.check(desc, n, "y")?;
    check_dense(desc, z, "z")?;
    check_no_casting::<TA, R::Left>(desc, "a")?;
    check_no_casting::<TX, R::Right>(desc, "x")?;
    check_no_casting::<TY, R::Sum>(desc, "y")?;
    check_no_casting::<R::Sum, TZ>(desc, "z")?;
    let view = MaskView::new(mask, desc, n)?;

    // every product position lies in the driver; some driver positions
    // have no product when `a` and `x` are both sparse
    let product_driver = narrower(a.coords(), x.coords());
    let bound = match (product_driver, y.pattern()) {
        (Some(p), Some(q)) => p.nnz() + q.len(),
        _ => n,
    };
    if phase.is_resize() {
        let required = z.nnz().saturating_add(bound).min(n);
        if required > z.capacity() {
            z.resize(required)?;
        }
        return Ok(());
    }

    let product = |i: usize| -> Option<R::Sum> {
        let (av, xv) = (a.get(i)?, x.get(i)?);
        Some(ring.multiply(av.cast_or(ring.one_left()), xv.cast_or(ring.one_right())))
    };
    let storage = z.storage_mut();
    let mut emit = |i: usize| -> Result<()> {
        if !view.permits(i) {
            return Ok(());
        }
        let sum = match (product(i), y.get(i)) {
            (Some(p), Some(yv)) => ring.add(p, yv.cast()),
            (Some(p), None) => p,
            (None, Some(yv)) => yv.cast(),
            (None, None) => return Ok(()),
        };
        let folded = match storage.get(i) {
            Some(old) => ring.add(old.cast(), sum),
            None => sum,
        };
        storage.write(i, folded.cast(), phase)
    };

    match (product_driver, y.pattern()) {
        (Some(p), Some(q)) => {
            p.iter().try_for_each(&mut emit)?;
            q.iter().filter(|&&i| !p.contains(i)).try_for_each(|&i| emit(i))
        }
        _ => visit(n, None, view.candidates(), emit),
    }
}

/// `out = out ⊕ (⊕_i x[i] ⊗ y[i])` over positions present in both.
pub fn dot<TX, TY, R>(
    out: &mut R::Sum,
    x: &Vector<TX>,
    y: &Vector<TY>,
    ring: &R,
    desc: Descriptor,
) -> Result<()>
where
    TX: Domain + Cast<R::Left>,
    TY: Domain + Cast<R::Right>,
    R: SemiringOps,
{
    check_size("y", x.size(), y.size())?;
    check_dense(desc, x, "x")?;
    check_dense(desc, y, "y")?;
    check_no_casting::<TX, R::Left>(desc, "x")?;
    check_no_casting::<TY, R::Right>(desc, "y")?;

    let (xs, ys) = (x.storage(), y.storage());
    let driver = if xs.coords.nnz() <= ys.coords.nnz() { &xs.coords } else { &ys.coords };
    let mut acc = *out;
    for i in driver.iter() {
        if let (Some(xv), Some(yv)) = (xs.get(i), ys.get(i)) {
            let p = ring.multiply(xv.cast_or(ring.one_left()), yv.cast_or(ring.one_right()));
            acc = ring.add(acc, p);
        }
    }
    *out = acc;
    Ok(())
}
