//! Folds: vector into vector, scalar into vector, and vector into scalar.

use rayon::prelude::*;
use tracing::trace;

use crate::algebra::{
    check_no_casting, check_not_pattern, Cast, Domain, Foldable, Monoid, Operator,
};
use crate::blas1::{check_dense, check_size};
use crate::config::EngineConfig;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::mask::MaskView;
use crate::phase::Phase;
use crate::scalar::Scalar;
use crate::vector::Vector;

/// Grow `out` so that `extra` more entries fit.
fn reserve_fold<T: Domain>(out: &mut Vector<T>, extra: usize) -> Result<()> {
    let required = out.nnz().saturating_add(extra).min(out.size());
    if required > out.capacity() {
        out.resize(required)?;
    }
    Ok(())
}

/// `out[i] = op(out[i], input[i])` for every permitted `i` present in
/// `input`; absent `out[i]` take `input[i]`.
pub fn foldl<TO, TI, M, O>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    input: &Vector<TI>,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain + Cast<O::D1>,
    TI: Domain + Cast<O::D2> + Cast<TO>,
    M: Domain + Cast<bool>,
    O: Operator,
    O::D3: Cast<TO>,
{
    fold_vector(out, mask, input, desc, phase, |acc, x| {
        op.apply(acc.cast(), <TI as Cast<O::D2>>::cast(x)).cast()
    })
}

/// `out[i] = op(input[i], out[i])`; see [`foldl`].
pub fn foldr<TI, TO, M, O>(
    input: &Vector<TI>,
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain + Cast<O::D2>,
    TI: Domain + Cast<O::D1> + Cast<TO>,
    M: Domain + Cast<bool>,
    O: Operator,
    O::D3: Cast<TO>,
{
    fold_vector(out, mask, input, desc, phase, |acc, x| {
        op.apply(<TI as Cast<O::D1>>::cast(x), acc.cast()).cast()
    })
}

fn fold_vector<TO, TI, M>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    input: &Vector<TI>,
    desc: Descriptor,
    phase: Phase,
    combine: impl Fn(TO, TI) -> TO,
) -> Result<()>
where
    TO: Domain,
    TI: Domain + Cast<TO>,
    M: Domain + Cast<bool>,
{
    check_size("input vector", out.size(), input.size())?;
    check_no_casting::<TI, TO>(desc, "input vector")?;
    check_not_pattern::<TI, TO>("input vector")?;
    check_dense(desc, input, "input vector")?;
    check_dense(desc, out, "output vector")?;
    let view = MaskView::new(mask, desc, out.size())?;
    if phase.is_resize() {
        return reserve_fold(out, input.nnz());
    }

    let storage = out.storage_mut();
    for (i, x) in input.iter() {
        if !view.permits(i) {
            continue;
        }
        match storage.get(i) {
            Some(acc) => storage.values[i] = combine(acc, x),
            None => storage.write(i, x.cast(), phase)?,
        }
    }
    Ok(())
}

/// `out[i] = op(out[i], scalar)` for every present, permitted `i`.
pub fn foldl_scalar<TO, TS, M, O>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    scalar: TS,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain + Cast<O::D1>,
    TS: Domain + Cast<O::D2>,
    M: Domain + Cast<bool>,
    O: Operator,
    O::D3: Cast<TO>,
{
    let s: O::D2 = scalar.cast();
    fold_scalar(out, mask, desc, phase, |acc| op.apply(acc.cast(), s).cast())
}

/// `out[i] = op(scalar, out[i])` for every present, permitted `i`.
pub fn foldr_scalar<TS, TO, M, O>(
    scalar: TS,
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain + Cast<O::D2>,
    TS: Domain + Cast<O::D1>,
    M: Domain + Cast<bool>,
    O: Operator,
    O::D3: Cast<TO>,
{
    let s: O::D1 = scalar.cast();
    fold_scalar(out, mask, desc, phase, |acc| op.apply(s, acc.cast()).cast())
}

fn fold_scalar<TO, M>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    desc: Descriptor,
    phase: Phase,
    combine: impl Fn(TO) -> TO,
) -> Result<()>
where
    TO: Domain,
    M: Domain + Cast<bool>,
{
    check_dense(desc, out, "output vector")?;
    let view = MaskView::new(mask, desc, out.size())?;
    if phase.is_resize() {
        return Ok(());
    }
    let storage = out.storage_mut();
    for k in 0..storage.coords.nnz() {
        let i = storage.coords.index(k);
        if view.permits(i) {
            storage.values[i] = combine(storage.values[i]);
        }
    }
    Ok(())
}

/// Fold the permitted entries of `input` with `monoid`, starting from its
/// identity. Large inputs are reduced as a tree across threads.
fn reduce_entries<TI, M, O>(
    input: &Vector<TI>,
    mask: Option<&Vector<M>>,
    monoid: &Monoid<O>,
    desc: Descriptor,
) -> Result<O::D3>
where
    TI: Domain + Cast<O::D3>,
    M: Domain + Cast<bool>,
    O: Foldable,
{
    check_dense(desc, input, "input vector")?;
    let view = MaskView::new(mask, desc, input.size())?;
    let storage = input.storage();
    let indices = storage.coords.as_slice();

    if indices.len() >= EngineConfig::global().parallel_threshold {
        trace!(nnz = indices.len(), "parallel reduction");
        let id = monoid.identity();
        Ok(indices
            .par_iter()
            .filter(|&&i| view.permits(i))
            .map(|&i| storage.values[i].cast())
            .fold(|| id, |acc, x| monoid.fold(acc, x))
            .reduce(|| id, |a, b| monoid.fold(a, b)))
    } else {
        Ok(monoid.fold_all(
            indices
                .iter()
                .filter(|&&i| view.permits(i))
                .map(|&i| storage.values[i].cast()),
        ))
    }
}

/// `out = out ⊕ (⊕_i input[i])`.
pub fn foldl_reduce<TI, M, O>(
    out: &mut O::D3,
    mask: Option<&Vector<M>>,
    input: &Vector<TI>,
    monoid: &Monoid<O>,
    desc: Descriptor,
) -> Result<()>
where
    TI: Domain + Cast<O::D3>,
    M: Domain + Cast<bool>,
    O: Foldable,
{
    check_no_casting::<TI, O::D3>(desc, "input vector")?;
    check_not_pattern::<TI, O::D3>("input vector")?;
    let total = reduce_entries(input, mask, monoid, desc)?;
    *out = monoid.fold(*out, total);
    Ok(())
}

/// `out = (⊕_i input[i]) ⊕ out`.
pub fn foldr_reduce<TI, M, O>(
    input: &Vector<TI>,
    mask: Option<&Vector<M>>,
    out: &mut O::D3,
    monoid: &Monoid<O>,
    desc: Descriptor,
) -> Result<()>
where
    TI: Domain + Cast<O::D3>,
    M: Domain + Cast<bool>,
    O: Foldable,
{
    check_no_casting::<TI, O::D3>(desc, "input vector")?;
    check_not_pattern::<TI, O::D3>("input vector")?;
    let total = reduce_entries(input, mask, monoid, desc)?;
    *out = monoid.fold(total, *out);
    Ok(())
}

/// Reduce `input` into `out`; an uninitialized scalar starts from the
/// monoid identity.
pub fn reduce<TI, M, O>(
    out: &mut Scalar<O::D3>,
    mask: Option<&Vector<M>>,
    input: &Vector<TI>,
    monoid: &Monoid<O>,
    desc: Descriptor,
) -> Result<()>
where
    TI: Domain + Cast<O::D3>,
    M: Domain + Cast<bool>,
    O: Foldable,
{
    let mut acc = out.value_or(monoid.identity());
    foldl_reduce(&mut acc, mask, input, monoid, desc)?;
    out.set(acc);
    Ok(())
}
