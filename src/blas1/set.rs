//! Assignment: scalars, indices and vectors into a vector.

use tracing::trace;

use crate::algebra::{check_no_casting, Cast, Domain};
use crate::blas1::{begin_output, check_dense, check_size};
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::mask::MaskView;
use crate::phase::Phase;
use crate::vector::Vector;

/// Write `value` at every position the mask permits; unmasked, `out`
/// becomes dense.
pub fn set_scalar<TO, TI, M>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    value: TI,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TI: Domain + Cast<TO>,
    M: Domain + Cast<bool>,
{
    check_no_casting::<TI, TO>(desc, "scalar")?;
    let value: TO = value.cast();
    fill(out, mask, desc, phase, |_| value)
}

/// Write each permitted position's own index, cast to the output domain.
///
/// This is `set` under the use-index descriptor.
pub fn set_index<TO, M>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    usize: Cast<TO>,
    M: Domain + Cast<bool>,
{
    fill(out, mask, desc, phase, |i| i.cast())
}

fn fill<TO, M>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    desc: Descriptor,
    phase: Phase,
    value: impl Fn(usize) -> TO,
) -> Result<()>
where
    TO: Domain,
    M: Domain + Cast<bool>,
{
    let n = out.size();
    let view = MaskView::new(mask, desc, n)?;
    if let Some(m) = mask {
        check_dense(desc, m, "mask")?;
    }
    let bound = view.candidates().map_or(n, <[usize]>::len);
    if !begin_output(out, desc, phase, bound)? {
        return Ok(());
    }

    let storage = out.storage_mut();
    if !view.is_some() && storage.capacity == n {
        storage.coords.assign_all();
        for (i, slot) in storage.values.iter_mut().enumerate() {
            *slot = value(i);
        }
        return Ok(());
    }
    match view.candidates() {
        Some(candidates) => {
            for &i in candidates {
                if view.permits(i) {
                    storage.write(i, value(i), phase)?;
                }
            }
        }
        None => {
            for i in (0..n).filter(|&i| view.permits(i)) {
                storage.write(i, value(i), phase)?;
            }
        }
    }
    Ok(())
}

/// Copy the entries of `input` the mask permits into `out`, casting values.
///
/// Unmasked, `out` ends up with exactly the pattern of `input`.
pub fn set_vector<TO, TI, M>(
    out: &mut Vector<TO>,
    mask: Option<&Vector<M>>,
    input: &Vector<TI>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TI: Domain + Cast<TO>,
    M: Domain + Cast<bool>,
{
    check_size("input vector", out.size(), input.size())?;
    check_no_casting::<TI, TO>(desc, "input vector")?;
    check_dense(desc, input, "input vector")?;
    let view = MaskView::new(mask, desc, out.size())?;
    if !begin_output(out, desc, phase, input.nnz())? {
        return Ok(());
    }
    trace!(out = %out.id(), input = %input.id(), masked = view.is_some(), "set vector");

    let storage = out.storage_mut();
    for (i, v) in input.iter() {
        if view.permits(i) {
            storage.write(i, v.cast(), phase)?;
        }
    }
    Ok(())
}

/// Masked copy: [`set_vector`] with a mask that must be given.
pub fn set_masked_vector<TO, TI, M>(
    out: &mut Vector<TO>,
    mask: &Vector<M>,
    input: &Vector<TI>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TI: Domain + Cast<TO>,
    M: Domain + Cast<bool>,
{
    set_vector(out, Some(mask), input, desc, phase)
}
