//! Matrix–vector products over a semiring.
//!
//! `mxv` computes `y[i] = ⊕_j A[i,j] ⊗ x[j]`, `vxm` computes
//! `y[j] = ⊕_i x[i] ⊗ A[i,j]`. Both run the same kernel over one of two
//! lane orientations:
//!
//! - *row-wise* walks the output lanes (rows of `A` for `mxv`) and gathers
//!   from `x`; chosen when `x` is dense or the output mask is sparse.
//! - *column-wise* walks the present entries of `x` and scatters along the
//!   input lanes (columns of `A` for `mxv`); chosen otherwise.
//!
//! Sums accumulate in the semiring's additive domain inside this thread's
//! SPA and are cast into `y` once at the end.

use tracing::{debug, warn};

use crate::accumulator::{with_spa, Accumulator, DenseAccumulator};
use crate::algebra::{check_no_casting, Cast, Domain, SemiringOps};
use crate::blas1::{check_dense, check_size};
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::mask::MaskView;
use crate::matrix::view::Compressed;
use crate::matrix::Matrix;
use crate::phase::Phase;
use crate::vector::{Vector, VectorStorage};

/// Both orientations of the operand matrix, relative to the output.
struct Lanes<'a, TA> {
    /// One lane per output position, indexed by input position.
    out: Compressed<'a, TA>,
    /// One lane per input position, indexed by output position.
    input: Compressed<'a, TA>,
}

impl<'a, TA: Domain> Lanes<'a, TA> {
    fn for_mxv(a: &'a Matrix<TA>, desc: Descriptor) -> Self {
        let t = desc.transpose();
        Self {
            out: a.rows(t),
            input: a.cols(t),
        }
    }

    fn for_vxm(a: &'a Matrix<TA>, desc: Descriptor) -> Self {
        let t = desc.transpose();
        Self {
            out: a.cols(t),
            input: a.rows(t),
        }
    }
}

/// Masks over the output and the input positions.
struct Masks<'a, M: Domain, MI: Domain> {
    out: MaskView<'a, M>,
    input: MaskView<'a, MI>,
}

/// Fold `⊕ A ⊗ x` into `spa`, reading `x` from `xs`.
///
/// `product(a, x)` and `identity(x)` produce the semiring terms in the
/// operand order of the caller.
#[allow(clippy::too_many_arguments)]
fn accumulate_products<TA, TX, S, M, MI>(
    spa: &mut impl Accumulator<S>,
    lanes: &Lanes<'_, TA>,
    xs: &VectorStorage<TX>,
    masks: &Masks<'_, M, MI>,
    add_identity: bool,
    add: &impl Fn(S, S) -> S,
    product: impl Fn(TA, TX) -> S,
    identity: impl Fn(TX) -> S,
) where
    TA: Domain,
    TX: Domain,
    M: Domain + Cast<bool>,
    MI: Domain + Cast<bool>,
{
    let (m, n) = (lanes.out.major, lanes.input.major);
    let row_wise = xs.coords.is_dense() || masks.out.is_sparse(m);
    debug!(
        strategy = if row_wise { "row-wise" } else { "column-wise" },
        m,
        n,
        x_nnz = xs.coords.nnz(),
        "matrix-vector kernel"
    );

    if row_wise {
        let mut row = |i: usize| {
            if !masks.out.permits(i) {
                return;
            }
            let (idx, vals) = lanes.out.lane(i);
            for (&j, &a) in idx.iter().zip(vals) {
                if let Some(x) = xs.get(j).filter(|_| masks.input.permits(j)) {
                    spa.accumulate(i, product(a, x), add);
                }
            }
            if add_identity && i < n && masks.input.permits(i) {
                if let Some(x) = xs.get(i) {
                    spa.accumulate(i, identity(x), add);
                }
            }
        };
        match masks.out.candidates() {
            Some(c) if c.len() < m => c.iter().for_each(|&i| row(i)),
            _ => (0..m).for_each(row),
        }
    } else {
        for j in xs.coords.iter().filter(|&j| masks.input.permits(j)) {
            let x = xs.values[j];
            let (idx, vals) = lanes.input.lane(j);
            for (&i, &a) in idx.iter().zip(vals) {
                if masks.out.permits(i) {
                    spa.accumulate(i, product(a, x), add);
                }
            }
            if add_identity && j < m && masks.out.permits(j) {
                spa.accumulate(j, identity(x), add);
            }
        }
    }
}

/// Upper bound on the output entries of one product.
fn output_bound<TA: Domain, M: Domain + Cast<bool>>(
    lanes: &Lanes<'_, TA>,
    out_mask: &MaskView<'_, M>,
    add_identity: bool,
) -> usize {
    let m = lanes.out.major;
    let mut bound = lanes.out.nnz();
    if add_identity {
        bound = bound.saturating_add(m.min(lanes.input.major));
    }
    if let Some(c) = out_mask.candidates() {
        bound = bound.min(c.len());
    }
    bound.min(m)
}

/// Write the SPA content into `y`, folding with `add` under `IN_PLACE`.
fn store<TY, S>(
    y: &mut VectorStorage<TY>,
    spa: &DenseAccumulator<S>,
    in_place: bool,
    add: impl Fn(S, S) -> S,
    phase: Phase,
) -> Result<()>
where
    TY: Domain + Cast<S>,
    S: Domain + Cast<TY>,
{
    for (i, s) in spa.iter() {
        let value = match y.get(i) {
            Some(old) if in_place => add(<TY as Cast<S>>::cast(old), s),
            _ => s,
        };
        y.write(i, <S as Cast<TY>>::cast(value), phase)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn product_into<TY, TA, TX, M, MI, R>(
    y: &mut Vector<TY>,
    mask: Option<&Vector<M>>,
    lanes: Lanes<'_, TA>,
    x: &Vector<TX>,
    x_mask: Option<&Vector<MI>>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
    product: impl Fn(TA, TX) -> R::Sum,
    identity: impl Fn(TX) -> R::Sum,
) -> Result<()>
where
    TY: Domain + Cast<R::Sum>,
    TA: Domain,
    TX: Domain,
    M: Domain + Cast<bool>,
    MI: Domain + Cast<bool>,
    R: SemiringOps,
    R::Sum: Cast<TY>,
{
    let (m, n) = (lanes.out.major, lanes.input.major);
    check_size("output vector", m, y.size())?;
    check_size("input vector", n, x.size())?;
    check_dense(desc, x, "input vector")?;
    check_no_casting::<R::Sum, TY>(desc, "output vector")?;
    let masks = Masks {
        out: MaskView::new(mask, desc, m)?,
        input: MaskView::new(x_mask, desc, n)?,
    };
    let add_identity = desc.contains(Descriptor::ADD_IDENTITY);

    if phase.is_resize() {
        let kept = if desc.in_place() { y.nnz() } else { 0 };
        let required = kept
            .saturating_add(output_bound(&lanes, &masks.out, add_identity))
            .min(m);
        if required > y.capacity() {
            y.resize(required)?;
        }
        return Ok(());
    }
    if !desc.in_place() {
        y.clear();
    }

    with_spa::<R::Sum, _>(m, |spa| {
        let add = |a: R::Sum, b: R::Sum| ring.add(a, b);
        accumulate_products(
            spa,
            &lanes,
            x.storage(),
            &masks,
            add_identity,
            &add,
            product,
            identity,
        );
        store(y.storage_mut(), spa, desc.in_place(), add, phase)
    })
}

/// `y = A ⊗ x`, or `y = Aᵀ ⊗ x` under `TRANSPOSE_MATRIX`.
///
/// Honors `ADD_IDENTITY` (computes with `A + I`), `IN_PLACE` (folds into
/// the present entries of `y` with the additive monoid), `DENSE` and
/// `NO_CASTING`.
pub fn mxv<TY, TA, TX, M, R>(
    y: &mut Vector<TY>,
    mask: Option<&Vector<M>>,
    a: &Matrix<TA>,
    x: &Vector<TX>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TY: Domain + Cast<R::Sum>,
    TA: Domain + Cast<R::Left>,
    TX: Domain + Cast<R::Right>,
    M: Domain + Cast<bool>,
    R: SemiringOps,
    R::Sum: Cast<TY>,
{
    mxv_input_masked(y, mask, a, x, None::<&Vector<bool>>, ring, desc, phase)
}

/// [`mxv`] that only reads the positions of `x` the input mask permits.
/// Both masks are interpreted under the same descriptor.
#[allow(clippy::too_many_arguments)]
pub fn mxv_input_masked<TY, TA, TX, M, MI, R>(
    y: &mut Vector<TY>,
    mask: Option<&Vector<M>>,
    a: &Matrix<TA>,
    x: &Vector<TX>,
    x_mask: Option<&Vector<MI>>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TY: Domain + Cast<R::Sum>,
    TA: Domain + Cast<R::Left>,
    TX: Domain + Cast<R::Right>,
    M: Domain + Cast<bool>,
    MI: Domain + Cast<bool>,
    R: SemiringOps,
    R::Sum: Cast<TY>,
{
    check_no_casting::<TA, R::Left>(desc, "matrix")?;
    check_no_casting::<TX, R::Right>(desc, "input vector")?;
    let (one_left, one_right) = (ring.one_left(), ring.one_right());
    product_into(
        y,
        mask,
        Lanes::for_mxv(a, desc),
        x,
        x_mask,
        ring,
        desc,
        phase,
        |av: TA, xv: TX| ring.multiply(av.cast_or(one_left), xv.cast_or(one_right)),
        |xv: TX| ring.multiply(one_left, xv.cast_or(one_right)),
    )
}

/// `y = x ⊗ A`, or `y = x ⊗ Aᵀ` under `TRANSPOSE_MATRIX`.
///
/// The vector is the left multiplicand. Descriptors as for [`mxv`].
pub fn vxm<TY, TX, TA, M, R>(
    y: &mut Vector<TY>,
    mask: Option<&Vector<M>>,
    x: &Vector<TX>,
    a: &Matrix<TA>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TY: Domain + Cast<R::Sum>,
    TX: Domain + Cast<R::Left>,
    TA: Domain + Cast<R::Right>,
    M: Domain + Cast<bool>,
    R: SemiringOps,
    R::Sum: Cast<TY>,
{
    vxm_input_masked(y, mask, x, None::<&Vector<bool>>, a, ring, desc, phase)
}

/// [`vxm`] that only reads the positions of `x` the input mask permits.
#[allow(clippy::too_many_arguments)]
pub fn vxm_input_masked<TY, TX, TA, M, MI, R>(
    y: &mut Vector<TY>,
    mask: Option<&Vector<M>>,
    x: &Vector<TX>,
    x_mask: Option<&Vector<MI>>,
    a: &Matrix<TA>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TY: Domain + Cast<R::Sum>,
    TX: Domain + Cast<R::Left>,
    TA: Domain + Cast<R::Right>,
    M: Domain + Cast<bool>,
    MI: Domain + Cast<bool>,
    R: SemiringOps,
    R::Sum: Cast<TY>,
{
    check_no_casting::<TX, R::Left>(desc, "input vector")?;
    check_no_casting::<TA, R::Right>(desc, "matrix")?;
    let (one_left, one_right) = (ring.one_left(), ring.one_right());
    product_into(
        y,
        mask,
        Lanes::for_vxm(a, desc),
        x,
        x_mask,
        ring,
        desc,
        phase,
        |av: TA, xv: TX| ring.multiply(xv.cast_or(one_left), av.cast_or(one_right)),
        |xv: TX| ring.multiply(xv.cast_or(one_left), one_right),
    )
}

/// `y = A ⊗ y` restricted to the positions the mask permits, reading `y`
/// as the input vector.
///
/// Requires `SAFE_OVERLAP`: the caller guarantees that the positions read
/// and the positions written are disjoint, as in a red-black sweep. Without
/// `IN_PLACE` every permitted position is cleared first, so one that
/// receives no contribution ends up empty; positions outside the mask are
/// left untouched.
///
/// # Errors
///
/// `Overlap` without `SAFE_OVERLAP`; `Illegal` when no mask is given, since
/// the read and write sets then trivially intersect.
pub fn mxv_in_place<T, TA, M, R>(
    y: &mut Vector<T>,
    mask: Option<&Vector<M>>,
    a: &Matrix<TA>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    T: Domain + Cast<R::Sum> + Cast<R::Right>,
    TA: Domain + Cast<R::Left>,
    M: Domain + Cast<bool>,
    R: SemiringOps,
    R::Sum: Cast<T>,
{
    if !desc.contains(Descriptor::SAFE_OVERLAP) {
        return Err(GrbError::Overlap(
            "output and input vector are the same container".to_string(),
        ));
    }
    if mask.is_none() {
        warn!(id = %y.id(), "safe_overlap without a mask");
        return Err(GrbError::illegal(
            "safe_overlap requires a mask separating read and write positions",
        ));
    }
    check_no_casting::<TA, R::Left>(desc, "matrix")?;
    check_no_casting::<T, R::Right>(desc, "input vector")?;
    check_no_casting::<R::Sum, T>(desc, "output vector")?;

    let lanes = Lanes::for_mxv(a, desc);
    let (m, n) = (lanes.out.major, lanes.input.major);
    check_size("vector", m, y.size())?;
    check_size("vector", n, y.size())?;
    check_dense(desc, y, "vector")?;
    let masks = Masks {
        out: MaskView::new(mask, desc, m)?,
        input: MaskView::new(None::<&Vector<bool>>, desc, n)?,
    };
    let add_identity = desc.contains(Descriptor::ADD_IDENTITY);
    if phase.is_resize() {
        let required = y
            .nnz()
            .saturating_add(output_bound(&lanes, &masks.out, add_identity))
            .min(m);
        if required > y.capacity() {
            y.resize(required)?;
        }
        return Ok(());
    }

    let (one_left, one_right) = (ring.one_left(), ring.one_right());
    with_spa::<R::Sum, _>(m, |spa| {
        let add = |l: R::Sum, r: R::Sum| ring.add(l, r);
        accumulate_products(
            spa,
            &lanes,
            y.storage(),
            &masks,
            add_identity,
            &add,
            |av: TA, xv: T| {
                ring.multiply(av.cast_or(one_left), <T as Cast<R::Right>>::cast_or(xv, one_right))
            },
            |xv: T| ring.multiply(one_left, <T as Cast<R::Right>>::cast_or(xv, one_right)),
        );
        if !desc.in_place() {
            let unmasked: Vec<(usize, T)> =
                y.iter().filter(|&(i, _)| !masks.out.permits(i)).collect();
            y.clear();
            let storage = y.storage_mut();
            for (i, v) in unmasked {
                storage.write(i, v, phase)?;
            }
        }
        store(y.storage_mut(), spa, desc.in_place(), add, phase)
    })
}
