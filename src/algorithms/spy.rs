//! Downsampled nonzero structure of a matrix.
//!
//! Each entry `(i, j)` of an `m x n` input is mapped to the cell
//! `(i * m' / m, j * n' / n)` of the smaller `m' x n'` output, which counts
//! the entries mapped onto it. Explicit zeroes count as entries.

use num_traits::Float;
use tracing::debug;

use crate::algebra::semiring::{plus_left_assign_if, plus_right_assign_if};
use crate::algebra::{Cast, Domain};
use crate::blas3::{mxm, set_matrix, set_matrix_pattern};
use crate::builder::{build_matrix_unique, IoMode};
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::matrix::Matrix;
use crate::phase::execute;

/// `big x small` (or its transpose) selector mapping every index of the
/// large dimension onto its bucket.
fn bucket_matrix(big: usize, small: usize, transpose: bool) -> Result<Matrix<bool>> {
    let ratio = big as f64 / small as f64;
    let buckets: Vec<usize> = (0..big)
        .map(|i| ((i as f64 / ratio) as usize).min(small - 1))
        .collect();
    let (mut q, rows, cols) = if transpose {
        (Matrix::new(small, big), buckets, (0..big).collect())
    } else {
        (Matrix::new(big, small), (0..big).collect(), buckets)
    };
    build_matrix_unique(&mut q, rows, cols, vec![true; big], IoMode::Sequential)?;
    Ok(q)
}

/// Per-cell entry counts of the `m x n` pattern over an
/// `small_m x small_n` grid, contracting the dimension that shrinks most
/// first.
fn count_cells(
    pattern: &Matrix<bool>,
    small_m: usize,
    small_n: usize,
) -> Result<Matrix<usize>> {
    let (m, n) = (pattern.nrows(), pattern.ncols());
    let p = bucket_matrix(m, small_m, true)?;
    let q = bucket_matrix(n, small_n, false)?;
    let desc = Descriptor::NO_OPERATION;
    let mut counts = Matrix::<usize>::new(small_m, small_n);
    if m - small_m > n - small_n {
        debug!(m, n, small_m, small_n, "spy rows first");
        let mut tmp = Matrix::<usize>::new(small_m, n);
        let ring = plus_right_assign_if::<usize, bool>();
        execute(|ph| mxm(&mut tmp, &p, pattern, &ring, desc, ph))?;
        let ring = plus_left_assign_if::<usize, bool>();
        execute(|ph| mxm(&mut counts, &tmp, &q, &ring, desc, ph))?;
    } else {
        debug!(m, n, small_m, small_n, "spy columns first");
        let mut tmp = Matrix::<usize>::new(m, small_n);
        let ring = plus_left_assign_if::<usize, bool>();
        execute(|ph| mxm(&mut tmp, pattern, &q, &ring, desc, ph))?;
        let ring = plus_right_assign_if::<usize, bool>();
        execute(|ph| mxm(&mut counts, &p, &tmp, &ring, desc, ph))?;
    }
    Ok(counts)
}

/// Count into `out` the entries of `a` falling onto each of its cells.
///
/// # Errors
///
/// `Illegal` if `out` has more rows or columns than `a`.
pub fn spy<T, TA>(out: &mut Matrix<T>, a: &Matrix<TA>) -> Result<()>
where
    T: Domain,
    TA: Domain,
    usize: Cast<T>,
{
    let (m, n) = (a.nrows(), a.ncols());
    let (small_m, small_n) = (out.nrows(), out.ncols());
    if small_m > m || small_n > n {
        return Err(GrbError::illegal(format!(
            "spy of a {}x{} matrix into a larger {}x{} one",
            m, n, small_m, small_n
        )));
    }
    if (small_m, small_n) == (m, n) {
        return execute(|p| set_matrix_pattern(out, a, 1usize, Descriptor::STRUCTURAL, p));
    }
    out.clear();
    if small_m == 0 || small_n == 0 {
        return Ok(());
    }

    let mut pattern = Matrix::<bool>::new(m, n);
    execute(|p| set_matrix_pattern(&mut pattern, a, true, Descriptor::STRUCTURAL, p))?;
    let counts = count_cells(&pattern, small_m, small_n)?;
    execute(|p| set_matrix(out, &counts, Descriptor::NO_OPERATION, p))
}

/// [`spy`] storing `1 / count` instead of the count.
pub fn spy_normalized<T, TA>(out: &mut Matrix<T>, a: &Matrix<TA>) -> Result<()>
where
    T: Domain + Float,
    TA: Domain,
    usize: Cast<T>,
{
    spy(out, a)?;
    let (rows, rest): (Vec<usize>, Vec<(usize, T)>) =
        out.iter().map(|(i, j, v)| (i, (j, T::one() / v))).unzip();
    let (cols, vals): (Vec<usize>, Vec<T>) = rest.into_iter().unzip();
    build_matrix_unique(out, rows, cols, vals, IoMode::Sequential)
}
