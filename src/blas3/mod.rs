//! Level-3 primitives: sparse matrix–matrix products and matrix-valued
//! operations.
//!
//! `mxm` is the two-phase Gustavson SpGEMM. Under `Resize` the symbolic
//! phase unions, per row of `A`, the column sets of the rows of `B` it
//! touches, and grows `C` to the total. Under `Execute` the numeric phase
//! folds products per row in an accumulator, emits the row sorted by
//! column, and installs the result; `C`'s CCS mirror is rebuilt by
//! counting and scattering.
//!
//! Elementwise combination of matrices and the outer product live in
//! [`ewise`].

pub mod ewise;
pub mod reduce;
pub mod select;
pub mod set;
pub mod zip;

use tracing::debug;

use crate::accumulator::{multiply_row, row_products, with_spa, Accumulator, SortAccumulator};
use crate::algebra::{check_no_casting, Cast, Domain, SemiringOps};
use crate::config::{EngineConfig, RowStrategy};
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::matrix::view::Compressed;
use crate::matrix::{Matrix, SparseMatrixCSR};
use crate::parallel;
use crate::phase::Phase;
use crate::utils::exclusive_scan;

pub use ewise::{e_wise_apply_matrix, e_wise_apply_matrix_monoid, outer};
pub use reduce::{foldl_matrix, foldr_matrix};
pub use select::{select, tril, triu, Offset};
pub use set::{clear_matrix, resize_matrix, set_matrix, set_matrix_pattern};
pub use zip::{zip_matrix, zip_matrix_pattern};

/// Column indices and sums of one output row.
pub(crate) type Row<S> = (Vec<usize>, Vec<S>);

/// Row operands of `A ⊗ B` after applying the transpose descriptors.
fn operands<'a, TA: Domain, TB: Domain>(
    out_shape: (usize, usize),
    a: &'a Matrix<TA>,
    b: &'a Matrix<TB>,
    desc: Descriptor,
) -> Result<(Compressed<'a, TA>, Compressed<'a, TB>)> {
    let a_rows = a.rows(desc.contains(Descriptor::TRANSPOSE_LEFT));
    let b_rows = b.rows(desc.contains(Descriptor::TRANSPOSE_RIGHT));
    if a_rows.minor != b_rows.major {
        return Err(GrbError::mismatch(format!(
            "inner dimensions differ: left has {} columns, right has {} rows",
            a_rows.minor, b_rows.major
        )));
    }
    if out_shape != (a_rows.major, b_rows.minor) {
        return Err(GrbError::mismatch(format!(
            "output is {}x{}, product is {}x{}",
            out_shape.0, out_shape.1, a_rows.major, b_rows.minor
        )));
    }
    Ok((a_rows, b_rows))
}

/// Sorted column pattern of row `i` of `A ⊗ B`.
fn symbolic_row<TA: Domain, TB: Domain>(
    spa: &mut impl Accumulator<()>,
    i: usize,
    a: &Compressed<'_, TA>,
    b: &Compressed<'_, TB>,
    cols: &mut Vec<usize>,
) {
    let (a_cols, _) = a.lane(i);
    for &k in a_cols {
        for &j in b.lane(k).0 {
            spa.accumulate(j, (), &|_, _| ());
        }
    }
    let mut units = Vec::new();
    spa.emit(cols, &mut units, &|_, _| ());
}

/// Exact nonzero count of `A ⊗ B`.
fn symbolic_nnz<TA: Domain, TB: Domain>(a: &Compressed<'_, TA>, b: &Compressed<'_, TB>) -> usize {
    with_spa::<(), _>(b.minor, |spa| {
        let mut cols = Vec::new();
        (0..a.major)
            .map(|i| {
                cols.clear();
                symbolic_row(spa, i, a, b, &mut cols);
                cols.len()
            })
            .sum()
    })
}

/// Row `i` of `A ⊗ B` with the accumulator the configuration picks for it.
pub(crate) fn numeric_row<TA, TB, R>(
    i: usize,
    a: &Compressed<'_, TA>,
    b: &Compressed<'_, TB>,
    ring: &R,
    config: &EngineConfig,
    sort_acc: &mut SortAccumulator<R::Sum>,
) -> Row<R::Sum>
where
    TA: Domain + Cast<R::Left>,
    TB: Domain + Cast<R::Right>,
    R: SemiringOps,
{
    let (a_cols, a_vals) = a.lane(i);
    let add = |x: R::Sum, y: R::Sum| ring.add(x, y);
    let mut row = (Vec::new(), Vec::new());
    match config.row_strategy(row_products(a_cols, b)) {
        RowStrategy::Sort => {
            multiply_row(sort_acc, a_cols, a_vals, b, ring);
            sort_acc.emit(&mut row.0, &mut row.1, &add);
        }
        RowStrategy::Dense => with_spa::<R::Sum, _>(b.minor, |spa| {
            multiply_row(spa, a_cols, a_vals, b, ring);
            spa.emit(&mut row.0, &mut row.1, &add);
        }),
    }
    row
}

fn numeric_rows_sequential<TA, TB, R>(
    a: &Compressed<'_, TA>,
    b: &Compressed<'_, TB>,
    ring: &R,
    config: &EngineConfig,
) -> Vec<Row<R::Sum>>
where
    TA: Domain + Cast<R::Left>,
    TB: Domain + Cast<R::Right>,
    R: SemiringOps,
{
    let mut sort_acc = SortAccumulator::new(config.sort_threshold);
    (0..a.major)
        .map(|i| numeric_row(i, a, b, ring, config, &mut sort_acc))
        .collect()
}

/// Concatenate per-row results into a CRS, casting into the output domain.
pub(crate) fn assemble<S, TC>(m: usize, n: usize, rows: Vec<Row<S>>) -> SparseMatrixCSR<TC>
where
    S: Domain + Cast<TC>,
    TC: Domain,
{
    let lengths: Vec<usize> = rows.iter().map(|(cols, _)| cols.len()).collect();
    let row_ptr = exclusive_scan(&lengths);
    let nnz = row_ptr[m];

    let mut col_idx = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);
    for (cols, vals) in rows {
        col_idx.extend(cols);
        values.extend(vals.into_iter().map(Cast::cast));
    }
    SparseMatrixCSR {
        n_rows: m,
        n_cols: n,
        row_ptr,
        col_idx,
        values,
    }
}

/// `C = A ⊗ B` over `ring`.
///
/// `TRANSPOSE_LEFT` and `TRANSPOSE_RIGHT` multiply with `Aᵀ` and `Bᵀ`
/// without moving data. Pattern operands read as the multiplicative
/// identity. Products that land on the same cell are folded with the
/// additive monoid; computed zeroes are kept.
///
/// # Errors
///
/// `Mismatch` on incompatible shapes; `Illegal` (`Failed` under `Try`) if
/// `C` lacks capacity for the product.
pub fn mxm<TC, TA, TB, R>(
    c: &mut Matrix<TC>,
    a: &Matrix<TA>,
    b: &Matrix<TB>,
    ring: &R,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TC: Domain,
    TA: Domain + Cast<R::Left>,
    TB: Domain + Cast<R::Right>,
    R: SemiringOps,
    R::Sum: Cast<TC>,
{
    check_no_casting::<TA, R::Left>(desc, "left matrix")?;
    check_no_casting::<TB, R::Right>(desc, "right matrix")?;
    check_no_casting::<R::Sum, TC>(desc, "output matrix")?;
    let (a_rows, b_rows) = operands((c.nrows(), c.ncols()), a, b, desc)?;

    if phase.is_resize() {
        let nnz = symbolic_nnz(&a_rows, &b_rows);
        debug!(id = %c.id(), nnz, "mxm symbolic phase");
        return c.resize(nnz.max(c.nnz()));
    }

    let config = EngineConfig::global();
    let parallel = a_rows.major >= config.parallel_threshold;
    debug!(
        id = %c.id(),
        rows = a_rows.major,
        parallel,
        sort_threshold = config.sort_threshold,
        "mxm numeric phase"
    );
    let rows = if parallel {
        parallel::numeric_rows(&a_rows, &b_rows, ring, config)
    } else {
        numeric_rows_sequential(&a_rows, &b_rows, ring, config)
    };
    let crs = assemble(a_rows.major, b_rows.minor, rows);
    c.assign(crs, phase)
}

/// Pattern of `A ⊗ B`: `C[i,j]` is present iff some `A[i,k]` and `B[k,j]`
/// both are.
pub fn mxm_pattern<TA: Domain, TB: Domain>(
    c: &mut Matrix<()>,
    a: &Matrix<TA>,
    b: &Matrix<TB>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()> {
    let (a_rows, b_rows) = operands((c.nrows(), c.ncols()), a, b, desc)?;
    if phase.is_resize() {
        let nnz = symbolic_nnz(&a_rows, &b_rows);
        return c.resize(nnz.max(c.nnz()));
    }
    let rows = with_spa::<(), _>(b_rows.minor, |spa| {
        (0..a_rows.major)
            .map(|i| {
                let mut cols = Vec::new();
                symbolic_row(spa, i, &a_rows, &b_rows, &mut cols);
                let units = vec![(); cols.len()];
                (cols, units)
            })
            .collect::<Vec<_>>()
    });
    c.assign(assemble(a_rows.major, b_rows.minor, rows), phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::semiring::{min_plus, plus_times};
    use crate::matrix::reference_mxm;

    fn sample_a() -> Matrix<f64> {
        // [1 0 2]
        // [0 3 0]
        Matrix::from_csr(SparseMatrixCSR::new(
            2,
            3,
            vec![0, 2, 3],
            vec![0, 2, 1],
            vec![1.0, 2.0, 3.0],
        ))
    }

    fn sample_b() -> Matrix<f64> {
        // [1 1]
        // [0 2]
        // [4 0]
        Matrix::from_csr(SparseMatrixCSR::new(
            3,
            2,
            vec![0, 2, 3, 4],
            vec![0, 1, 1, 0],
            vec![1.0, 1.0, 2.0, 4.0],
        ))
    }

    #[test]
    fn test_mxm_small() {
        let (a, b) = (sample_a(), sample_b());
        let ring = plus_times::<f64>();
        let mut c = Matrix::<f64>::new(2, 2);
        crate::phase::execute(|p| mxm(&mut c, &a, &b, &ring, Descriptor::NO_OPERATION, p)).unwrap();
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(0, 0, 9.0), (0, 1, 1.0), (1, 1, 6.0)]);
        assert_eq!(c.crs(), &reference_mxm(a.crs(), b.crs(), &ring));
        assert_eq!(c.ccs().nnz(), 3);
    }

    #[test]
    fn test_mxm_needs_capacity() {
        let (a, b) = (sample_a(), sample_b());
        let ring = plus_times::<f64>();
        let mut c = Matrix::<f64>::with_capacity(2, 2, 1).unwrap();
        let err = mxm(&mut c, &a, &b, &ring, Descriptor::NO_OPERATION, Phase::Execute).unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
        let err = mxm(&mut c, &a, &b, &ring, Descriptor::NO_OPERATION, Phase::Try).unwrap_err();
        assert!(matches!(err, GrbError::Failed(_)));
        mxm(&mut c, &a, &b, &ring, Descriptor::NO_OPERATION, Phase::Resize).unwrap();
        assert_eq!(c.capacity(), 3);
    }

    #[test]
    fn test_transpose_descriptors() {
        let (a, b) = (sample_a(), sample_b());
        let ring = plus_times::<f64>();
        // Bᵀ Aᵀ = (A B)ᵀ
        let mut ct = Matrix::<f64>::new(2, 2);
        let desc = Descriptor::TRANSPOSE_LEFT | Descriptor::TRANSPOSE_RIGHT;
        crate::phase::execute(|p| mxm(&mut ct, &b, &a, &ring, desc, p)).unwrap();
        assert_eq!(ct.iter().collect::<Vec<_>>(), vec![(0, 0, 9.0), (1, 0, 1.0), (1, 1, 6.0)]);

        let mut bad = Matrix::<f64>::new(2, 2);
        let err = mxm(&mut bad, &a, &a, &ring, Descriptor::NO_OPERATION, Phase::Execute).unwrap_err();
        assert!(matches!(err, GrbError::Mismatch(_)));
    }

    #[test]
    fn test_mxm_min_plus() {
        let (a, b) = (sample_a(), sample_b());
        let ring = min_plus::<f64>();
        let mut c = Matrix::<f64>::new(2, 2);
        crate::phase::execute(|p| mxm(&mut c, &a, &b, &ring, Descriptor::NO_OPERATION, p)).unwrap();
        // row 0: min(1+1, 2+4) at col 0, 1+1 at col 1
        assert_eq!(c.get(0, 0), Some(2.0));
        assert_eq!(c.get(0, 1), Some(2.0));
        assert_eq!(c.get(1, 1), Some(5.0));
    }

    #[test]
    fn test_mxm_pattern() {
        let (a, b) = (sample_a(), sample_b());
        let mut c = Matrix::<()>::new(2, 2);
        crate::phase::execute(|p| mxm_pattern(&mut c, &a, &b, Descriptor::NO_OPERATION, p)).unwrap();
        let pattern: Vec<_> = c.iter().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(pattern, vec![(0, 0), (0, 1), (1, 1)]);
    }
}
