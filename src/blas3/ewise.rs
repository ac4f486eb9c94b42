//! Elementwise combination of two matrices, and the outer product of two
//! vectors.
//!
//! Row `i` of the output merges row `i` of both operands with two cursors;
//! a transposed operand is read through its CCS. The operator form keeps
//! the intersection of the two patterns, the monoid form their union, with
//! the identity standing in for the missing side.

use std::cmp::Ordering;

use tracing::trace;

use crate::algebra::{check_no_casting, check_not_pattern, Cast, Domain, Foldable, Monoid, Operator};
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::matrix::view::Compressed;
use crate::matrix::{Matrix, SparseMatrixCSR};
use crate::phase::Phase;
use crate::vector::Vector;

/// Offsets into the operand lanes holding a merged column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Both(usize, usize),
    Left(usize),
    Right(usize),
}

/// Which merged columns produce an output entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Intersection,
    Union,
}

impl Merge {
    fn keeps(self, hit: Hit) -> bool {
        self == Merge::Union || matches!(hit, Hit::Both(..))
    }
}

/// Walk two ascending index lanes in column order.
fn merge_lanes(a: &[usize], b: &[usize], mut f: impl FnMut(usize, Hit)) {
    let (mut p, mut q) = (0, 0);
    while p < a.len() && q < b.len() {
        match a[p].cmp(&b[q]) {
            Ordering::Less => {
                f(a[p], Hit::Left(p));
                p += 1;
            }
            Ordering::Greater => {
                f(b[q], Hit::Right(q));
                q += 1;
            }
            Ordering::Equal => {
                f(a[p], Hit::Both(p, q));
                p += 1;
                q += 1;
            }
        }
    }
    for (k, &j) in a[p..].iter().enumerate() {
        f(j, Hit::Left(p + k));
    }
    for (k, &j) in b[q..].iter().enumerate() {
        f(j, Hit::Right(q + k));
    }
}

fn check_operand<T: Domain>(
    shape: (usize, usize),
    rows: &Compressed<'_, T>,
    role: &str,
) -> Result<()> {
    if shape != (rows.major, rows.minor) {
        return Err(GrbError::mismatch(format!(
            "output is {}x{}, {} matrix is {}x{}",
            shape.0, shape.1, role, rows.major, rows.minor
        )));
    }
    Ok(())
}

/// Shared driver: `combine(a, b)` sees `None` for a missing side and may
/// drop the entry by returning `None`.
fn e_wise_matrix<TO, TA, TB>(
    out: &mut Matrix<TO>,
    a: &Matrix<TA>,
    b: &Matrix<TB>,
    merge: Merge,
    desc: Descriptor,
    phase: Phase,
    combine: impl Fn(Option<TA>, Option<TB>) -> Option<TO>,
) -> Result<()>
where
    TO: Domain,
    TA: Domain,
    TB: Domain,
{
    let a_rows = a.rows(desc.contains(Descriptor::TRANSPOSE_LEFT));
    let b_rows = b.rows(desc.contains(Descriptor::TRANSPOSE_RIGHT));
    let (m, n) = (out.nrows(), out.ncols());
    check_operand((m, n), &a_rows, "left")?;
    check_operand((m, n), &b_rows, "right")?;

    if phase.is_resize() {
        let mut nnz = 0usize;
        for i in 0..m {
            merge_lanes(a_rows.lane(i).0, b_rows.lane(i).0, |_, hit| {
                if merge.keeps(hit) {
                    nnz += 1;
                }
            });
        }
        return out.resize(nnz.max(out.nnz()));
    }

    let mut row_ptr = Vec::with_capacity(m + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);
    for i in 0..m {
        let (a_idx, a_vals) = a_rows.lane(i);
        let (b_idx, b_vals) = b_rows.lane(i);
        merge_lanes(a_idx, b_idx, |j, hit| {
            if !merge.keeps(hit) {
                return;
            }
            let value = match hit {
                Hit::Both(p, q) => combine(Some(a_vals[p]), Some(b_vals[q])),
                Hit::Left(p) => combine(Some(a_vals[p]), None),
                Hit::Right(q) => combine(None, Some(b_vals[q])),
            };
            if let Some(v) = value {
                col_idx.push(j);
                values.push(v);
            }
        });
        row_ptr.push(col_idx.len());
    }
    trace!(
        left = %a.id(),
        right = %b.id(),
        to = %out.id(),
        ?merge,
        nnz = col_idx.len(),
        "elementwise matrix"
    );
    out.assign(
        SparseMatrixCSR {
            n_rows: m,
            n_cols: n,
            row_ptr,
            col_idx,
            values,
        },
        phase,
    )
}

/// `C[i,j] = op(A[i,j], B[i,j])` where both operands hold an entry.
///
/// Honors `TRANSPOSE_LEFT`, `TRANSPOSE_RIGHT` and `NO_CASTING`. The
/// previous content of `C` is replaced.
///
/// # Errors
///
/// `Mismatch` if the (transposed) operands do not have the shape of `C`;
/// `Illegal` if an operand is a pattern matrix, since an operator implies
/// no value for it.
pub fn e_wise_apply_matrix<TO, TA, TB, O>(
    out: &mut Matrix<TO>,
    a: &Matrix<TA>,
    b: &Matrix<TB>,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TA: Domain + Cast<O::D1>,
    TB: Domain + Cast<O::D2>,
    O: Operator,
    O::D3: Cast<TO>,
{
    check_no_casting::<TA, O::D1>(desc, "left matrix")?;
    check_no_casting::<TB, O::D2>(desc, "right matrix")?;
    check_no_casting::<O::D3, TO>(desc, "output matrix")?;
    check_not_pattern::<TA, O::D1>("left matrix")?;
    check_not_pattern::<TB, O::D2>("right matrix")?;
    e_wise_matrix(out, a, b, Merge::Intersection, desc, phase, |l, r| {
        Some(op.apply(l?.cast(), r?.cast()).cast())
    })
}

/// `C[i,j] = A[i,j] ⊕ B[i,j]` over the union of both patterns; a missing
/// side, or an entry of a pattern matrix, reads as the identity.
///
/// Descriptors and errors as for [`e_wise_apply_matrix`], except that
/// pattern operands are accepted.
pub fn e_wise_apply_matrix_monoid<TO, TA, TB, O>(
    out: &mut Matrix<TO>,
    a: &Matrix<TA>,
    b: &Matrix<TB>,
    monoid: &Monoid<O>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TA: Domain + Cast<O::D3>,
    TB: Domain + Cast<O::D3>,
    O: Foldable,
    O::D3: Cast<TO>,
{
    check_no_casting::<TA, O::D3>(desc, "left matrix")?;
    check_no_casting::<TB, O::D3>(desc, "right matrix")?;
    check_no_casting::<O::D3, TO>(desc, "output matrix")?;
    let id = monoid.identity();
    e_wise_matrix(out, a, b, Merge::Union, desc, phase, |l, r| {
        let l = l.map_or(id, |l| l.cast_or(id));
        let r = r.map_or(id, |r| r.cast_or(id));
        Some(monoid.fold(l, r).cast())
    })
}

/// `A[i,j] = op(u[i], v[j])` for every present `u[i]` and `v[j]`.
///
/// The previous content of `A` is replaced.
///
/// # Errors
///
/// `Mismatch` unless `A` is `size(u) x size(v)`; `Illegal` if a vector is a
/// pattern vector.
pub fn outer<TO, TU, TV, O>(
    out: &mut Matrix<TO>,
    u: &Vector<TU>,
    v: &Vector<TV>,
    op: &O,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    TO: Domain,
    TU: Domain + Cast<O::D1>,
    TV: Domain + Cast<O::D2>,
    O: Operator,
    O::D3: Cast<TO>,
{
    if (out.nrows(), out.ncols()) != (u.size(), v.size()) {
        return Err(GrbError::mismatch(format!(
            "outer product of sizes {} and {} into a {}x{} matrix",
            u.size(),
            v.size(),
            out.nrows(),
            out.ncols()
        )));
    }
    check_no_casting::<TU, O::D1>(desc, "left vector")?;
    check_no_casting::<TV, O::D2>(desc, "right vector")?;
    check_no_casting::<O::D3, TO>(desc, "output matrix")?;
    check_not_pattern::<TU, O::D1>("left vector")?;
    check_not_pattern::<TV, O::D2>("right vector")?;

    if phase.is_resize() {
        return out.resize(u.nnz().saturating_mul(v.nnz()).max(out.nnz()));
    }

    let (m, n) = (out.nrows(), out.ncols());
    let columns: Vec<(usize, O::D2)> = v.iter_sorted().map(|(j, x)| (j, x.cast())).collect();
    let mut row_ptr = vec![0; m + 1];
    let mut col_idx = Vec::with_capacity(u.nnz() * columns.len());
    let mut values = Vec::with_capacity(col_idx.capacity());
    let mut rows = u.iter_sorted().peekable();
    for i in 0..m {
        if let Some((_, x)) = rows.next_if(|&(r, _)| r == i) {
            let x: O::D1 = x.cast();
            for &(j, y) in &columns {
                col_idx.push(j);
                values.push(op.apply(x, y).cast());
            }
        }
        row_ptr[i + 1] = col_idx.len();
    }
    trace!(left = %u.id(), right = %v.id(), to = %out.id(), nnz = col_idx.len(), "outer product");
    out.assign(
        SparseMatrixCSR {
            n_rows: m,
            n_cols: n,
            row_ptr,
            col_idx,
            values,
        },
        phase,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::operators::{Add, Mul, Subtract};
    use crate::phase::execute;

    const NO_OP: Descriptor = Descriptor::NO_OPERATION;

    // [1 . 2]
    // [. 3 .]
    fn left() -> Matrix<i32> {
        Matrix::from_csr(SparseMatrixCSR::new(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1, 2, 3]))
    }

    // [10 . .]
    // [20 30 40]
    fn right() -> Matrix<i32> {
        Matrix::from_csr(SparseMatrixCSR::new(
            2,
            3,
            vec![0, 1, 4],
            vec![0, 0, 1, 2],
            vec![10, 20, 30, 40],
        ))
    }

    #[test]
    fn test_operator_keeps_intersection() {
        let (a, b) = (left(), right());
        let mut c = Matrix::<i32>::new(2, 3);
        execute(|p| e_wise_apply_matrix(&mut c, &a, &b, &Mul::<i32>::new(), NO_OP, p)).unwrap();
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(0, 0, 10), (1, 1, 90)]);
        // the CCS mirror follows
        assert_eq!(c.ccs().col_iter(1).collect::<Vec<_>>(), vec![(1, &90)]);
    }

    #[test]
    fn test_monoid_keeps_union() {
        let (a, b) = (left(), right());
        let mut c = Matrix::<i32>::new(2, 3);
        let plus = Monoid::<Add<i32>>::plus();
        execute(|p| e_wise_apply_matrix_monoid(&mut c, &a, &b, &plus, NO_OP, p)).unwrap();
        assert_eq!(
            c.iter().collect::<Vec<_>>(),
            vec![(0, 0, 11), (0, 2, 2), (1, 0, 20), (1, 1, 33), (1, 2, 40)]
        );
    }

    #[test]
    fn test_operator_order_and_transpose() {
        // Aᵀ is 3x2: [1 .] [. 3] [2 .]
        let a = left();
        let b = Matrix::from_csr(SparseMatrixCSR::new(
            3,
            2,
            vec![0, 1, 2, 3],
            vec![0, 1, 0],
            vec![5, 5, 5],
        ));
        let mut c = Matrix::<i32>::new(3, 2);
        let minus = Subtract::<i32>::new();
        execute(|p| e_wise_apply_matrix(&mut c, &a, &b, &minus, Descriptor::TRANSPOSE_LEFT, p))
            .unwrap();
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(0, 0, -4), (1, 1, -2), (2, 0, -3)]);

        let mut wrong = Matrix::<i32>::new(2, 3);
        let err =
            e_wise_apply_matrix(&mut wrong, &a, &b, &minus, NO_OP, Phase::Execute).unwrap_err();
        assert!(matches!(err, GrbError::Mismatch(_)));
    }

    #[test]
    fn test_pattern_operands() {
        let pattern = SparseMatrixCSR::new(2, 3, vec![0, 1, 1], vec![2], vec![()]);
        let pattern = Matrix::from_csr(pattern);
        let a = left();
        let times = Monoid::<Mul<i32>>::times();
        let mut c = Matrix::<i32>::new(2, 3);
        execute(|p| e_wise_apply_matrix_monoid(&mut c, &a, &pattern, &times, NO_OP, p)).unwrap();
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(0, 0, 1), (0, 2, 2), (1, 1, 3)]);

        let times_op = Mul::<i32>::new();
        let err = e_wise_apply_matrix(&mut c, &a, &pattern, &times_op, NO_OP, Phase::Execute)
            .unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
    }

    #[test]
    fn test_execute_needs_capacity_and_replaces_output() {
        let (a, b) = (left(), right());
        let plus = Monoid::<Add<i32>>::plus();
        let mut c = Matrix::<i32>::with_capacity(2, 3, 1).unwrap();
        let err = e_wise_apply_matrix_monoid(&mut c, &a, &b, &plus, NO_OP, Phase::Execute)
            .unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));

        execute(|p| e_wise_apply_matrix_monoid(&mut c, &a, &b, &plus, NO_OP, p)).unwrap();
        assert_eq!(c.nnz(), 5);
        execute(|p| e_wise_apply_matrix(&mut c, &a, &b, &Add::<i32>::new(), NO_OP, p)).unwrap();
        assert_eq!(c.nnz(), 2);
    }

    #[test]
    fn test_outer_product() {
        let mut u = Vector::<i32>::new(3);
        u.set_element(2, 0).unwrap();
        u.set_element(-1, 2).unwrap();
        let mut v = Vector::<i32>::new(2);
        v.set_element(5, 1).unwrap();

        let mut a = Matrix::<i32>::new(3, 2);
        execute(|p| outer(&mut a, &u, &v, &Mul::<i32>::new(), NO_OP, p)).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0, 1, 10), (2, 1, -5)]);
        assert_eq!(a.crs().row_ptr, vec![0, 1, 1, 2]);

        let mut wrong = Matrix::<i32>::new(2, 3);
        let err = outer(&mut wrong, &u, &v, &Mul::<i32>::new(), NO_OP, Phase::Execute).unwrap_err();
        assert!(matches!(err, GrbError::Mismatch(_)));
    }
}
