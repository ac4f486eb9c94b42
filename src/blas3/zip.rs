//! Building a matrix from parallel dense vectors of coordinates and values.

use crate::algebra::Domain;
use crate::blas1::check_size;
use crate::builder::{ingest_triples, IoMode};
use crate::error::{GrbError, Result};
use crate::matrix::Matrix;
use crate::vector::Vector;

fn dense_values<T: Domain>(v: &Vector<T>, role: &str) -> Result<Vec<T>> {
    if !v.is_dense() {
        return Err(GrbError::illegal(format!(
            "{} must be dense, it has {} of {} entries",
            role,
            v.nnz(),
            v.size()
        )));
    }
    Ok(v.iter_sorted().map(|(_, x)| x).collect())
}

fn coordinates(rows: &Vector<usize>, cols: &Vector<usize>) -> Result<Vec<(usize, usize)>> {
    check_size("column index vector", rows.size(), cols.size())?;
    let rows = dense_values(rows, "row index vector")?;
    let cols = dense_values(cols, "column index vector")?;
    Ok(rows.into_iter().zip(cols).collect())
}

/// Replace the content of `a` with `A[rows[k], cols[k]] = vals[k]`.
///
/// Capacity grows as needed. `mode` picks how unsorted input is sorted.
///
/// # Errors
///
/// `Mismatch` if the three vectors differ in size or an index is out of
/// range; `Illegal` if a vector is not dense or a coordinate repeats.
pub fn zip_matrix<T: Domain>(
    a: &mut Matrix<T>,
    rows: &Vector<usize>,
    cols: &Vector<usize>,
    vals: &Vector<T>,
    mode: IoMode,
) -> Result<()> {
    check_size("value vector", rows.size(), vals.size())?;
    let coords = coordinates(rows, cols)?;
    let vals = dense_values(vals, "value vector")?;
    let triples = coords.into_iter().zip(vals).map(|((i, j), v)| (i, j, v)).collect();
    ingest_triples(a, triples, mode)
}

/// Pattern form of [`zip_matrix`].
pub fn zip_matrix_pattern(
    a: &mut Matrix<()>,
    rows: &Vector<usize>,
    cols: &Vector<usize>,
    mode: IoMode,
) -> Result<()> {
    let triples = coordinates(rows, cols)?
        .into_iter()
        .map(|(i, j)| (i, j, ()))
        .collect();
    ingest_triples(a, triples, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(values: &[usize]) -> Vector<usize> {
        let mut v = Vector::new(values.len());
        for (k, &x) in values.iter().enumerate() {
            v.set_element(x, k).unwrap();
        }
        v
    }

    #[test]
    fn test_zip_matrix() {
        let rows = indices(&[2, 0, 1]);
        let cols = indices(&[0, 1, 1]);
        let mut vals = Vector::<f32>::new(3);
        for k in 0..3 {
            vals.set_element(k as f32, k).unwrap();
        }
        let mut a = Matrix::<f32>::new(3, 2);
        zip_matrix(&mut a, &rows, &cols, &vals, IoMode::Sequential).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(0, 1, 1.0), (1, 1, 2.0), (2, 0, 0.0)]);
    }

    #[test]
    fn test_zip_matrix_pattern_rejects_duplicates() {
        let rows = indices(&[1, 1]);
        let cols = indices(&[0, 0]);
        let mut a = Matrix::<()>::new(2, 2);
        let err = zip_matrix_pattern(&mut a, &rows, &cols, IoMode::Sequential).unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
    }

    #[test]
    fn test_zip_matrix_requires_dense_inputs() {
        let rows = indices(&[0, 1]);
        let cols = Vector::<usize>::new(2);
        let mut a = Matrix::<()>::new(2, 2);
        let err = zip_matrix_pattern(&mut a, &rows, &cols, IoMode::Sequential).unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));

        let short = indices(&[0]);
        let err = zip_matrix_pattern(&mut a, &rows, &short, IoMode::Sequential).unwrap_err();
        assert!(matches!(err, GrbError::Mismatch(_)));
    }
}
