//! Ingestion of index/value streams into vectors and matrices.
//!
//! Builders compute the capacity they need and allocate it before writing,
//! so they never fail for lack of capacity. `IoMode::Parallel` sorts the
//! input with rayon; results are identical to `IoMode::Sequential`.

use rayon::prelude::*;
use tracing::debug;

use crate::algebra::operators::RightAssign;
use crate::algebra::{Cast, Domain, Operator};
use crate::coordinates::Coordinates;
use crate::error::{GrbError, Result};
use crate::matrix::{Matrix, SparseMatrixCSR};
use crate::phase::Phase;
use crate::utils::exclusive_scan;
use crate::vector::Vector;

/// Whether the input stream comes from one origin or may be split up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoMode {
    #[default]
    Sequential,
    Parallel,
}

/// Fold `values` into positions `0, 1, …` of `v`.
///
/// Present entries are combined with `dup(old, new)`; absent ones take the
/// new value.
///
/// # Errors
///
/// `Mismatch` if there are more values than positions.
pub fn build_vector<T, I, O>(v: &mut Vector<T>, values: I, dup: &O, mode: IoMode) -> Result<()>
where
    T: Domain,
    I: IntoIterator<Item = T>,
    O: Operator<D1 = T, D2 = T, D3 = T>,
{
    let values: Vec<T> = values.into_iter().collect();
    build_vector_indexed(v, 0..values.len(), values, dup, mode)
}

/// Fold `(indices[k], values[k])` into `v` in input order.
///
/// An index that is already present in `v`, or that repeats within the
/// input, is combined with `dup(old, new)`.
///
/// # Errors
///
/// `Mismatch` if the two streams differ in length or an index is out of
/// range.
pub fn build_vector_indexed<T, II, IV, O>(
    v: &mut Vector<T>,
    indices: II,
    values: IV,
    dup: &O,
    mode: IoMode,
) -> Result<()>
where
    T: Domain,
    II: IntoIterator<Item = usize>,
    IV: IntoIterator<Item = T>,
    O: Operator<D1 = T, D2 = T, D3 = T>,
{
    let mut entries = zip_streams(indices, values)?;
    check_range(entries.iter().map(|&(i, _)| i), v.size(), "vector")?;

    if mode == IoMode::Parallel {
        // stable, so duplicates keep their input order
        entries.par_sort_by_key(|&(i, _)| i);
    }

    let required = v.nnz() + count_new(&entries, v);
    if required > v.capacity() {
        v.resize(required)?;
    }

    let storage = v.storage_mut();
    for (i, value) in entries {
        storage.accumulate(i, value, Phase::Execute, |old, new| dup.apply(old, new))?;
    }
    debug!(id = %v.id(), nnz = v.nnz(), ?mode, "built vector");
    Ok(())
}

/// [`build_vector_indexed`] with the right-assign duplicate operator: later
/// values overwrite earlier ones.
pub fn build_vector_indexed_default<T, II, IV>(
    v: &mut Vector<T>,
    indices: II,
    values: IV,
    mode: IoMode,
) -> Result<()>
where
    T: Domain + Cast<T>,
    II: IntoIterator<Item = usize>,
    IV: IntoIterator<Item = T>,
{
    build_vector_indexed(v, indices, values, &RightAssign::<T>::new(), mode)
}

/// Like [`build_vector_indexed_default`], for inputs promised to be free of
/// repeated indices.
///
/// # Errors
///
/// `Illegal` if an index repeats within the input.
pub fn build_vector_unique<T, II, IV>(
    v: &mut Vector<T>,
    indices: II,
    values: IV,
    mode: IoMode,
) -> Result<()>
where
    T: Domain + Cast<T>,
    II: IntoIterator<Item = usize>,
    IV: IntoIterator<Item = T>,
{
    let entries = zip_streams(indices, values)?;
    check_range(entries.iter().map(|&(i, _)| i), v.size(), "vector")?;
    let mut seen = Coordinates::try_new(v.size())?;
    for &(i, _) in &entries {
        if !seen.set(i) {
            return Err(GrbError::illegal(format!("index {} occurs more than once", i)));
        }
    }
    let (indices, values): (Vec<usize>, Vec<T>) = entries.into_iter().unzip();
    build_vector_indexed_default(v, indices, values, mode)
}

/// Replace the content of `a` with the triples `(rows[k], cols[k], values[k])`.
///
/// The capacity of `a` grows to the number of triples if needed. Input
/// already sorted row-major is ingested without sorting.
///
/// # Errors
///
/// `Mismatch` if the streams differ in length or an index is out of range,
/// `Illegal` if a coordinate repeats.
pub fn build_matrix_unique<T, IR, IC, IV>(
    a: &mut Matrix<T>,
    rows: IR,
    cols: IC,
    values: IV,
    mode: IoMode,
) -> Result<()>
where
    T: Domain,
    IR: IntoIterator<Item = usize>,
    IC: IntoIterator<Item = usize>,
    IV: IntoIterator<Item = T>,
{
    let coords = zip_streams(rows, cols)?;
    let values: Vec<T> = values.into_iter().collect();
    if coords.len() != values.len() {
        return Err(GrbError::mismatch(format!(
            "{} coordinates but {} values",
            coords.len(),
            values.len()
        )));
    }
    let triples = coords
        .into_iter()
        .zip(values)
        .map(|((i, j), v)| (i, j, v))
        .collect();
    ingest_triples(a, triples, mode)
}

/// Pattern form of [`build_matrix_unique`].
pub fn build_matrix_unique_pattern<IR, IC>(
    a: &mut Matrix<()>,
    rows: IR,
    cols: IC,
    mode: IoMode,
) -> Result<()>
where
    IR: IntoIterator<Item = usize>,
    IC: IntoIterator<Item = usize>,
{
    let triples = zip_streams(rows, cols)?
        .into_iter()
        .map(|(i, j)| (i, j, ()))
        .collect();
    ingest_triples(a, triples, mode)
}

/// Sort, validate and install `triples` as the content of `a`.
pub(crate) fn ingest_triples<T: Domain>(
    a: &mut Matrix<T>,
    mut triples: Vec<(usize, usize, T)>,
    mode: IoMode,
) -> Result<()> {
    let (m, n) = (a.nrows(), a.ncols());
    check_range(triples.iter().map(|t| t.0), m, "row")?;
    check_range(triples.iter().map(|t| t.1), n, "column")?;

    let sorted = triples.windows(2).all(|w| (w[0].0, w[0].1) <= (w[1].0, w[1].1));
    if !sorted {
        match mode {
            IoMode::Sequential => triples.sort_unstable_by_key(|t| (t.0, t.1)),
            IoMode::Parallel => triples.par_sort_unstable_by_key(|t| (t.0, t.1)),
        }
    }
    debug!(id = %a.id(), nz = triples.len(), presorted = sorted, ?mode, "building matrix");

    let crs = crs_from_sorted(m, n, &triples)?;
    a.clear();
    a.resize(crs.nnz())?;
    a.assign(crs, Phase::Execute)
}

/// CRS from row-major sorted triples.
///
/// # Errors
///
/// `Illegal` on a repeated coordinate.
pub(crate) fn crs_from_sorted<T: Domain>(
    m: usize,
    n: usize,
    triples: &[(usize, usize, T)],
) -> Result<SparseMatrixCSR<T>> {
    if let Some(w) = triples.windows(2).find(|w| (w[0].0, w[0].1) == (w[1].0, w[1].1)) {
        return Err(GrbError::illegal(format!(
            "coordinate ({}, {}) occurs more than once",
            w[0].0, w[0].1
        )));
    }
    let mut counts = vec![0; m];
    for &(i, _, _) in triples {
        counts[i] += 1;
    }
    Ok(SparseMatrixCSR {
        n_rows: m,
        n_cols: n,
        row_ptr: exclusive_scan(&counts),
        col_idx: triples.iter().map(|t| t.1).collect(),
        values: triples.iter().map(|t| t.2).collect(),
    })
}

fn zip_streams<A, B, IA, IB>(a: IA, b: IB) -> Result<Vec<(A, B)>>
where
    IA: IntoIterator<Item = A>,
    IB: IntoIterator<Item = B>,
{
    let a: Vec<A> = a.into_iter().collect();
    let b: Vec<B> = b.into_iter().collect();
    if a.len() != b.len() {
        return Err(GrbError::mismatch(format!(
            "input streams have lengths {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.into_iter().zip(b).collect())
}

fn check_range(indices: impl Iterator<Item = usize>, bound: usize, what: &str) -> Result<()> {
    let mut indices = indices;
    match indices.find(|&i| i >= bound) {
        Some(i) => Err(GrbError::mismatch(format!(
            "{} index {} out of range {}",
            what, i, bound
        ))),
        None => Ok(()),
    }
}

/// Number of distinct indices in `entries` not yet present in `v`.
fn count_new<T: Domain>(entries: &[(usize, T)], v: &Vector<T>) -> usize {
    let mut fresh = Coordinates::new(v.size());
    entries
        .iter()
        .filter(|&&(i, _)| !v.contains(i) && fresh.set(i))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::operators::Add;

    const DATA: [i32; 15] = [4, 7, 4, 6, 4, 7, 1, 7, 3, 6, 7, 5, 1, 8, 7];
    const DUPS: [usize; 15] = [4, 1, 4, 1, 9, 7, 7, 9, 0, 2, 14, 13, 13, 12, 12];
    const SUMMED: [i32; 15] = [3, 13, 6, 0, 8, 0, 0, 8, 0, 11, 0, 0, 15, 6, 7];

    #[test]
    fn test_build_vector_dense() {
        let mut v = Vector::new(15);
        build_vector(&mut v, DATA, &RightAssign::new(), IoMode::Sequential).unwrap();
        assert_eq!(v.nnz(), 15);
        assert!(v.iter().all(|(i, x)| x == DATA[i]));
    }

    #[test]
    fn test_dup_folds_into_existing_entries() {
        let mut v = Vector::new(15);
        build_vector(&mut v, DATA, &RightAssign::new(), IoMode::Sequential).unwrap();
        build_vector_indexed(&mut v, 0..15, DATA, &Add::new(), IoMode::Sequential).unwrap();
        assert!(v.iter().all(|(i, x)| x == 2 * DATA[i]));
    }

    #[test]
    fn test_dup_within_input() {
        for mode in [IoMode::Sequential, IoMode::Parallel] {
            let mut v = Vector::<i32>::with_capacity(15, 0).unwrap();
            build_vector_indexed(&mut v, DUPS, DATA, &Add::new(), mode).unwrap();
            assert_eq!(v.nnz(), 9);
            assert_eq!(v.capacity(), 9);
            for (i, x) in v.iter() {
                assert_eq!(x, SUMMED[i]);
            }
        }
    }

    #[test]
    fn test_right_assign_keeps_last() {
        let mut v = Vector::<u8>::new(3);
        build_vector_indexed_default(&mut v, [2, 2, 0], [1, 9, 5], IoMode::Parallel).unwrap();
        assert_eq!(v.get(2), Some(9));
        assert_eq!(v.get(0), Some(5));
    }

    #[test]
    fn test_unique_rejects_duplicates() {
        let mut v = Vector::<i32>::new(15);
        let err = build_vector_unique(&mut v, DUPS, DATA, IoMode::Sequential).unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
    }

    #[test]
    fn test_build_vector_mismatch() {
        let mut v = Vector::<i32>::new(2);
        assert!(matches!(
            build_vector(&mut v, [1, 2, 3], &RightAssign::new(), IoMode::Sequential),
            Err(GrbError::Mismatch(_))
        ));
        assert!(matches!(
            build_vector_indexed_default(&mut v, [0], [1, 2], IoMode::Sequential),
            Err(GrbError::Mismatch(_))
        ));
    }

    #[test]
    fn test_build_matrix_unique() {
        for mode in [IoMode::Sequential, IoMode::Parallel] {
            let mut a = Matrix::<f64>::new(3, 3);
            build_matrix_unique(&mut a, [2, 0, 0, 1], [1, 2, 0, 1], [4.0, 2.0, 1.0, 3.0], mode)
                .unwrap();
            assert_eq!(a.nnz(), 4);
            assert!(a.capacity() >= 4);
            assert_eq!(a.crs().col_idx, vec![0, 2, 1, 1]);
            assert_eq!(a.get(2, 1), Some(4.0));
            assert_eq!(a.crs().to_csc(), *a.ccs());
        }
    }

    #[test]
    fn test_build_matrix_rejects_duplicates_and_range() {
        let mut a = Matrix::<i32>::new(2, 2);
        let err = build_matrix_unique(&mut a, [0, 0], [1, 1], [1, 2], IoMode::Sequential).unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
        let err = build_matrix_unique(&mut a, [0, 2], [1, 1], [1, 2], IoMode::Sequential).unwrap_err();
        assert!(matches!(err, GrbError::Mismatch(_)));
    }

    #[test]
    fn test_build_pattern_matrix() {
        let mut a = Matrix::<()>::new(4, 4);
        build_matrix_unique_pattern(&mut a, [3, 1], [0, 2], IoMode::Sequential).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![(1, 2, ()), (3, 0, ())]);
    }
}
