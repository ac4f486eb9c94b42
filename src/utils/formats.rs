//! Conversions between our containers and external libraries
//!
//! `sprs` for sparse matrices (both orientations), `ndarray` for dense
//! vectors.

use ndarray::{Array1, ArrayView1};
use num_traits::Num;
use sprs::CsMat;

use crate::algebra::Domain;
use crate::error::Result;
use crate::matrix::{Matrix, SparseMatrixCSR};
use crate::vector::Vector;

/// The row-major storage of `a` as an sprs CsMat in CSR format
pub fn to_sprs_csr<T>(a: &Matrix<T>) -> CsMat<T>
where
    T: Domain + Num,
{
    let crs = a.crs();
    CsMat::new(
        (crs.n_rows, crs.n_cols),
        crs.row_ptr.clone(),
        crs.col_idx.clone(),
        crs.values.clone(),
    )
}

/// The column-major mirror of `a` as an sprs CsMat in CSC format
pub fn to_sprs_csc<T>(a: &Matrix<T>) -> CsMat<T>
where
    T: Domain + Num,
{
    let ccs = a.ccs();
    CsMat::new_csc(
        (ccs.n_rows, ccs.n_cols),
        ccs.col_ptr.clone(),
        ccs.row_idx.clone(),
        ccs.values.clone(),
    )
}

/// A matrix holding the entries of `m`, converted to CSR first if needed
///
/// # Errors
///
/// `Mismatch` if the storage of `m` does not describe a valid CRS.
pub fn from_sprs_csr<T>(m: CsMat<T>) -> Result<Matrix<T>>
where
    T: Domain + Num,
{
    let m = if m.is_csr() { m } else { m.to_csr() };
    let (rows, cols) = m.shape();
    let (indptr, indices, data) = m.into_raw_storage();
    let crs = SparseMatrixCSR::try_new(rows, cols, indptr, indices, data)?;
    Ok(Matrix::from_csr(crs))
}

/// Dense copy of `v`; absent positions read as `fill`
pub fn vector_to_array<T: Domain>(v: &Vector<T>, fill: T) -> Array1<T> {
    let mut out = Array1::from_elem(v.size(), fill);
    for (i, x) in v.iter() {
        out[i] = x;
    }
    out
}

/// A dense vector holding every element of `a`
pub fn vector_from_array<T: Domain>(a: ArrayView1<'_, T>) -> Result<Vector<T>> {
    let mut v = Vector::with_capacity(a.len(), a.len())?;
    for (i, &x) in a.iter().enumerate() {
        v.set_element(x, i)?;
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::semiring::plus_times;
    use crate::blas3::mxm;
    use crate::descriptor::Descriptor;
    use ndarray::array;

    fn sample() -> Matrix<f64> {
        Matrix::from_csr(SparseMatrixCSR::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        ))
    }

    #[test]
    fn test_csr_roundtrip() {
        let original = sample();
        let roundtrip = from_sprs_csr(to_sprs_csr(&original)).unwrap();
        assert_eq!(roundtrip.crs(), original.crs());
        assert_eq!(roundtrip.ccs(), original.ccs());
    }

    #[test]
    fn test_csc_mirror_matches_sprs_conversion() {
        let a = sample();
        let ours = to_sprs_csc(&a);
        let theirs = to_sprs_csr(&a).to_csc();
        assert_eq!(ours.indptr().raw_storage(), theirs.indptr().raw_storage());
        assert_eq!(ours.indices(), theirs.indices());
        assert_eq!(ours.data(), theirs.data());

        let back = from_sprs_csr(ours).unwrap();
        assert_eq!(back.crs(), a.crs());
    }

    #[test]
    fn test_mxm_agrees_with_sprs() {
        // A = [1 2; 0 3], B = [4 5; 6 7], AB = [16 19; 18 21]
        let a = Matrix::from_csr(SparseMatrixCSR::new(
            2,
            2,
            vec![0, 2, 3],
            vec![0, 1, 1],
            vec![1.0f64, 2.0, 3.0],
        ));
        let b = Matrix::from_csr(SparseMatrixCSR::new(
            2,
            2,
            vec![0, 2, 4],
            vec![0, 1, 0, 1],
            vec![4.0f64, 5.0, 6.0, 7.0],
        ));
        let expected = from_sprs_csr(&to_sprs_csr(&a) * &to_sprs_csr(&b)).unwrap();

        let mut c = Matrix::<f64>::new(2, 2);
        let ring = plus_times::<f64>();
        crate::phase::execute(|p| mxm(&mut c, &a, &b, &ring, Descriptor::NO_OPERATION, p)).unwrap();
        assert_eq!(c.crs(), expected.crs());
        assert_eq!(c.get(1, 0), Some(18.0));
    }

    #[test]
    fn test_array_roundtrip() {
        let a = array![1.5f32, -2.0, 0.0];
        let v = vector_from_array(a.view()).unwrap();
        assert!(v.is_dense());
        assert_eq!(vector_to_array(&v, 9.0), a);

        let mut sparse = Vector::<i32>::new(3);
        sparse.set_element(4, 1).unwrap();
        assert_eq!(vector_to_array(&sparse, -1), array![-1, 4, -1]);
    }
}
