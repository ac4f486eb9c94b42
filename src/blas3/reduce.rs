//! Reducing every entry of a matrix to one scalar.

use rayon::prelude::*;

use crate::algebra::{check_no_casting, check_not_pattern, Cast, Domain, Foldable, Monoid};
use crate::config::EngineConfig;
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::matrix::Matrix;

fn reduce_values<T, O>(a: &Matrix<T>, monoid: &Monoid<O>) -> O::D3
where
    T: Domain + Cast<O::D3>,
    O: Foldable,
{
    let values = &a.crs().values;
    if values.len() >= EngineConfig::global().parallel_threshold {
        values
            .par_iter()
            .fold(|| monoid.identity(), |acc, &v| monoid.fold(acc, v.cast()))
            .reduce(|| monoid.identity(), |x, y| monoid.fold(x, y))
    } else {
        monoid.fold_all(values.iter().map(|&v| v.cast()))
    }
}

/// `out = out ⊕ (⊕ A[i,j])` over the present entries of `A`.
pub fn foldl_matrix<T, O>(
    out: &mut O::D3,
    a: &Matrix<T>,
    monoid: &Monoid<O>,
    desc: Descriptor,
) -> Result<()>
where
    T: Domain + Cast<O::D3>,
    O: Foldable,
{
    check_no_casting::<T, O::D3>(desc, "matrix")?;
    check_not_pattern::<T, O::D3>("matrix")?;
    *out = monoid.fold(*out, reduce_values(a, monoid));
    Ok(())
}

/// `out = (⊕ A[i,j]) ⊕ out` over the present entries of `A`.
pub fn foldr_matrix<T, O>(
    a: &Matrix<T>,
    out: &mut O::D3,
    monoid: &Monoid<O>,
    desc: Descriptor,
) -> Result<()>
where
    T: Domain + Cast<O::D3>,
    O: Foldable,
{
    check_no_casting::<T, O::D3>(desc, "matrix")?;
    check_not_pattern::<T, O::D3>("matrix")?;
    *out = monoid.fold(reduce_values(a, monoid), *out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::operators::{Add, Max};
    use crate::matrix::SparseMatrixCSR;

    #[test]
    fn test_fold_matrix() {
        let a = Matrix::from_csr(SparseMatrixCSR::new(
            2,
            2,
            vec![0, 1, 3],
            vec![1, 0, 1],
            vec![3i64, -4, 10],
        ));
        let mut sum = 1i64;
        foldl_matrix(&mut sum, &a, &Monoid::<Add<i64>>::plus(), Descriptor::NO_OPERATION).unwrap();
        assert_eq!(sum, 10);

        let mut largest = 0.0f64;
        let max = Monoid::<Max<f64>>::max();
        foldr_matrix(&a, &mut largest, &max, Descriptor::NO_OPERATION).unwrap();
        assert_eq!(largest, 10.0);
    }

    #[test]
    fn test_empty_matrix_keeps_scalar() {
        let a = Matrix::<u8>::new(3, 3);
        let mut x = 7u32;
        foldl_matrix(&mut x, &a, &Monoid::<Add<u32>>::plus(), Descriptor::NO_OPERATION).unwrap();
        assert_eq!(x, 7);
    }

    #[test]
    fn test_pattern_matrix_is_refused() {
        let pattern = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![(), ()]);
        let a = Matrix::from_csr(pattern);
        let mut count = 0u64;
        let plus = Monoid::<Add<u64>>::plus();
        let err = foldl_matrix(&mut count, &a, &plus, Descriptor::NO_OPERATION).unwrap_err();
        assert!(matches!(err, crate::error::GrbError::Illegal(_)));
        assert_eq!(count, 0);
    }
}
