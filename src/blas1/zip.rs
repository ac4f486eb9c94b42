//! Pairing two vectors of equal pattern into one vector of pairs, and back.

use crate::algebra::Domain;
use crate::blas1::{begin_output, check_size};
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::phase::Phase;
use crate::vector::Vector;

/// `out[i] = (ind[i], val[i])`.
///
/// # Errors
///
/// `Mismatch` on differing sizes, `Illegal` if `ind` and `val` do not have
/// the same pattern.
pub fn zip<I, V>(
    out: &mut Vector<(I, V)>,
    ind: &Vector<I>,
    val: &Vector<V>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    I: Domain,
    V: Domain,
{
    let n = out.size();
    check_size("index vector", n, ind.size())?;
    check_size("value vector", n, val.size())?;
    if ind.nnz() != val.nnz() || ind.iter().any(|(i, _)| !val.contains(i)) {
        return Err(GrbError::illegal(format!(
            "cannot zip vectors of different patterns ({} and {} entries)",
            ind.nnz(),
            val.nnz()
        )));
    }
    if !begin_output(out, desc.without(Descriptor::IN_PLACE), phase, ind.nnz())? {
        return Ok(());
    }

    let vals = val.storage();
    let storage = out.storage_mut();
    for (i, x) in ind.iter() {
        if let Some(y) = vals.get(i) {
            storage.write(i, (x, y), phase)?;
        }
    }
    Ok(())
}

/// Split a vector of pairs into its first and second components.
pub fn unzip<I, V>(
    ind_out: &mut Vector<I>,
    val_out: &mut Vector<V>,
    input: &Vector<(I, V)>,
    desc: Descriptor,
    phase: Phase,
) -> Result<()>
where
    I: Domain,
    V: Domain,
{
    let n = input.size();
    check_size("index output", n, ind_out.size())?;
    check_size("value output", n, val_out.size())?;
    let desc = desc.without(Descriptor::IN_PLACE);
    let ind_ready = begin_output(ind_out, desc, phase, input.nnz())?;
    let val_ready = begin_output(val_out, desc, phase, input.nnz())?;
    if !(ind_ready && val_ready) {
        return Ok(());
    }

    let (ind_storage, val_storage) = (ind_out.storage_mut(), val_out.storage_mut());
    for (i, (x, y)) in input.iter() {
        ind_storage.write(i, x, phase)?;
        val_storage.write(i, y, phase)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_unzip_round_trip() {
        let mut ind = Vector::<usize>::new(8);
        let mut val = Vector::<f32>::new(8);
        for (k, i) in [6usize, 1, 3].into_iter().enumerate() {
            ind.set_element(i * 10, i).unwrap();
            val.set_element(k as f32 + 0.5, i).unwrap();
        }

        let mut pairs = Vector::<(usize, f32)>::new(8);
        zip(&mut pairs, &ind, &val, Descriptor::NO_OPERATION, Phase::Execute).unwrap();
        assert_eq!(pairs.get(3), Some((30, 2.5)));

        let mut ind2 = Vector::<usize>::new(8);
        let mut val2 = Vector::<f32>::new(8);
        unzip(&mut ind2, &mut val2, &pairs, Descriptor::NO_OPERATION, Phase::Execute).unwrap();
        assert_eq!(ind2.iter_sorted().collect::<Vec<_>>(), ind.iter_sorted().collect::<Vec<_>>());
        assert_eq!(val2.iter_sorted().collect::<Vec<_>>(), val.iter_sorted().collect::<Vec<_>>());
    }

    #[test]
    fn test_zip_rejects_different_patterns() {
        let mut ind = Vector::<u32>::new(4);
        let mut val = Vector::<u32>::new(4);
        ind.set_element(1, 0).unwrap();
        val.set_element(1, 2).unwrap();
        let mut out = Vector::<(u32, u32)>::new(4);
        let err = zip(&mut out, &ind, &val, Descriptor::NO_OPERATION, Phase::Execute).unwrap_err();
        assert!(matches!(err, GrbError::Illegal(_)));
    }
}
