//! Orientation-free views over CRS or CCS storage.
//!
//! Kernels walk "lanes": rows of a CRS or columns of a CCS. Reading a
//! matrix as its transpose is then just picking the other storage.

use std::fmt;

use crate::algebra::Domain;
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};

/// Checks compressed arrays describing `major` lanes of length `minor`.
///
/// Indices within a lane must be in range, ascending and unique.
pub(crate) fn check_lanes(
    major: usize,
    minor: usize,
    ptr: &[usize],
    idx: &[usize],
    n_values: usize,
) -> std::result::Result<(), String> {
    if ptr.len() != major + 1 {
        return Err(format!("expected {} pointers, got {}", major + 1, ptr.len()));
    }
    if idx.len() != n_values {
        return Err(format!("{} indices but {} values", idx.len(), n_values));
    }
    if ptr[0] != 0 || ptr[major] != idx.len() {
        return Err(format!("pointers must span 0..{}", idx.len()));
    }
    for lane in 0..major {
        if ptr[lane] > ptr[lane + 1] {
            return Err(format!("pointers decrease at lane {}", lane));
        }
        let lane_idx = &idx[ptr[lane]..ptr[lane + 1]];
        if lane_idx.last().map_or(false, |&k| k >= minor) {
            return Err(format!("lane {} has an index beyond {}", lane, minor));
        }
        if !lane_idx.windows(2).all(|w| w[0] < w[1]) {
            return Err(format!("lane {} is not ascending and unique", lane));
        }
    }
    Ok(())
}

/// Prints at most five entries of at most five lanes.
pub(crate) fn fmt_lanes<T: Domain>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    lane_name: &str,
    shape: (usize, usize),
    lanes: Compressed<'_, T>,
) -> fmt::Result {
    write!(f, "{}({} x {}, nnz {})", name, shape.0, shape.1, lanes.nnz())?;
    let shown = lanes.major.min(5);
    for i in (0..shown).filter(|&i| lanes.lane_len(i) > 0) {
        let (idx, values) = lanes.lane(i);
        write!(f, " {} {}:", lane_name, i)?;
        for (k, v) in idx.iter().zip(values).take(5) {
            write!(f, " {}={:?}", k, v)?;
        }
        if idx.len() > 5 {
            write!(f, " +{}", idx.len() - 5)?;
        }
    }
    if lanes.major > shown {
        write!(f, " ...")?;
    }
    Ok(())
}

#[derive(Debug)]
pub(crate) struct Compressed<'a, T> {
    /// Number of lanes.
    pub(crate) major: usize,
    /// Length of each lane.
    pub(crate) minor: usize,
    ptr: &'a [usize],
    idx: &'a [usize],
    values: &'a [T],
}

impl<'a, T> Clone for Compressed<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Compressed<'a, T> {}

impl<'a, T: Domain> Compressed<'a, T> {
    pub(crate) fn from_csr(m: &'a SparseMatrixCSR<T>) -> Self {
        Self {
            major: m.n_rows,
            minor: m.n_cols,
            ptr: &m.row_ptr,
            idx: &m.col_idx,
            values: &m.values,
        }
    }

    pub(crate) fn from_csc(m: &'a SparseMatrixCSC<T>) -> Self {
        Self {
            major: m.n_cols,
            minor: m.n_rows,
            ptr: &m.col_ptr,
            idx: &m.row_idx,
            values: &m.values,
        }
    }

    /// Minor indices and values of lane `i`, indices ascending.
    #[inline]
    pub(crate) fn lane(&self, i: usize) -> (&'a [usize], &'a [T]) {
        let (start, end) = (self.ptr[i], self.ptr[i + 1]);
        (&self.idx[start..end], &self.values[start..end])
    }

    #[inline]
    pub(crate) fn lane_len(&self, i: usize) -> usize {
        self.ptr[i + 1] - self.ptr[i]
    }

    pub(crate) fn nnz(&self) -> usize {
        self.idx.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_and_column_lanes_agree() {
        let csr = SparseMatrixCSR::new(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1, 2, 3]);
        let csc = csr.to_csc();
        let rows = Compressed::from_csr(&csr);
        let cols = Compressed::from_csc(&csc);

        assert_eq!((rows.major, rows.minor), (2, 3));
        assert_eq!((cols.major, cols.minor), (3, 2));
        assert_eq!(rows.lane(0), (&[0usize, 2][..], &[1, 2][..]));
        assert_eq!(cols.lane(2), (&[0usize][..], &[2][..]));
        assert_eq!(cols.lane_len(1), 1);
        assert_eq!(rows.nnz(), cols.nnz());
    }

    #[test]
    fn test_check_lanes_messages() {
        assert!(check_lanes(2, 3, &[0, 1, 2], &[2, 0], 2).is_ok());
        assert!(check_lanes(0, 0, &[0], &[], 0).is_ok());

        let err = check_lanes(2, 3, &[0, 1], &[0], 1).unwrap_err();
        assert_eq!(err, "expected 3 pointers, got 2");
        let err = check_lanes(1, 3, &[0, 2], &[0, 3], 2).unwrap_err();
        assert!(err.contains("beyond 3"), "{}", err);
        let err = check_lanes(1, 3, &[0, 2], &[1, 1], 2).unwrap_err();
        assert!(err.contains("ascending"), "{}", err);
    }

    #[test]
    fn test_debug_output_is_truncated() {
        let n = 8;
        let csr = SparseMatrixCSR::new(1, n, vec![0, n], (0..n).collect(), vec![1u8; n]);
        let text = format!("{:?}", csr);
        assert!(text.starts_with("SparseMatrixCSR(1 x 8, nnz 8) row 0: 0=1"), "{}", text);
        assert!(text.ends_with("+3"), "{}", text);
    }
}
