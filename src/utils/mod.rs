//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csr, to_sprs_csc, to_sprs_csr, vector_from_array, vector_to_array};

/// Offsets from per-lane counts: `out[i]` is the sum of `counts[..i]`.
///
/// The result has one more element than the input; the last one is the
/// total.
pub fn exclusive_scan(counts: &[usize]) -> Vec<usize> {
    std::iter::once(0)
        .chain(counts.iter().scan(0, |total, &c| {
            *total += c;
            Some(*total)
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        let input = vec![1, 2, 3, 4];
        let expected = vec![0, 1, 3, 6, 10];
        assert_eq!(exclusive_scan(&input), expected);

        let input = vec![0, 0, 5, 0];
        let expected = vec![0, 0, 0, 5, 5];
        assert_eq!(exclusive_scan(&input), expected);

        assert_eq!(exclusive_scan(&[]), vec![0]);
    }
}
