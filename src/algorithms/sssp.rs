//! Single-source shortest paths by repeated min-plus relaxation.

use std::ops::Add;

use tracing::{debug, warn};

use crate::algebra::semiring::min_plus;
use crate::algebra::{Cast, Domain, IdentityOf, Infinity, Zero};
use crate::blas2::vxm;
use crate::descriptor::Descriptor;
use crate::error::{GrbError, Result};
use crate::mask::NO_MASK;
use crate::matrix::Matrix;
use crate::phase::execute;
use crate::vector::Vector;

fn same_entries<T: Domain + PartialEq>(a: &Vector<T>, b: &Vector<T>) -> bool {
    a.nnz() == b.nnz() && a.iter().all(|(i, v)| b.get(i) == Some(v))
}

/// Distances from `root` along the weighted edges `A[i, j]` (`i -> j`).
///
/// `dist` receives the length of the shortest path to every reachable
/// vertex; unreachable vertices are absent. Each round computes
/// `dist = dist min (dist min.+ A)` until nothing changes. Returns the
/// number of rounds.
///
/// # Errors
///
/// `Mismatch` if `A` is not square or `dist` has the wrong size,
/// `Illegal` if `root` is out of range, `Failed` if distances still
/// change after one round per vertex (a negative cycle).
pub fn sssp<T>(dist: &mut Vector<T>, a: &Matrix<T>, root: usize) -> Result<usize>
where
    T: Domain + Cast<T> + PartialOrd + Add<Output = T>,
    T: IdentityOf<Infinity> + IdentityOf<Zero>,
{
    let n = a.nrows();
    if a.ncols() != n || dist.size() != n {
        return Err(GrbError::mismatch(format!(
            "shortest paths over a {}x{} matrix into a vector of size {}",
            n,
            a.ncols(),
            dist.size()
        )));
    }
    if root >= n {
        return Err(GrbError::illegal(format!("root {} outside 0..{}", root, n)));
    }

    let ring = min_plus::<T>();
    dist.clear();
    dist.set_element(<T as IdentityOf<Zero>>::identity(), root)?;
    for round in 1..=n {
        let frontier = dist.clone();
        execute(|p| vxm(dist, NO_MASK, &frontier, a, &ring, Descriptor::IN_PLACE, p))?;
        if same_entries(dist, &frontier) {
            debug!(root, rounds = round, reached = dist.nnz(), "shortest paths converged");
            return Ok(round);
        }
    }
    warn!(root, n, "shortest paths did not converge");
    Err(GrbError::Failed(format!(
        "distances from {} still changing after {} rounds",
        root, n
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_matrix_unique, IoMode};

    fn graph(n: usize, edges: &[(usize, usize, i64)]) -> Matrix<i64> {
        let mut a = Matrix::new(n, n);
        build_matrix_unique(
            &mut a,
            edges.iter().map(|e| e.0),
            edges.iter().map(|e| e.1),
            edges.iter().map(|e| e.2),
            IoMode::Sequential,
        )
        .unwrap();
        a
    }

    #[test]
    fn test_unreachable_vertices_stay_absent() {
        let a = graph(4, &[(0, 1, 3), (2, 3, 1)]);
        let mut dist = Vector::new(4);
        sssp(&mut dist, &a, 0).unwrap();
        assert_eq!(dist.iter_sorted().collect::<Vec<_>>(), vec![(0, 0), (1, 3)]);
    }

    #[test]
    fn test_negative_cycle_fails() {
        let a = graph(2, &[(0, 1, 1), (1, 0, -3)]);
        let mut dist = Vector::new(2);
        assert!(matches!(sssp(&mut dist, &a, 0), Err(GrbError::Failed(_))));
    }

    #[test]
    fn test_bad_arguments() {
        let a = graph(3, &[(0, 1, 1)]);
        let mut short = Vector::new(2);
        assert!(matches!(sssp(&mut short, &a, 0), Err(GrbError::Mismatch(_))));
        let mut dist = Vector::new(3);
        assert!(matches!(sssp(&mut dist, &a, 3), Err(GrbError::Illegal(_))));
    }
}
