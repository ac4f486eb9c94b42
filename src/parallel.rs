//! # Row-parallel numeric SpGEMM
//!
//! Output rows of `A ⊗ B` are independent, so the numeric phase hands them
//! to Rayon. Each worker keeps its own sort accumulator and uses its own
//! thread-local SPA for dense rows; results are collected in row order and
//! assembled by the caller.

use rayon::prelude::*;

use crate::accumulator::SortAccumulator;
use crate::algebra::{Cast, Domain, SemiringOps};
use crate::blas3::{numeric_row, Row};
use crate::config::EngineConfig;
use crate::matrix::view::Compressed;

/// Every row of `A ⊗ B`, computed in parallel.
///
/// Runs on a pool bounded by `config.system_params.n_threads` when that is
/// below the global pool size.
pub(crate) fn numeric_rows<TA, TB, R>(
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
    let run = || -> Vec<Row<R::Sum>> {
        (0..a.major)
            .into_par_iter()
            .map_init(
                || SortAccumulator::new(config.sort_threshold),
                |sort_acc, i| numeric_row(i, a, b, ring, config, sort_acc),
            )
            .collect()
    };
    let threads = config.system_params.n_threads;
    if threads > 0 && threads < rayon::current_num_threads() {
        if let Ok(pool) = rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            return pool.install(run);
        }
    }
    run()
}
