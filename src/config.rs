//! Configuration and system parameters for the compute engine

use std::sync::OnceLock;

use tracing::warn;

/// Environment variable overriding the tile size of tiled execution paths
pub const TILE_SIZE_ENV: &str = "GRB_NONBLOCKING_TILE_SIZE";

/// Environment variable bounding the number of worker threads
pub const THREADS_ENV: &str = "OMP_NUM_THREADS";

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Size of cache line in bytes
    pub cache_line_size: usize,
    /// Size of L2 cache in bytes
    pub l2_cache_size: usize,
    /// Number of threads to use
    pub n_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            cache_line_size: 64,        // Common cache line size
            l2_cache_size: 256_000,     // 256KB L2 cache (conservative default)
            n_threads: num_cpus::get(), // Use all available cores
        }
    }
}

/// Accumulation strategy for one output row of a sparse product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStrategy {
    /// Few intermediate products: collect, sort, merge duplicates
    Sort,
    /// Scatter into the dense sparse accumulator
    Dense,
}

/// Configuration for the compute engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Rows with at most this many intermediate products use the sort
    /// accumulator; all others use the dense sparse accumulator
    pub sort_threshold: usize,

    /// Minimum number of output rows before SpGEMM runs row-parallel
    pub parallel_threshold: usize,

    /// Tile size for tiled execution; `None` lets each primitive decide
    pub tile_size: Option<usize>,

    /// Allocations of at least this many bytes are reported
    pub alloc_report_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_params: SystemParameters::default(),
            sort_threshold: 32,
            parallel_threshold: 4096,
            tile_size: None,
            alloc_report_threshold: 1 << 30,
        }
    }
}

impl EngineConfig {
    /// Default configuration with `OMP_NUM_THREADS` and
    /// `GRB_NONBLOCKING_TILE_SIZE` applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let threads = std::env::var(THREADS_ENV).ok();
        let tile = std::env::var(TILE_SIZE_ENV).ok();
        config.apply_overrides(threads.as_deref(), tile.as_deref());
        config
    }

    /// Apply textual overrides as they would appear in the environment.
    /// Values that are not positive integers are ignored.
    pub fn apply_overrides(&mut self, threads: Option<&str>, tile_size: Option<&str>) {
        if let Some(raw) = threads {
            match parse_positive(raw) {
                Some(n) => {
                    // upper bound only, never more than the machine has
                    self.system_params.n_threads = n.min(num_cpus::get().max(1));
                }
                None => warn!(value = raw, "ignoring invalid {}", THREADS_ENV),
            }
        }
        if let Some(raw) = tile_size {
            match parse_positive(raw) {
                Some(n) => self.tile_size = Some(n),
                None => warn!(value = raw, "ignoring invalid {}", TILE_SIZE_ENV),
            }
        }
    }

    /// Process-wide configuration, built from the environment on first use
    pub fn global() -> &'static EngineConfig {
        static GLOBAL: OnceLock<EngineConfig> = OnceLock::new();
        GLOBAL.get_or_init(EngineConfig::from_env)
    }

    /// Choose the accumulator for a row with `products` intermediate products
    pub fn row_strategy(&self, products: usize) -> RowStrategy {
        if products <= self.sort_threshold {
            RowStrategy::Sort
        } else {
            RowStrategy::Dense
        }
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&n| n > 0)
}
