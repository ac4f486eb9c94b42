//! Container allocation with failure mapping and large-allocation reports.

use std::mem;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::Result;

/// Placement of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocMode {
    /// Private scratch of one thread, cache-line aligned.
    Aligned,
    /// Container storage shared by all threads.
    Interleaved,
}

/// Allocate `len` copies of `fill`. Failure maps to `OutOfMem`; allocations at
/// or above the configured threshold are reported either way.
pub(crate) fn allocate<T: Clone>(len: usize, fill: T, mode: AllocMode, role: &str) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    reserve(&mut buf, len, mode, role)?;
    buf.resize(len, fill);
    Ok(buf)
}

/// Grow `buf` so that it can hold `additional` more elements without
/// reallocating.
pub(crate) fn reserve<T>(buf: &mut Vec<T>, additional: usize, mode: AllocMode, role: &str) -> Result<()> {
    let bytes = additional.saturating_mul(mem::size_of::<T>());
    let result = buf.try_reserve_exact(additional);
    report(bytes, mode, role, result.is_ok());
    result.map_err(Into::into)
}

pub(crate) fn report(bytes: usize, mode: AllocMode, role: &str, ok: bool) {
    if bytes < EngineConfig::global().alloc_report_threshold {
        return;
    }
    if ok {
        info!(bytes, ?mode, role, "allocated");
    } else {
        warn!(bytes, ?mode, role, "allocation failed");
    }
}
