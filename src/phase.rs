//! Explicit primitive phases and the dispatcher that sequences them.
//!
//! Every primitive takes a [`Phase`]. `Resize` computes the capacity the
//! output needs and allocates it; `Execute` performs the computation and
//! requires that capacity to be present already; `Try` performs the
//! computation without allocating and reports `Failed` when capacity runs out.

use tracing::trace;

use crate::error::{GrbError, Result};

/// Stage of a primitive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Compute required capacities and allocate them.
    Resize,
    /// Compute within existing capacity; insufficient capacity is `Failed`.
    Try,
    /// Compute; insufficient capacity is `Illegal`.
    Execute,
}

impl Phase {
    pub fn is_resize(self) -> bool {
        matches!(self, Phase::Resize)
    }

    /// The error for running out of output capacity in this phase.
    pub(crate) fn capacity_error(self, what: &str, capacity: usize) -> GrbError {
        let msg = format!("{} exceeds capacity {}", what, capacity);
        match self {
            Phase::Try => GrbError::Failed(msg),
            _ => GrbError::Illegal(msg),
        }
    }
}

type Stage<'a> = Box<dyn FnMut(Phase) -> Result<()> + 'a>;

/// Routes primitive calls through RESIZE and then EXECUTE.
///
/// An eager dispatcher runs both phases on the spot. A lazy dispatcher
/// records the whole call; [`Dispatcher::wait`] runs each recorded call
/// through RESIZE and EXECUTE in submission order. A call that reads the
/// output of an earlier one is therefore sized against that output's final
/// contents.
pub struct Dispatcher<'a> {
    lazy: bool,
    stages: Vec<Stage<'a>>,
}

impl<'a> Dispatcher<'a> {
    pub fn eager() -> Self {
        Self {
            lazy: false,
            stages: Vec::new(),
        }
    }

    pub fn lazy() -> Self {
        Self {
            lazy: true,
            stages: Vec::new(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// Submit one primitive call, given as a closure over the phase.
    pub fn run<F>(&mut self, mut call: F) -> Result<()>
    where
        F: FnMut(Phase) -> Result<()> + 'a,
    {
        if self.lazy {
            trace!(pending = self.stages.len() + 1, "deferring call");
            self.stages.push(Box::new(call));
            Ok(())
        } else {
            call(Phase::Resize)?;
            call(Phase::Execute)
        }
    }

    /// Number of recorded calls not yet run.
    pub fn pending(&self) -> usize {
        self.stages.len()
    }

    /// Run every recorded call, both phases, in order. The first error
    /// aborts the remaining calls, which are discarded.
    pub fn wait(&mut self) -> Result<()> {
        let stages = std::mem::take(&mut self.stages);
        for mut stage in stages {
            stage(Phase::Resize)?;
            stage(Phase::Execute)?;
        }
        Ok(())
    }
}

impl Default for Dispatcher<'_> {
    fn default() -> Self {
        Self::eager()
    }
}

/// Run one primitive call through RESIZE then EXECUTE.
pub fn execute<F>(mut call: F) -> Result<()>
where
    F: FnMut(Phase) -> Result<()>,
{
    call(Phase::Resize)?;
    call(Phase::Execute)
}
