//! Error taxonomy shared by every primitive.
//!
//! A successful call returns `Ok(())`; every other outcome is one of the
//! [`GrbError`] kinds below. Errors are surfaced immediately and never retried
//! by the library itself.

/// Non-success outcome of a primitive call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrbError {
    /// Dimensions or shapes of the arguments are inconsistent.
    #[error("dimension mismatch: {0}")]
    Mismatch(String),

    /// Capacity exhausted, invalid argument, or a violated precondition.
    #[error("illegal call: {0}")]
    Illegal(String),

    /// An allocation could not be satisfied.
    #[error("out of memory: {0}")]
    OutOfMem(String),

    /// The output aliases an input in a way the primitive does not allow.
    #[error("overlapping arguments: {0}")]
    Overlap(String),

    /// An iterative procedure did not reach its goal within its budget, or a
    /// TRY-phase call found insufficient capacity. Not fatal.
    #[error("failed: {0}")]
    Failed(String),

    /// The requested feature is not available.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Library state is corrupt.
    #[error("panic: {0}")]
    Panic(String),
}

impl GrbError {
    /// Stable numeric code of the error kind (success is `0`).
    pub fn code(&self) -> i32 {
        match self {
            Self::Mismatch(_) => 1,
            Self::Illegal(_) => 2,
            Self::OutOfMem(_) => 3,
            Self::Overlap(_) => 4,
            Self::Failed(_) => 5,
            Self::Unsupported(_) => 6,
            Self::Panic(_) => 7,
        }
    }

    /// Upper-case name of the error kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Mismatch(_) => "MISMATCH",
            Self::Illegal(_) => "ILLEGAL",
            Self::OutOfMem(_) => "OUTOFMEM",
            Self::Overlap(_) => "OVERLAP",
            Self::Failed(_) => "FAILED",
            Self::Unsupported(_) => "UNSUPPORTED",
            Self::Panic(_) => "PANIC",
        }
    }

    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        Self::Mismatch(msg.into())
    }

    pub(crate) fn illegal(msg: impl Into<String>) -> Self {
        Self::Illegal(msg.into())
    }
}

impl From<std::collections::TryReserveError> for GrbError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::OutOfMem(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GrbError>;
