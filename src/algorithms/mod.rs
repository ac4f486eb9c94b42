//! Small applications written purely against the public primitives.

pub mod spy;
pub mod sssp;

pub use spy::{spy, spy_normalized};
pub use sssp::sssp;
