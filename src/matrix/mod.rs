// Matrix data structures and operations

mod container;
pub mod conversion;
pub mod csc;
pub mod csr;
pub mod reference;
pub(crate) mod view;

pub use container::Matrix;
pub use csc::SparseMatrixCSC;
pub use csr::SparseMatrixCSR;
pub use reference::{reference_mxm, reference_mxv};
