//! # grb: sparse linear algebra over user-chosen semirings
//!
//! Graph and sparse numerical computations are written as compositions of a
//! small set of primitives (`mxv`, `vxm`, `mxm`, element-wise application,
//! `set`, folds and builders) parameterized by monoids and semirings.
//!
//! ## Overview
//!
//! - Containers: [`Vector`] (dense values plus a coordinate index) and
//!   [`Matrix`] (CRS and CCS kept side by side), each with an explicit
//!   capacity.
//! - Algebra: [`Operator`]s, [`Monoid`]s and [`Semiring`]s over any
//!   [`Domain`], with implicit [`Cast`]s between domains.
//! - Every primitive takes a [`Descriptor`] and a [`Phase`]. `Resize`
//!   allocates what the output needs, `Execute` computes within existing
//!   capacity. [`execute`] runs both.
//!
//! ## Usage
//!
//! ```
//! use grb::{execute, mxv, plus_times, Descriptor, Matrix, SparseMatrixCSR, Vector, NO_MASK};
//!
//! let a = Matrix::from_csr(SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![2.0, 3.0]));
//! let mut x = Vector::new(2);
//! x.set_element(1.0, 0).unwrap();
//! x.set_element(1.0, 1).unwrap();
//!
//! let mut y = Vector::<f64>::new(2);
//! let ring = plus_times::<f64>();
//! execute(|p| mxv(&mut y, NO_MASK, &a, &x, &ring, Descriptor::NO_OPERATION, p)).unwrap();
//! assert_eq!(y.get(0), Some(2.0));
//! assert_eq!(y.get(1), Some(3.0));
//! ```

pub mod accumulator;
pub mod algebra;
pub mod algorithms;
pub mod alloc;
pub mod blas1;
pub mod blas2;
pub mod blas3;
pub mod builder;
pub mod config;
pub mod coordinates;
pub mod descriptor;
pub mod error;
pub mod id;
pub mod mask;
pub mod matrix;
mod parallel;
pub mod parser;
pub mod phase;
pub mod pinned;
pub mod scalar;
pub mod utils;
pub mod vector;

// Re-export primary components
pub use algebra::semiring::{
    lor_land, max_plus, max_times, min_plus, min_times, plus_left_assign_if, plus_right_assign_if,
    plus_times,
};
pub use algebra::{BinaryOp, Cast, Domain, Foldable, Monoid, Operator, Semiring, SemiringOps};
pub use blas1::{
    dot, e_wise_apply, e_wise_apply_monoid, e_wise_apply_scalar_left, e_wise_apply_scalar_right,
    e_wise_mul_add, foldl, foldl_reduce, foldl_scalar, foldr, foldr_reduce, foldr_scalar, reduce,
    set_index, set_masked_vector, set_scalar, set_vector, unzip, zip, Operand,
};
pub use blas2::{mxv, mxv_in_place, mxv_input_masked, vxm, vxm_input_masked};
pub use blas3::{
    clear_matrix, e_wise_apply_matrix, e_wise_apply_matrix_monoid, foldl_matrix, foldr_matrix, mxm,
    mxm_pattern, outer, resize_matrix, select, set_matrix, set_matrix_pattern, tril, triu,
    zip_matrix, zip_matrix_pattern, Offset,
};
pub use builder::{
    build_matrix_unique, build_matrix_unique_pattern, build_vector, build_vector_indexed,
    build_vector_indexed_default, build_vector_unique, IoMode,
};
pub use config::EngineConfig;
pub use descriptor::Descriptor;
pub use error::{GrbError, Result};
pub use id::ContainerId;
pub use mask::NO_MASK;
pub use matrix::{Matrix, SparseMatrixCSC, SparseMatrixCSR};
pub use phase::{execute, Dispatcher, Phase};
pub use pinned::PinnedVector;
pub use scalar::Scalar;
pub use utils::{from_sprs_csr, to_sprs_csc, to_sprs_csr, vector_from_array, vector_to_array};
pub use vector::Vector;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
