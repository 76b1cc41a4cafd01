//! # toric-linalg
//!
//! Exact dense linear algebra for the toric workspace.
//!
//! This crate provides:
//! - Dense matrices over any ring, rows as vectors
//! - Gaussian elimination, rank, kernels and solving over fields
//! - Hermite Normal Form over Z with unimodular transforms
//! - Smith Normal Form over Euclidean domains with both transforms
//!
//! ## Conventions
//!
//! Lattice maps act on row vectors: the image of `v` under `M` is `v·M`,
//! so a map `Z^m → Z^n` is an `m × n` matrix. `vm` and `solve_left`
//! work in that convention, `mv` and `solve` in the column convention.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dense_matrix;
pub mod hermite_normal_form;
pub mod smith_normal_form;

#[cfg(test)]
mod proptests;

pub use dense_matrix::DenseMatrix;
pub use hermite_normal_form::{hermite_normal_form, integer_left_kernel, HermiteNormalForm};
pub use smith_normal_form::{smith_normal_form, SmithNormalForm};
