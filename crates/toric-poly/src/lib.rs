//! # toric-poly
//!
//! Sparse multivariate polynomials over an exact ring, used for the
//! homogeneous coordinates of toric varieties.
//!
//! This crate provides:
//! - Monomials over any number of variables
//! - Monomial orderings for sorting and printing terms
//! - Sparse polynomials with evaluation and substitution

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod monomial;
pub mod ordering;
pub mod sparse;

#[cfg(test)]
mod proptests;

pub use monomial::Monomial;
pub use ordering::MonomialOrder;
pub use sparse::SparsePoly;
