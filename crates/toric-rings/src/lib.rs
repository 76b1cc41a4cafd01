//! # toric-rings
//!
//! Exact arithmetic for the toric workspace.
//!
//! This crate provides:
//! - Abstract traits: `Ring`, `EuclideanDomain`, `Field`, `OrderedRing`
//! - The ring of integers `Z` backed by `dashu` big integers
//! - The field of rationals `Q` backed by `dashu` big rationals
//!
//! ## Trait Hierarchy
//!
//! ```text
//! Ring
//!  └── CommutativeRing
//!       └── IntegralDomain
//!            └── EuclideanDomain
//!                 └── Field
//! ```
//!
//! Lattice computations run over `Z`; rational solving (ray coordinates,
//! polynomial exponents) runs over `Q`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod integers;
pub mod rationals;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use integers::Z;
pub use rationals::Q;
pub use traits::{CommutativeRing, EuclideanDomain, Field, IntegralDomain, OrderedRing, Ring};
