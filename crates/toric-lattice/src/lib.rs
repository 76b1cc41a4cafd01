//! # toric-lattice
//!
//! Integer lattices `Z^n` and the sublattice bookkeeping toric geometry
//! needs: spans, saturation, coordinates, indices and quotients.
//!
//! Sublattices are stored by their Hermite basis, so two sublattices are
//! equal exactly when their stored bases are equal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod point;
pub mod quotient;
pub mod sublattice;

#[cfg(test)]
mod proptests;

pub use error::{LatticeError, Result};
pub use point::LatticePoint;
pub use quotient::LatticeQuotient;
pub use sublattice::{LatticeIndex, Sublattice};
