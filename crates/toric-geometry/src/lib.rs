//! # toric-geometry
//!
//! Rational polyhedral cones and fans in an integer lattice `N = Z^n`.
//!
//! Cones carry both their ray and facet descriptions, computed exactly by
//! an integer double description. Fans materialize every cone once and
//! index it by its set of ray indices.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cone;
pub mod config;
pub mod double_description;
pub mod error;
pub mod fan;

#[cfg(test)]
mod proptests;

pub use cone::Cone;
pub use config::FanConfig;
pub use double_description::{double_description, DoubleDescription};
pub use error::{GeometryError, Result};
pub use fan::{Fan, FanCone};
