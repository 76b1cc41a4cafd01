//! # toric-morphism
//!
//! Fan morphisms and morphisms of toric varieties.
//!
//! A [`FanMorphism`] is a lattice map compatible with two fans. A
//! [`ToricMorphism`] is either such a fan morphism between the fans of two
//! [`ToricVariety`] values or a list of homogeneous polynomials in Cox
//! coordinates. Fibers, fiber components and torus orbit closures are built
//! from the combinatorics of the fans.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod fan_morphism;
pub mod fiber;
pub mod morphism;
pub mod orbit;
pub mod variety;

#[cfg(test)]
mod proptests;

pub use config::MorphismConfig;
pub use error::{MorphismError, Result};
pub use fan_morphism::FanMorphism;
pub use fiber::{FiberComponent, FiberGraph};
pub use morphism::{MorphismDefinition, ToricMorphism};
pub use orbit::OrbitClosure;
pub use variety::{CoxDegree, ToricPoint, ToricVariety};
