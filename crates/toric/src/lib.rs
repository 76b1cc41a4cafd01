//! # toric
//!
//! Toric geometry over exact integer lattices: cones, fans, fan morphisms
//! and morphisms of toric varieties.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use toric::prelude::*;
//!
//! let p1 = Fan::new(
//!     vec![LatticePoint::from_i64s(&[1]), LatticePoint::from_i64s(&[-1])],
//!     vec![vec![0], vec![1]],
//!     1,
//!     &FanConfig::default(),
//! )?;
//! let x = ToricVariety::new(p1);
//! let double = ToricMorphism::from_matrix(x.clone(), x, matrix, &MorphismConfig::default())?;
//! let polys = double.as_polynomial_map()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use toric_geometry as geometry;
pub use toric_lattice as lattice;
pub use toric_linalg as linalg;
pub use toric_morphism as morphism;
pub use toric_poly as poly;
pub use toric_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use toric_geometry::{Cone, Fan, FanCone, FanConfig};
    pub use toric_lattice::{LatticeIndex, LatticePoint, LatticeQuotient, Sublattice};
    pub use toric_linalg::DenseMatrix;
    pub use toric_morphism::{
        FanMorphism, FiberComponent, MorphismConfig, MorphismDefinition, MorphismError,
        OrbitClosure, ToricMorphism, ToricPoint, ToricVariety,
    };
    pub use toric_poly::{Monomial, MonomialOrder, SparsePoly};
    pub use toric_rings::{Field, Ring, Q, Z};
}
