//! Error types for fan morphisms and toric morphisms.

use thiserror::Error;
use toric_geometry::GeometryError;
use toric_lattice::LatticeError;

/// Errors raised by fan morphisms, toric varieties and toric morphisms.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MorphismError {
    /// A lattice-level operation failed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// A cone or fan operation failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The matrix does not map the domain lattice to the codomain lattice.
    #[error("A {rows}x{cols} matrix does not map a {domain}-d lattice to a {codomain}-d lattice")]
    ShapeMismatch {
        /// Rows of the matrix.
        rows: usize,
        /// Columns of the matrix.
        cols: usize,
        /// Dimension of the domain lattice.
        domain: usize,
        /// Dimension of the codomain lattice.
        codomain: usize,
    },

    /// The image of a domain cone is not inside any codomain cone.
    #[error("The image of the domain cone on rays {indices:?} is not contained in a single codomain cone")]
    IncompatibleFans {
        /// Ray indices of the domain cone.
        indices: Vec<usize>,
    },

    /// A fan morphism was paired with a variety over another fan.
    #[error("The fan morphism domain must be the fan of the domain.")]
    DomainFanMismatch,

    /// A fan morphism was paired with a variety over another fan.
    #[error("The fan morphism codomain must be the fan of the codomain.")]
    CodomainFanMismatch,

    /// The middle objects of a composition differ.
    #[error("Cannot compose: the codomain of the right factor is not the domain of the left factor")]
    CompositionMismatch,

    /// Wrong number of defining polynomials.
    #[error("There must be {expected} polynomials, got {found}")]
    PolynomialCount {
        /// One polynomial per codomain ray.
        expected: usize,
        /// Number supplied.
        found: usize,
    },

    /// A polynomial does not live in the Cox ring of the domain.
    #[error("Polynomial {index} has {found} variables, the Cox ring of the domain has {expected}")]
    WrongRing {
        /// Position of the polynomial.
        index: usize,
        /// Number of domain rays.
        expected: usize,
        /// Number of variables of the polynomial.
        found: usize,
    },

    /// A polynomial is not homogeneous for the class group grading.
    #[error("{polynomial} is not homogeneous!")]
    NotHomogeneous {
        /// The polynomial, formatted in the domain coordinates.
        polynomial: String,
    },

    /// Some domain ray maps to a non-integral or negative combination.
    #[error("The fan morphism cannot be written in homogeneous polynomials.")]
    NotPolynomialFanMorphism,

    /// A fiber ray has no preimage ray.
    #[error("The morphism cannot be written using homogeneous polynomials.")]
    NotPolynomialFiberEmbedding,

    /// An orbit ray is not the image of a ray of the ambient fan.
    #[error("The embedding cannot be written with homogeneous polynomials.")]
    NotPolynomialOrbitEmbedding,

    /// A polynomial morphism does not come from a lattice map.
    #[error("The morphism cannot be written as a fan morphism: {reason}")]
    NotFanMorphism {
        /// Why the conversion failed.
        reason: String,
    },

    /// An operation needs a morphism defined by a fan morphism.
    #[error("The morphism is not defined by a fan morphism")]
    NotFanBased,

    /// A codomain cone has no primitive preimage cone.
    #[error("{cone} has no primitive preimage cone")]
    NoPrimitivePreimage {
        /// The codomain cone, formatted.
        cone: String,
    },

    /// A point has the wrong number of homogeneous coordinates.
    #[error("There must be {expected} coordinates! Got only {found}")]
    CoordinateCount {
        /// One coordinate per ray.
        expected: usize,
        /// Number supplied.
        found: usize,
    },

    /// The zero coordinates of a point are not the rays of a single cone.
    #[error("{point} lies in the exceptional set")]
    ExceptionalPoint {
        /// The point, formatted.
        point: String,
    },

    /// Wrong number of coordinate names for a variety.
    #[error("There must be {expected} coordinate names, got {found}")]
    NameCount {
        /// One name per ray.
        expected: usize,
        /// Number supplied.
        found: usize,
    },
}

/// Result alias for morphism operations.
pub type Result<T> = std::result::Result<T, MorphismError>;
