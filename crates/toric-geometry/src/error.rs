//! Error types for cones and fans.

use thiserror::Error;
use toric_lattice::LatticeError;

/// Errors raised while building or querying cones and fans.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A lattice-level operation failed.
    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// A fan was given the zero vector as a ray.
    #[error("Ray {index} of the fan is zero")]
    ZeroRay {
        /// Position of the offending ray.
        index: usize,
    },

    /// Two rays of a fan span the same ray.
    #[error("Rays {first} and {second} of the fan coincide")]
    DuplicateRay {
        /// Position of the first copy.
        first: usize,
        /// Position of the second copy.
        second: usize,
    },

    /// A cone refers to a ray that does not exist.
    #[error("Ray index {index} is out of range for {nrays} rays")]
    RayIndexOutOfRange {
        /// The bad index.
        index: usize,
        /// Number of rays available.
        nrays: usize,
    },

    /// Some listed rays are not used by any generating cone.
    #[error("Rays {indices:?} are not used by any cone of the fan")]
    UnusedRays {
        /// Indices of the unused rays.
        indices: Vec<usize>,
    },

    /// A generating cone is given by redundant rays.
    #[error("Cone on rays {indices:?} is not given by its minimal generators")]
    NonMinimalGenerators {
        /// Ray indices of the cone.
        indices: Vec<usize>,
    },

    /// A generating cone contains a line.
    #[error("Cone on rays {indices:?} is not strictly convex")]
    NotStrictlyConvex {
        /// Ray indices of the cone.
        indices: Vec<usize>,
    },

    /// Two generating cones do not meet along a common face.
    #[error("Cones on rays {first:?} and {second:?} do not intersect along a common face")]
    NotAFan {
        /// Ray indices of the first cone.
        first: Vec<usize>,
        /// Ray indices of the second cone.
        second: Vec<usize>,
    },

    /// A cone was looked up in a fan that does not contain it.
    #[error("{cone} is not a cone of the fan")]
    ConeNotInFan {
        /// The cone, formatted.
        cone: String,
    },
}

/// Result alias for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
