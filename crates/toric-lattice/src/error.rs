//! Error types for lattice operations.

use thiserror::Error;

/// Errors raised by lattice and sublattice operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// A point or matrix does not live in the expected lattice.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension required by the receiver.
        expected: usize,
        /// Dimension that was supplied.
        found: usize,
    },

    /// A point was expected to lie in a sublattice but does not.
    #[error("{point} is not in the sublattice")]
    NotInSublattice {
        /// The offending point, formatted.
        point: String,
    },
}

/// Result alias for lattice operations.
pub type Result<T> = std::result::Result<T, LatticeError>;
