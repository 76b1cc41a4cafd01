//! Points of an integer lattice.

use std::fmt;
use std::ops::{Add, Index, Neg, Sub};

use smallvec::SmallVec;
use toric_linalg::DenseMatrix;
use toric_rings::{EuclideanDomain, Ring, Z};

use crate::error::{LatticeError, Result};

/// Inline storage covers the dimensions toric examples actually use.
type Coords = SmallVec<[Z; 4]>;

/// An immutable point of `Z^n`.
///
/// Ordering is lexicographic on the coordinates, which gives fans and cones
/// a deterministic order for their rays.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LatticePoint {
    coords: Coords,
}

impl LatticePoint {
    /// Creates a point from its coordinates.
    pub fn new(coords: impl IntoIterator<Item = Z>) -> Self {
        Self {
            coords: coords.into_iter().collect(),
        }
    }

    /// Creates a point from machine integers.
    #[must_use]
    pub fn from_i64s(coords: &[i64]) -> Self {
        Self::new(coords.iter().map(|&c| Z::new(c)))
    }

    /// The origin of `Z^dim`.
    #[must_use]
    pub fn zero(dim: usize) -> Self {
        Self::new(std::iter::repeat_with(Z::zero).take(dim))
    }

    /// The `i`-th standard basis vector of `Z^dim`.
    #[must_use]
    pub fn unit(dim: usize, i: usize) -> Self {
        Self::new((0..dim).map(|j| if i == j { Z::one() } else { Z::zero() }))
    }

    /// Dimension of the ambient lattice.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// The coordinates.
    #[must_use]
    pub fn coords(&self) -> &[Z] {
        &self.coords
    }

    /// Copies the coordinates into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Z> {
        self.coords.to_vec()
    }

    /// True for the origin.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coords.iter().all(Ring::is_zero)
    }

    /// Standard pairing with another point.
    #[must_use]
    pub fn dot(&self, other: &Self) -> Z {
        debug_assert_eq!(self.dim(), other.dim());
        toric_linalg::dense_matrix::dot(&self.coords, &other.coords)
    }

    /// Multiplies every coordinate by `factor`.
    #[must_use]
    pub fn scale(&self, factor: &Z) -> Self {
        Self::new(self.coords.iter().map(|c| c * factor))
    }

    /// The gcd of the coordinates; zero for the origin.
    #[must_use]
    pub fn content(&self) -> Z {
        Z::gcd_all(&self.coords)
    }

    /// The primitive vector on the same ray. The origin is returned as is.
    #[must_use]
    pub fn primitive(&self) -> Self {
        let content = self.content();
        if content.is_zero() || content.is_one() {
            return self.clone();
        }
        Self::new(self.coords.iter().map(|c| c.exact_div(&content)))
    }

    /// True if the coordinates are coprime.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.content().is_one()
    }

    /// Image under a lattice map in row convention: `self · m`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::DimensionMismatch`] when `m` does not have
    /// one row per coordinate.
    pub fn apply(&self, m: &DenseMatrix<Z>) -> Result<Self> {
        if m.num_rows() != self.dim() {
            return Err(LatticeError::DimensionMismatch {
                expected: m.num_rows(),
                found: self.dim(),
            });
        }
        Ok(Self::new(m.vm(&self.coords)))
    }

    /// Divides out a common factor that is known to divide every coordinate.
    #[must_use]
    pub fn exact_div(&self, divisor: &Z) -> Self {
        debug_assert!(self.coords.iter().all(|c| divisor.divides(c)));
        Self::new(self.coords.iter().map(|c| c.exact_div(divisor)))
    }
}

impl FromIterator<Z> for LatticePoint {
    fn from_iter<I: IntoIterator<Item = Z>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<Z>> for LatticePoint {
    fn from(coords: Vec<Z>) -> Self {
        Self::new(coords)
    }
}

impl From<LatticePoint> for Vec<Z> {
    fn from(point: LatticePoint) -> Self {
        point.coords.into_vec()
    }
}

impl Index<usize> for LatticePoint {
    type Output = Z;

    fn index(&self, i: usize) -> &Z {
        &self.coords[i]
    }
}

impl Add for &LatticePoint {
    type Output = LatticePoint;

    fn add(self, other: Self) -> LatticePoint {
        debug_assert_eq!(self.dim(), other.dim());
        self.coords.iter().zip(&other.coords).map(|(a, b)| a + b).collect()
    }
}

impl Add for LatticePoint {
    type Output = LatticePoint;

    fn add(self, other: Self) -> LatticePoint {
        &self + &other
    }
}

impl Sub for &LatticePoint {
    type Output = LatticePoint;

    fn sub(self, other: Self) -> LatticePoint {
        debug_assert_eq!(self.dim(), other.dim());
        self.coords.iter().zip(&other.coords).map(|(a, b)| a - b).collect()
    }
}

impl Sub for LatticePoint {
    type Output = LatticePoint;

    fn sub(self, other: Self) -> LatticePoint {
        &self - &other
    }
}

impl Neg for &LatticePoint {
    type Output = LatticePoint;

    fn neg(self) -> LatticePoint {
        self.coords.iter().map(|c| -c).collect()
    }
}

impl Neg for LatticePoint {
    type Output = LatticePoint;

    fn neg(self) -> LatticePoint {
        -&self
    }
}

impl fmt::Debug for LatticePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for LatticePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}
