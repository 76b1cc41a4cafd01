//! Sublattices of `Z^n`.

use std::fmt;

use toric_linalg::{hermite_normal_form, integer_left_kernel, smith_normal_form, DenseMatrix};
use toric_rings::{EuclideanDomain, Ring, Z};

use crate::error::{LatticeError, Result};
use crate::point::LatticePoint;

/// Index of a sublattice: a positive integer or infinity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LatticeIndex {
    /// The sublattice has full rank and this many cosets.
    Finite(Z),
    /// The sublattice has lower rank than its ambient lattice.
    Infinite,
}

impl LatticeIndex {
    /// True for `Finite(1)`.
    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Finite(n) if n.is_one())
    }

    /// True for a finite index.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }
}

impl fmt::Display for LatticeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => write!(f, "+Infinity"),
        }
    }
}

/// A sublattice of `Z^n`, stored by its Hermite basis.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sublattice {
    ambient_dim: usize,
    /// Rows form the Hermite basis.
    basis: DenseMatrix<Z>,
}

impl Sublattice {
    /// The sublattice spanned by the rows of `generators`.
    #[must_use]
    pub fn from_matrix(generators: &DenseMatrix<Z>) -> Self {
        Self {
            ambient_dim: generators.num_cols(),
            basis: hermite_normal_form(generators).basis(),
        }
    }

    /// The sublattice of `Z^ambient_dim` spanned by `generators`.
    ///
    /// # Errors
    ///
    /// Fails if some generator has the wrong dimension.
    pub fn span<'a>(
        ambient_dim: usize,
        generators: impl IntoIterator<Item = &'a LatticePoint>,
    ) -> Result<Self> {
        let mut rows = Vec::new();
        for g in generators {
            check_dim(ambient_dim, g)?;
            rows.push(g.to_vec());
        }
        Ok(Self::from_matrix(&DenseMatrix::from_rows_with_cols(ambient_dim, rows)))
    }

    /// The zero sublattice.
    #[must_use]
    pub fn zero(ambient_dim: usize) -> Self {
        Self {
            ambient_dim,
            basis: DenseMatrix::zeros(0, ambient_dim),
        }
    }

    /// The whole of `Z^ambient_dim`.
    #[must_use]
    pub fn full(ambient_dim: usize) -> Self {
        Self {
            ambient_dim,
            basis: DenseMatrix::identity(ambient_dim),
        }
    }

    /// Dimension of the ambient lattice.
    #[must_use]
    pub fn ambient_dim(&self) -> usize {
        self.ambient_dim
    }

    /// Rank of the sublattice.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.basis.num_rows()
    }

    /// The basis, one row per generator.
    #[must_use]
    pub fn basis_matrix(&self) -> &DenseMatrix<Z> {
        &self.basis
    }

    /// The basis as points.
    #[must_use]
    pub fn basis(&self) -> Vec<LatticePoint> {
        self.basis.rows().map(|r| LatticePoint::new(r.iter().cloned())).collect()
    }

    /// True if this is the whole ambient lattice.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.index_in_ambient().is_one()
    }

    /// Coordinates of `point` with respect to [`Self::basis`].
    ///
    /// Returns `None` if the point is not in the sublattice.
    #[must_use]
    pub fn coordinates(&self, point: &LatticePoint) -> Option<Vec<Z>> {
        if point.dim() != self.ambient_dim {
            return None;
        }
        // Back-substitution along the Hermite pivots.
        let mut residual = point.to_vec();
        let mut coords = Vec::with_capacity(self.rank());
        for row in self.basis.rows() {
            let pivot_col = row.iter().position(|c| !c.is_zero())?;
            let pivot = &row[pivot_col];
            if !pivot.divides(&residual[pivot_col]) {
                return None;
            }
            let x = residual[pivot_col].div(pivot);
            for (r, b) in residual.iter_mut().zip(row) {
                *r = &*r - &(&x * b);
            }
            coords.push(x);
        }
        residual.iter().all(Ring::is_zero).then_some(coords)
    }

    /// Coordinates of a point that must lie in the sublattice.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::NotInSublattice`] otherwise.
    pub fn coordinates_of(&self, point: &LatticePoint) -> Result<LatticePoint> {
        check_dim(self.ambient_dim, point)?;
        self.coordinates(point)
            .map(LatticePoint::new)
            .ok_or_else(|| LatticeError::NotInSublattice {
                point: point.to_string(),
            })
    }

    /// The ambient point with the given coordinates.
    #[must_use]
    pub fn point_from_coordinates(&self, coords: &[Z]) -> LatticePoint {
        LatticePoint::new(self.basis.vm(coords))
    }

    /// True if `point` lies in the sublattice.
    #[must_use]
    pub fn contains(&self, point: &LatticePoint) -> bool {
        self.coordinates(point).is_some()
    }

    /// True if every basis vector of `other` lies in `self`.
    #[must_use]
    pub fn contains_sublattice(&self, other: &Self) -> bool {
        other.ambient_dim == self.ambient_dim && other.basis().iter().all(|p| self.contains(p))
    }

    /// Integer basis of `{u : ⟨u, v⟩ = 0 for all v in self}` in the dual lattice.
    #[must_use]
    pub fn orthogonal_complement(&self) -> Self {
        let kernel = integer_left_kernel(&self.basis.transpose());
        Self::from_matrix(&DenseMatrix::from_rows_with_cols(self.ambient_dim, kernel.to_rows()))
    }

    /// `Z^n ∩ span_Q(self)`.
    #[must_use]
    pub fn saturation(&self) -> Self {
        self.orthogonal_complement().orthogonal_complement()
    }

    /// True if the sublattice equals its saturation.
    #[must_use]
    pub fn is_saturated(&self) -> bool {
        *self == self.saturation()
    }

    /// `[saturation : self]`, the product of the invariant factors.
    #[must_use]
    pub fn index_in_saturation(&self) -> Z {
        smith_normal_form(&self.basis, false).determinant()
    }

    /// `[Z^n : self]`.
    #[must_use]
    pub fn index_in_ambient(&self) -> LatticeIndex {
        if self.rank() < self.ambient_dim {
            LatticeIndex::Infinite
        } else {
            LatticeIndex::Finite(self.index_in_saturation())
        }
    }

    /// Image under a lattice map in row convention.
    ///
    /// # Errors
    ///
    /// Fails if `m` does not have one row per ambient coordinate.
    pub fn image(&self, m: &DenseMatrix<Z>) -> Result<Self> {
        if m.num_rows() != self.ambient_dim {
            return Err(LatticeError::DimensionMismatch {
                expected: self.ambient_dim,
                found: m.num_rows(),
            });
        }
        let images = self.basis.mm(m);
        Ok(Self::from_matrix(&DenseMatrix::from_rows_with_cols(m.num_cols(), images.to_rows())))
    }

    /// `{v ∈ Z^n : v · m ∈ span_Q(target)}`.
    ///
    /// The result is always saturated.
    ///
    /// # Errors
    ///
    /// Fails if the shapes of `m` and `target` do not match.
    pub fn preimage_of_span(m: &DenseMatrix<Z>, target: &Self) -> Result<Self> {
        if m.num_cols() != target.ambient_dim {
            return Err(LatticeError::DimensionMismatch {
                expected: target.ambient_dim,
                found: m.num_cols(),
            });
        }
        let complement = target.orthogonal_complement();
        let conditions = m.mm(&complement.basis.transpose());
        let kernel = integer_left_kernel(&conditions);
        Ok(Self::from_matrix(&DenseMatrix::from_rows_with_cols(m.num_rows(), kernel.to_rows())))
    }

    /// The integer left kernel of `m`.
    #[must_use]
    pub fn kernel_of(m: &DenseMatrix<Z>) -> Self {
        let kernel = integer_left_kernel(m);
        Self::from_matrix(&DenseMatrix::from_rows_with_cols(m.num_rows(), kernel.to_rows()))
    }
}

fn check_dim(expected: usize, point: &LatticePoint) -> Result<()> {
    if point.dim() == expected {
        Ok(())
    } else {
        Err(LatticeError::DimensionMismatch {
            expected,
            found: point.dim(),
        })
    }
}

impl fmt::Display for Sublattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sublattice <")?;
        for (i, b) in self.basis().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{b}")?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coords: &[i64]) -> LatticePoint {
        LatticePoint::from_i64s(coords)
    }

    #[test]
    fn test_span_and_rank() {
        let s = Sublattice::span(3, &[p(&[1, 1, 0]), p(&[2, 2, 0]), p(&[0, 0, 1])]).unwrap();
        assert_eq!(s.rank(), 2);
        assert!(s.contains(&p(&[3, 3, -2])));
        assert!(!s.contains(&p(&[1, 0, 0])));
        assert!(Sublattice::span(2, &[p(&[1, 1, 0])]).is_err());
    }

    #[test]
    fn test_coordinates_roundtrip() {
        let s = Sublattice::span(3, &[p(&[2, 0, 1]), p(&[0, 3, 1])]).unwrap();
        let point = p(&[4, -3, 1]);
        let coords = s.coordinates(&point).unwrap();
        assert_eq!(s.point_from_coordinates(&coords), point);
        assert!(s.coordinates_of(&p(&[1, 0, 0])).is_err());
    }

    #[test]
    fn test_saturation_and_index() {
        let s = Sublattice::span(2, &[p(&[2, 0]), p(&[0, 2])]).unwrap();
        assert!(!s.is_saturated());
        assert_eq!(s.saturation(), Sublattice::full(2));
        assert_eq!(s.index_in_saturation(), Z::new(4));
        assert_eq!(s.index_in_ambient(), LatticeIndex::Finite(Z::new(4)));

        let line = Sublattice::span(2, &[p(&[2, 4])]).unwrap();
        assert_eq!(line.saturation(), Sublattice::span(2, &[p(&[1, 2])]).unwrap());
        assert_eq!(line.index_in_ambient(), LatticeIndex::Infinite);
        assert_eq!(line.index_in_saturation(), Z::new(2));
    }

    #[test]
    fn test_orthogonal_complement() {
        let s = Sublattice::span(3, &[p(&[1, 1, 0])]).unwrap();
        let perp = s.orthogonal_complement();
        assert_eq!(perp.rank(), 2);
        for u in perp.basis() {
            assert!(u.dot(&p(&[1, 1, 0])).is_zero());
        }
        assert_eq!(Sublattice::zero(2).orthogonal_complement(), Sublattice::full(2));
        assert_eq!(Sublattice::full(2).orthogonal_complement(), Sublattice::zero(2));
    }

    #[test]
    fn test_image_and_preimage() {
        // (x, y) -> (x + y, 2y)
        let m = DenseMatrix::from_rows(vec![
            vec![Z::new(1), Z::new(0)],
            vec![Z::new(1), Z::new(2)],
        ]);
        let image = Sublattice::full(2).image(&m).unwrap();
        assert_eq!(image.index_in_ambient(), LatticeIndex::Finite(Z::new(2)));

        let axis = Sublattice::span(2, &[p(&[1, 0])]).unwrap();
        let pre = Sublattice::preimage_of_span(&m, &axis).unwrap();
        assert_eq!(pre, axis);
    }

    #[test]
    fn test_kernel_of() {
        let m = DenseMatrix::from_rows(vec![vec![Z::new(1)], vec![Z::new(1)]]);
        let kernel = Sublattice::kernel_of(&m);
        assert_eq!(kernel.rank(), 1);
        assert!(kernel.contains(&p(&[1, -1])));
        assert_eq!(LatticeIndex::Infinite.to_string(), "+Infinity");
    }
}
