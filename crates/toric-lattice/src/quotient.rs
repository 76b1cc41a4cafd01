//! Quotients `Z^n / S` of a lattice by a sublattice.

use toric_linalg::{smith_normal_form, DenseMatrix};
use toric_rings::{EuclideanDomain, Ring, Z};

use crate::error::{LatticeError, Result};
use crate::point::LatticePoint;
use crate::sublattice::Sublattice;

/// The quotient of `Z^n` by a sublattice, in Smith coordinates.
///
/// If `U · B · V = D` is the Smith form of the sublattice basis `B`, a
/// point `v` has quotient coordinates `v · V`: the first `rank` of them are
/// read modulo the invariant factors and the rest are free.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatticeQuotient {
    sublattice: Sublattice,
    /// Columns of `V` for the free part: `n × free_rank`.
    projection: DenseMatrix<Z>,
    /// Columns of `V` for the non-trivial torsion part.
    torsion_projection: DenseMatrix<Z>,
    torsion: Vec<Z>,
}

impl LatticeQuotient {
    /// Builds `Z^n / sublattice`.
    #[must_use]
    pub fn new(sublattice: &Sublattice) -> Self {
        let n = sublattice.ambient_dim();
        let snf = smith_normal_form(sublattice.basis_matrix(), true);
        let v = snf
            .right_transform
            .clone()
            .unwrap_or_else(|| DenseMatrix::identity(n));

        let rank = snf.rank;
        let free_cols: Vec<usize> = (rank..n).collect();
        let torsion_cols: Vec<usize> = (0..rank)
            .filter(|&i| !snf.invariant_factors[i].is_one())
            .collect();

        Self {
            sublattice: sublattice.clone(),
            projection: v.select_cols(&free_cols),
            torsion_projection: v.select_cols(&torsion_cols),
            torsion: torsion_cols
                .iter()
                .map(|&i| snf.invariant_factors[i].clone())
                .collect(),
        }
    }

    /// The quotient of `Z^n` by the zero sublattice.
    #[must_use]
    pub fn trivial(n: usize) -> Self {
        Self::new(&Sublattice::zero(n))
    }

    /// The sublattice divided out.
    #[must_use]
    pub fn sublattice(&self) -> &Sublattice {
        &self.sublattice
    }

    /// Dimension of the ambient lattice.
    #[must_use]
    pub fn ambient_dim(&self) -> usize {
        self.sublattice.ambient_dim()
    }

    /// Rank of the free part.
    #[must_use]
    pub fn free_rank(&self) -> usize {
        self.projection.num_cols()
    }

    /// Invariant factors of the torsion part, each greater than one.
    #[must_use]
    pub fn torsion_invariants(&self) -> &[Z] {
        &self.torsion
    }

    /// True if the divided sublattice is saturated.
    #[must_use]
    pub fn is_torsion_free(&self) -> bool {
        self.torsion.is_empty()
    }

    /// The `n × free_rank` matrix of the projection onto the free part.
    #[must_use]
    pub fn projection_matrix(&self) -> &DenseMatrix<Z> {
        &self.projection
    }

    /// Free coordinates of the class of `point`.
    ///
    /// # Errors
    ///
    /// Fails if `point` has the wrong dimension.
    pub fn project(&self, point: &LatticePoint) -> Result<LatticePoint> {
        point.apply(&self.projection)
    }

    /// Torsion coordinates of the class of `point`, reduced.
    ///
    /// # Errors
    ///
    /// Fails if `point` has the wrong dimension.
    pub fn torsion_coordinates(&self, point: &LatticePoint) -> Result<Vec<Z>> {
        let raw = point.apply(&self.torsion_projection)?;
        Ok(raw
            .coords()
            .iter()
            .zip(&self.torsion)
            .map(|(c, d)| c.rem(d))
            .collect())
    }

    /// True if `point` maps to the zero class.
    ///
    /// # Errors
    ///
    /// Fails if `point` has the wrong dimension.
    pub fn is_zero_class(&self, point: &LatticePoint) -> Result<bool> {
        if point.dim() != self.ambient_dim() {
            return Err(LatticeError::DimensionMismatch {
                expected: self.ambient_dim(),
                found: point.dim(),
            });
        }
        Ok(self.sublattice.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coords: &[i64]) -> LatticePoint {
        LatticePoint::from_i64s(coords)
    }

    #[test]
    fn test_quotient_by_line() {
        let line = Sublattice::span(3, &[p(&[1, 1, 0])]).unwrap();
        let q = LatticeQuotient::new(&line);
        assert_eq!(q.free_rank(), 2);
        assert!(q.is_torsion_free());

        let image = q.project(&p(&[1, 1, 0])).unwrap();
        assert!(image.is_zero());
        let a = q.project(&p(&[1, 0, 0])).unwrap();
        let b = q.project(&p(&[0, 1, 0])).unwrap();
        assert_eq!(a, -b);
        assert!(!q.project(&p(&[0, 0, 1])).unwrap().is_zero());
    }

    #[test]
    fn test_quotient_by_unimodular_plane() {
        let s = Sublattice::span(3, &[p(&[2, 2, -9]), p(&[0, 3, -14])]).unwrap();
        let q = LatticeQuotient::new(&s);
        assert_eq!(q.free_rank(), 1);
        assert!(q.is_torsion_free());
        assert!(q.is_zero_class(&p(&[2, 2, -9])).unwrap());
        assert!(q.project(&p(&[0, 3, -14])).unwrap().is_zero());
        assert!(!q.project(&p(&[1, 0, 0])).unwrap().is_zero());
    }

    #[test]
    fn test_quotient_with_torsion() {
        let s = Sublattice::span(2, &[p(&[2, 0])]).unwrap();
        let q = LatticeQuotient::new(&s);
        assert_eq!(q.free_rank(), 1);
        assert_eq!(q.torsion_invariants(), &[Z::new(2)]);
        assert_eq!(q.torsion_coordinates(&p(&[2, 0])).unwrap(), vec![Z::new(0)]);
        assert_eq!(q.torsion_coordinates(&p(&[1, 0])).unwrap(), vec![Z::new(1)]);
        assert!(q.is_zero_class(&p(&[4, 0])).unwrap());
        assert!(!q.is_zero_class(&p(&[1, 0])).unwrap());
    }

    #[test]
    fn test_trivial_and_full_quotients() {
        let q = LatticeQuotient::trivial(2);
        assert_eq!(q.free_rank(), 2);

        let q = LatticeQuotient::new(&Sublattice::full(2));
        assert_eq!(q.free_rank(), 0);
        assert_eq!(q.project(&p(&[3, 4])).unwrap(), LatticePoint::zero(0));
    }
}
