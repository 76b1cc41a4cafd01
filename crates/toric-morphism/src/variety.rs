//! Toric varieties and their points in Cox coordinates.

use std::fmt;

use toric_geometry::{Cone, Fan, FanConfig};
use toric_lattice::{LatticePoint, LatticeQuotient, Sublattice};
use toric_poly::{Monomial, MonomialOrder, SparsePoly};
use toric_rings::{Ring, Q, Z};

use crate::error::{MorphismError, Result};
use crate::fan_morphism::is_sorted_subset;
use crate::orbit::OrbitClosure;

/// A toric variety, given by its fan and names for the Cox coordinates.
///
/// The Cox ring has one variable per ray. It is graded by the class group
/// `Z^rays / M`, where `M` is the image of `m ↦ (⟨m, u_ρ⟩)_ρ`.
#[derive(Clone, Debug)]
pub struct ToricVariety {
    fan: Fan,
    names: Vec<String>,
    relations: Sublattice,
}

/// Degree of a Cox monomial in the class group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoxDegree {
    /// Coordinates in the free part.
    pub free: LatticePoint,
    /// Residues modulo the torsion invariants.
    pub torsion: Vec<Z>,
}

impl ToricVariety {
    /// The toric variety of `fan` with coordinates `z0, z1, …`.
    #[must_use]
    pub fn new(fan: Fan) -> Self {
        let names = (0..fan.nrays()).map(|i| format!("z{i}")).collect();
        Self::from_parts(fan, names)
    }

    /// The toric variety of `fan` with the given coordinate names.
    ///
    /// # Errors
    ///
    /// Fails unless there is exactly one name per ray.
    pub fn with_names<S: Into<String>>(
        fan: Fan,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != fan.nrays() {
            return Err(MorphismError::NameCount {
                expected: fan.nrays(),
                found: names.len(),
            });
        }
        Ok(Self::from_parts(fan, names))
    }

    fn from_parts(fan: Fan, names: Vec<String>) -> Self {
        let relations = Sublattice::from_matrix(&fan.ray_matrix().transpose());
        Self {
            fan,
            names,
            relations,
        }
    }

    /// The fan.
    #[must_use]
    pub fn fan(&self) -> &Fan {
        &self.fan
    }

    /// Dimension of the variety.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.fan.lattice_dim()
    }

    /// Number of Cox coordinates.
    #[must_use]
    pub fn ngens(&self) -> usize {
        self.fan.nrays()
    }

    /// Names of the Cox coordinates.
    #[must_use]
    pub fn coordinate_names(&self) -> &[String] {
        &self.names
    }

    /// Number of affine patches, one per generating cone.
    #[must_use]
    pub fn naffine_patches(&self) -> usize {
        self.fan.ngenerating_cones()
    }

    /// True if the fan has a single generating cone.
    #[must_use]
    pub fn is_affine(&self) -> bool {
        self.naffine_patches() == 1
    }

    /// True if the fan is smooth.
    #[must_use]
    pub fn is_smooth(&self) -> bool {
        self.fan.is_smooth()
    }

    /// True if the fan is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.fan.is_complete()
    }

    /// The `i`-th Cox coordinate as a polynomial.
    #[must_use]
    pub fn coordinate(&self, i: usize) -> SparsePoly<Q> {
        SparsePoly::var(i, self.ngens(), MonomialOrder::default())
    }

    /// All Cox coordinates.
    #[must_use]
    pub fn coordinates(&self) -> Vec<SparsePoly<Q>> {
        (0..self.ngens()).map(|i| self.coordinate(i)).collect()
    }

    /// A constant in the Cox ring.
    #[must_use]
    pub fn constant(&self, c: Q) -> SparsePoly<Q> {
        SparsePoly::constant(c, self.ngens(), MonomialOrder::default())
    }

    /// The class group `Z^rays / M`.
    #[must_use]
    pub fn class_group(&self) -> LatticeQuotient {
        LatticeQuotient::new(&self.relations)
    }

    /// The class of a Cox monomial.
    ///
    /// # Errors
    ///
    /// Fails if the monomial has the wrong number of variables.
    pub fn degree(&self, monomial: &Monomial) -> Result<CoxDegree> {
        let exponents = exponent_vector(monomial);
        let class_group = self.class_group();
        Ok(CoxDegree {
            free: class_group.project(&exponents)?,
            torsion: class_group.torsion_coordinates(&exponents)?,
        })
    }

    /// True if two Cox monomials have the same class.
    #[must_use]
    pub fn same_degree(&self, a: &Monomial, b: &Monomial) -> bool {
        a.num_vars() == self.ngens()
            && b.num_vars() == self.ngens()
            && self
                .relations
                .contains(&(&exponent_vector(a) - &exponent_vector(b)))
    }

    /// True if every term of `poly` has the same class.
    #[must_use]
    pub fn is_homogeneous(&self, poly: &SparsePoly<Q>) -> bool {
        if poly.num_vars() != self.ngens() {
            return false;
        }
        let mut terms = poly.terms().iter().map(|(m, _)| m);
        let Some(first) = terms.next() else {
            return true;
        };
        terms.all(|m| self.same_degree(first, m))
    }

    /// A point with the given homogeneous coordinates.
    ///
    /// # Errors
    ///
    /// Fails on a wrong coordinate count or a point of the exceptional set.
    pub fn point(&self, coords: Vec<Q>) -> Result<ToricPoint> {
        if coords.len() != self.ngens() {
            return Err(MorphismError::CoordinateCount {
                expected: self.ngens(),
                found: coords.len(),
            });
        }
        let point = ToricPoint { coords };
        let zeros: Vec<usize> = point
            .coords
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_zero())
            .map(|(i, _)| i)
            .collect();
        let covered = self
            .fan
            .generating_cones()
            .iter()
            .any(|g| is_sorted_subset(&zeros, g.ambient_ray_indices()));
        if covered {
            Ok(point)
        } else {
            Err(MorphismError::ExceptionalPoint {
                point: point.to_string(),
            })
        }
    }

    /// Like [`ToricVariety::point`], from integers.
    ///
    /// # Errors
    ///
    /// Same as [`ToricVariety::point`].
    pub fn point_from_i64s(&self, coords: &[i64]) -> Result<ToricPoint> {
        self.point(coords.iter().map(|&c| Q::from(c)).collect())
    }

    /// The closure of the torus orbit of `cone`.
    ///
    /// # Errors
    ///
    /// Fails if `cone` is not a cone of the fan.
    pub fn orbit_closure(&self, cone: &Cone) -> Result<OrbitClosure> {
        OrbitClosure::new(self, cone, &FanConfig::default())
    }
}

fn exponent_vector(monomial: &Monomial) -> LatticePoint {
    LatticePoint::new(monomial.exponents().iter().map(|&e| Z::from(e)))
}

impl PartialEq for ToricVariety {
    fn eq(&self, other: &Self) -> bool {
        self.fan == other.fan && self.names == other.names
    }
}

impl Eq for ToricVariety {}

impl fmt::Display for ToricVariety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_affine() {
            write!(f, "{}-d affine toric variety", self.dimension())
        } else {
            write!(
                f,
                "{}-d toric variety covered by {} affine patches",
                self.dimension(),
                self.naffine_patches()
            )
        }
    }
}

/// A point of a toric variety in homogeneous coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToricPoint {
    coords: Vec<Q>,
}

impl ToricPoint {
    /// The homogeneous coordinates.
    #[must_use]
    pub fn coords(&self) -> &[Q] {
        &self.coords
    }
}

impl fmt::Display for ToricPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.coords.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", entries.join(" : "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fan(dim: usize, rays: &[&[i64]], cones: &[&[usize]]) -> Fan {
        Fan::new(
            rays.iter().map(|r| LatticePoint::from_i64s(r)).collect(),
            cones.iter().map(|c| c.to_vec()).collect(),
            dim,
            &FanConfig::default(),
        )
        .unwrap()
    }

    fn p2() -> ToricVariety {
        ToricVariety::with_names(
            fan(2, &[&[1, 0], &[0, 1], &[-1, -1]], &[&[0, 1], &[1, 2], &[0, 2]]),
            ["x", "y", "z"],
        )
        .unwrap()
    }

    #[test]
    fn test_basic_properties() {
        let x = p2();
        assert_eq!(x.dimension(), 2);
        assert_eq!(x.naffine_patches(), 3);
        assert!(x.is_smooth());
        assert!(x.is_complete());
        assert!(!x.is_affine());
        assert_eq!(x.to_string(), "2-d toric variety covered by 3 affine patches");

        let a1 = ToricVariety::new(fan(1, &[&[1]], &[&[0]]));
        assert_eq!(a1.to_string(), "1-d affine toric variety");
        assert_eq!(a1.coordinate_names(), &["z0".to_string()]);

        assert!(matches!(
            ToricVariety::with_names(fan(1, &[&[1]], &[&[0]]), ["a", "b"]),
            Err(MorphismError::NameCount { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_grading_of_projective_plane() {
        let x = p2();
        assert_eq!(x.class_group().free_rank(), 1);
        assert!(x.class_group().is_torsion_free());

        let xy = Monomial::from_exponents(&[1, 1, 0]);
        let z2 = Monomial::from_exponents(&[0, 0, 2]);
        let z = Monomial::from_exponents(&[0, 0, 1]);
        assert!(x.same_degree(&xy, &z2));
        assert!(!x.same_degree(&xy, &z));
        assert_eq!(x.degree(&xy).unwrap(), x.degree(&z2).unwrap());

        let [a, b, c] = [x.coordinate(0), x.coordinate(1), x.coordinate(2)];
        assert!(x.is_homogeneous(&a.mul(&b).add(&c.mul(&c))));
        assert!(!x.is_homogeneous(&a.add(&b.mul(&c))));
    }

    #[test]
    fn test_weighted_grading() {
        // Rays (1,0), (0,1), (-1,-2) give weights 1, 2, 1.
        let x = ToricVariety::new(fan(
            2,
            &[&[1, 0], &[0, 1], &[-1, -2]],
            &[&[0, 1], &[1, 2], &[0, 2]],
        ));
        let xz = Monomial::from_exponents(&[1, 0, 1]);
        let y = Monomial::from_exponents(&[0, 1, 0]);
        let x1 = Monomial::from_exponents(&[1, 0, 0]);
        assert!(x.same_degree(&xz, &y));
        assert!(!x.same_degree(&x1, &y));
        assert!(!x.is_smooth());
    }

    #[test]
    fn test_points() {
        let x = p2();
        let point = x.point_from_i64s(&[1, 0, 2]).unwrap();
        assert_eq!(point.to_string(), "[1 : 0 : 2]");
        assert!(x.point_from_i64s(&[0, 0, 1]).is_ok());
        assert!(matches!(
            x.point_from_i64s(&[0, 0, 0]),
            Err(MorphismError::ExceptionalPoint { .. })
        ));
        assert!(matches!(
            x.point_from_i64s(&[1, 2]),
            Err(MorphismError::CoordinateCount { expected: 3, found: 2 })
        ));
    }
}
