//! Rational polyhedral cones in an integer lattice.

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashSet;
use toric_lattice::{LatticeError, LatticePoint, LatticeQuotient, Sublattice};
use toric_linalg::DenseMatrix;
use toric_rings::{OrderedRing, Ring, Z};

use crate::double_description::double_description;
use crate::error::Result;

/// A rational polyhedral cone `σ ⊆ N_R` with `N = Z^n`.
///
/// Both descriptions are kept: the primitive generating rays, and the inner
/// facet normals together with a basis of `σ^⊥`. For a strictly convex cone
/// the rays are exactly the minimal generators, in the order they were
/// first given.
#[derive(Clone, Debug)]
pub struct Cone {
    lattice_dim: usize,
    rays: Vec<LatticePoint>,
    facet_normals: Vec<LatticePoint>,
    orthogonal: Sublattice,
    lineality: Sublattice,
}

impl Cone {
    /// The cone generated by `generators` in `Z^lattice_dim`.
    ///
    /// Zero generators are ignored and the rest are replaced by primitive
    /// vectors; redundant generators of a strictly convex cone are dropped.
    ///
    /// # Errors
    ///
    /// Fails if some generator has the wrong dimension.
    pub fn new(lattice_dim: usize, generators: impl IntoIterator<Item = LatticePoint>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        let mut gens = Vec::new();
        for g in generators {
            if g.dim() != lattice_dim {
                return Err(LatticeError::DimensionMismatch {
                    expected: lattice_dim,
                    found: g.dim(),
                }
                .into());
            }
            if g.is_zero() {
                continue;
            }
            let g = g.primitive();
            if seen.insert(g.clone()) {
                gens.push(g);
            }
        }
        Ok(Self::from_primitive(lattice_dim, gens))
    }

    /// The cone `{0}`.
    #[must_use]
    pub fn trivial(lattice_dim: usize) -> Self {
        Self::from_primitive(lattice_dim, Vec::new())
    }

    /// Builds a cone from distinct primitive non-zero generators.
    fn from_primitive(lattice_dim: usize, gens: Vec<LatticePoint>) -> Self {
        let dual = double_description(lattice_dim, &gens, &[]);
        let orthogonal = span(lattice_dim, &dual.lineality);
        let facet_normals = dual.rays;

        let primal = double_description(lattice_dim, &facet_normals, &orthogonal.basis());
        let lineality = span(lattice_dim, &primal.lineality);

        let rays = if lineality.rank() == 0 {
            let extreme: FxHashSet<&LatticePoint> = primal.rays.iter().collect();
            gens.iter().filter(|g| extreme.contains(g)).cloned().collect()
        } else {
            gens
        };

        Self {
            lattice_dim,
            rays,
            facet_normals,
            orthogonal,
            lineality,
        }
    }

    /// Builds a cone from an H-description.
    fn from_inequalities(
        lattice_dim: usize,
        inequalities: &[LatticePoint],
        equations: &[LatticePoint],
    ) -> Self {
        let dd = double_description(lattice_dim, inequalities, equations);
        let mut gens = dd.rays;
        for l in dd.lineality {
            gens.push(-&l);
            gens.push(l);
        }
        Self::from_primitive(lattice_dim, gens)
    }

    /// Dimension of the ambient lattice.
    #[must_use]
    pub fn lattice_dim(&self) -> usize {
        self.lattice_dim
    }

    /// Dimension of the linear span.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.lattice_dim - self.orthogonal.rank()
    }

    /// The generating rays.
    #[must_use]
    pub fn rays(&self) -> &[LatticePoint] {
        &self.rays
    }

    /// Number of generating rays.
    #[must_use]
    pub fn nrays(&self) -> usize {
        self.rays.len()
    }

    /// The `i`-th ray.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below the number of rays of the cone.
    #[must_use]
    pub fn ray(&self, i: usize) -> &LatticePoint {
        &self.rays[i]
    }

    /// Rays as the rows of a matrix.
    #[must_use]
    pub fn ray_matrix(&self) -> DenseMatrix<Z> {
        DenseMatrix::from_rows_with_cols(self.lattice_dim, self.rays.iter().map(LatticePoint::to_vec))
    }

    /// Inner normals of the facets, modulo `σ^⊥`.
    #[must_use]
    pub fn facet_normals(&self) -> &[LatticePoint] {
        &self.facet_normals
    }

    /// `σ^⊥` as a sublattice of the dual lattice.
    #[must_use]
    pub fn orthogonal_sublattice(&self) -> &Sublattice {
        &self.orthogonal
    }

    /// The lattice points of the largest linear subspace in the cone.
    #[must_use]
    pub fn lineality(&self) -> &Sublattice {
        &self.lineality
    }

    /// `N_σ = span(σ) ∩ N`.
    #[must_use]
    pub fn sublattice(&self) -> Sublattice {
        self.orthogonal.orthogonal_complement()
    }

    /// `N / N_σ`.
    #[must_use]
    pub fn sublattice_quotient(&self) -> LatticeQuotient {
        LatticeQuotient::new(&self.sublattice())
    }

    /// True if the cone contains no line.
    #[must_use]
    pub fn is_strictly_convex(&self) -> bool {
        self.lineality.rank() == 0
    }

    /// True for the cone `{0}`.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.rays.is_empty()
    }

    /// True if the span is the whole space.
    #[must_use]
    pub fn is_full_dimensional(&self) -> bool {
        self.dim() == self.lattice_dim
    }

    /// True if the rays are linearly independent.
    #[must_use]
    pub fn is_simplicial(&self) -> bool {
        self.is_strictly_convex() && self.nrays() == self.dim()
    }

    /// True if the rays are part of a basis of `N`.
    #[must_use]
    pub fn is_smooth(&self) -> bool {
        self.is_simplicial()
            && Sublattice::span(self.lattice_dim, &self.rays).is_ok_and(|s| s.is_saturated())
    }

    /// True if `point` lies in the cone.
    #[must_use]
    pub fn contains(&self, point: &LatticePoint) -> bool {
        point.dim() == self.lattice_dim
            && self.orthogonal.basis().iter().all(|w| w.dot(point).is_zero())
            && self.facet_normals.iter().all(|u| !u.dot(point).is_negative())
    }

    /// True if `point` lies in the relative interior of the cone.
    #[must_use]
    pub fn relative_interior_contains(&self, point: &LatticePoint) -> bool {
        self.contains(point) && self.facet_normals.iter().all(|u| u.dot(point).is_positive())
    }

    /// True if `other ⊆ self`.
    #[must_use]
    pub fn contains_cone(&self, other: &Cone) -> bool {
        other.lattice_dim == self.lattice_dim
            && other.rays.iter().all(|r| self.contains(r))
            && other
                .lineality
                .basis()
                .iter()
                .all(|l| self.contains(l) && self.contains(&-l))
    }

    /// A point of the relative interior: the sum of the rays.
    #[must_use]
    pub fn relative_interior_point(&self) -> LatticePoint {
        self.rays
            .iter()
            .fold(LatticePoint::zero(self.lattice_dim), |acc, r| &acc + r)
    }

    /// Indices of the facets that vanish on ray `i`.
    fn tight_facets(&self, ray: &LatticePoint) -> Vec<usize> {
        self.facet_normals
            .iter()
            .enumerate()
            .filter(|(_, u)| u.dot(ray).is_zero())
            .map(|(k, _)| k)
            .collect()
    }

    /// The smallest face containing the rays `indices`, as ray indices.
    fn closure(&self, indices: &[usize]) -> Vec<usize> {
        let facets: Vec<usize> = (0..self.facet_normals.len())
            .filter(|&k| {
                indices
                    .iter()
                    .all(|&i| self.facet_normals[k].dot(&self.rays[i]).is_zero())
            })
            .collect();
        (0..self.rays.len())
            .filter(|&i| {
                facets
                    .iter()
                    .all(|&k| self.facet_normals[k].dot(&self.rays[i]).is_zero())
            })
            .collect()
    }

    /// Ray index sets of all faces, ordered by number of rays.
    ///
    /// Only meaningful for strictly convex cones.
    #[must_use]
    pub fn face_ray_indices(&self) -> Vec<Vec<usize>> {
        let top: Vec<usize> = (0..self.rays.len()).collect();
        let tight: Vec<Vec<usize>> = self.rays.iter().map(|r| self.tight_facets(r)).collect();

        let mut seen: FxHashSet<Vec<usize>> = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(top.clone());
        queue.push_back(top);

        while let Some(face) = queue.pop_front() {
            for k in 0..self.facet_normals.len() {
                let cut: Vec<usize> = face
                    .iter()
                    .copied()
                    .filter(|&i| tight[i].contains(&k))
                    .collect();
                if cut.len() == face.len() {
                    continue;
                }
                let sub = self.closure(&cut);
                if seen.insert(sub.clone()) {
                    queue.push_back(sub);
                }
            }
        }

        let mut faces: Vec<Vec<usize>> = seen.into_iter().collect();
        faces.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        faces
    }

    /// All faces, ordered by number of rays.
    #[must_use]
    pub fn faces(&self) -> Vec<Cone> {
        self.face_ray_indices()
            .into_iter()
            .map(|idx| self.subcone(&idx))
            .collect()
    }

    /// The facets.
    #[must_use]
    pub fn facets(&self) -> Vec<Cone> {
        let dim = self.dim();
        self.faces()
            .into_iter()
            .filter(|f| f.dim() + 1 == dim)
            .collect()
    }

    /// The cone on a subset of the rays.
    #[must_use]
    pub fn subcone(&self, indices: &[usize]) -> Cone {
        Self::from_primitive(
            self.lattice_dim,
            indices.iter().map(|&i| self.rays[i].clone()).collect(),
        )
    }

    /// True if `self` is a face of `other`.
    #[must_use]
    pub fn is_face_of(&self, other: &Cone) -> bool {
        if self.lattice_dim != other.lattice_dim
            || !self.is_strictly_convex()
            || !other.is_strictly_convex()
        {
            return false;
        }
        let mut indices = Vec::with_capacity(self.rays.len());
        for r in &self.rays {
            match other.rays.iter().position(|s| s == r) {
                Some(i) => indices.push(i),
                None => return false,
            }
        }
        indices.sort_unstable();
        other.closure(&indices) == indices
    }

    /// `self ∩ other`.
    ///
    /// # Errors
    ///
    /// Fails if the cones live in lattices of different dimension.
    pub fn intersection(&self, other: &Cone) -> Result<Cone> {
        if other.lattice_dim != self.lattice_dim {
            return Err(LatticeError::DimensionMismatch {
                expected: self.lattice_dim,
                found: other.lattice_dim,
            }
            .into());
        }
        let mut inequalities = self.facet_normals.clone();
        inequalities.extend(other.facet_normals.iter().cloned());
        let mut equations = self.orthogonal.basis();
        equations.extend(other.orthogonal.basis());
        Ok(Self::from_inequalities(self.lattice_dim, &inequalities, &equations))
    }

    /// `self ∩ span_R(sublattice)`.
    ///
    /// # Errors
    ///
    /// Fails if the sublattice lives in another lattice.
    pub fn intersection_with_span(&self, sublattice: &Sublattice) -> Result<Cone> {
        if sublattice.ambient_dim() != self.lattice_dim {
            return Err(LatticeError::DimensionMismatch {
                expected: self.lattice_dim,
                found: sublattice.ambient_dim(),
            }
            .into());
        }
        let mut equations = self.orthogonal.basis();
        equations.extend(sublattice.orthogonal_complement().basis());
        Ok(Self::from_inequalities(self.lattice_dim, &self.facet_normals, &equations))
    }

    /// Image under a lattice map in row convention.
    ///
    /// # Errors
    ///
    /// Fails if `m` does not have one row per lattice coordinate.
    pub fn image(&self, m: &DenseMatrix<Z>) -> Result<Cone> {
        let mut images = Vec::with_capacity(self.rays.len());
        for r in self.generators() {
            images.push(r.apply(m)?);
        }
        Cone::new(m.num_cols(), images)
    }

    /// The cone rewritten in the coordinates of a sublattice containing it.
    ///
    /// # Errors
    ///
    /// Fails if some generator is not in `sublattice`.
    pub fn in_sublattice_coordinates(&self, sublattice: &Sublattice) -> Result<Cone> {
        let mut coords = Vec::with_capacity(self.rays.len());
        for r in self.generators() {
            coords.push(sublattice.coordinates_of(&r)?);
        }
        Cone::new(sublattice.rank(), coords)
    }

    /// Rays together with both directions of the lineality basis.
    fn generators(&self) -> Vec<LatticePoint> {
        let mut gens = self.rays.clone();
        for l in self.lineality.basis() {
            gens.push(-&l);
            gens.push(l);
        }
        gens
    }

    fn sorted_rays(&self) -> Vec<&LatticePoint> {
        let mut rays: Vec<&LatticePoint> = self.rays.iter().collect();
        rays.sort();
        rays
    }
}

fn span(dim: usize, points: &[LatticePoint]) -> Sublattice {
    let rows = points.iter().map(LatticePoint::to_vec);
    Sublattice::from_matrix(&DenseMatrix::from_rows_with_cols(dim, rows))
}

impl PartialEq for Cone {
    fn eq(&self, other: &Self) -> bool {
        self.lattice_dim == other.lattice_dim
            && self.lineality == other.lineality
            && self.sorted_rays() == other.sorted_rays()
    }
}

impl Eq for Cone {}

impl Hash for Cone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lattice_dim.hash(state);
        self.sorted_rays().hash(state);
    }
}

impl fmt::Display for Cone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-d cone in {}-d lattice N", self.dim(), self.lattice_dim)
    }
}
