//! Rational polyhedral fans.
//!
//! A fan is stored as its list of primitive rays plus the generating cones
//! as sorted ray-index sets. Every cone of the fan is materialized once at
//! construction, grouped by dimension, and indexed by its ray set.

use std::fmt;
use std::ops::Deref;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use toric_lattice::{LatticeError, LatticePoint};
use toric_linalg::DenseMatrix;
use toric_rings::Z;
use tracing::debug;

use crate::config::FanConfig;
use crate::cone::Cone;
use crate::error::{GeometryError, Result};

/// A cone of a fan, remembering which fan rays generate it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FanCone {
    cone: Cone,
    ambient_ray_indices: Vec<usize>,
}

impl FanCone {
    /// The underlying cone.
    #[must_use]
    pub fn cone(&self) -> &Cone {
        &self.cone
    }

    /// Sorted indices of the fan rays generating this cone.
    #[must_use]
    pub fn ambient_ray_indices(&self) -> &[usize] {
        &self.ambient_ray_indices
    }

    /// True if every ray of `self` is a ray of `other`.
    ///
    /// Within one fan this is the face relation.
    #[must_use]
    pub fn is_face_of(&self, other: &FanCone) -> bool {
        is_sorted_subset(&self.ambient_ray_indices, &other.ambient_ray_indices)
    }
}

impl Deref for FanCone {
    type Target = Cone;

    fn deref(&self) -> &Cone {
        &self.cone
    }
}

impl fmt::Display for FanCone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-d cone of Rational polyhedral fan in {}-d lattice N",
            self.cone.dim(),
            self.cone.lattice_dim()
        )
    }
}

/// A rational polyhedral fan in `Z^n`.
#[derive(Clone, Debug)]
pub struct Fan {
    lattice_dim: usize,
    rays: Vec<LatticePoint>,
    ray_lookup: FxHashMap<LatticePoint, usize>,
    generating: Vec<Vec<usize>>,
    /// `cones[d]` holds the `d`-dimensional cones.
    cones: Vec<Vec<FanCone>>,
    cone_lookup: FxHashMap<Vec<usize>, (usize, usize)>,
}

impl Fan {
    /// Builds a fan from rays and generating cones given as ray-index sets.
    ///
    /// Rays are replaced by primitive vectors. Generating cones that are
    /// faces of other generating cones are discarded. An empty cone list
    /// gives the fan consisting of the origin only.
    ///
    /// # Errors
    ///
    /// Fails on zero or repeated rays, out-of-range indices, unused rays,
    /// generating cones that are not strictly convex or not given by
    /// minimal generators, and (when `config.check` is set) on pairs of
    /// generating cones that do not meet along a common face.
    pub fn new(
        rays: Vec<LatticePoint>,
        cones: Vec<Vec<usize>>,
        lattice_dim: usize,
        config: &FanConfig,
    ) -> Result<Self> {
        let (rays, ray_lookup) = normalize_rays(rays, lattice_dim)?;
        let index_sets = normalize_index_sets(cones, rays.len())?;

        let used: FxHashSet<usize> = index_sets.iter().flatten().copied().collect();
        let unused: Vec<usize> = (0..rays.len()).filter(|i| !used.contains(i)).collect();
        if !unused.is_empty() {
            return Err(GeometryError::UnusedRays { indices: unused });
        }

        let mut candidates = Vec::with_capacity(index_sets.len());
        for indices in index_sets {
            let cone = Cone::new(lattice_dim, indices.iter().map(|&i| rays[i].clone()))?;
            if !cone.is_strictly_convex() {
                return Err(GeometryError::NotStrictlyConvex { indices });
            }
            if cone.nrays() != indices.len() {
                return Err(GeometryError::NonMinimalGenerators { indices });
            }
            candidates.push(FanCone {
                cone,
                ambient_ray_indices: indices,
            });
        }

        let generating = discard_faces(candidates);
        if config.check {
            check_compatibility(&generating, config.parallel_threshold)?;
        }

        let cones = all_cones(&generating, lattice_dim);
        let mut cone_lookup = FxHashMap::default();
        for (d, layer) in cones.iter().enumerate() {
            for (pos, c) in layer.iter().enumerate() {
                cone_lookup.insert(c.ambient_ray_indices.clone(), (d, pos));
            }
        }

        debug!(
            lattice_dim,
            rays = rays.len(),
            generating = generating.len(),
            cones = cone_lookup.len(),
            "fan constructed"
        );

        Ok(Self {
            lattice_dim,
            rays,
            ray_lookup,
            generating: generating.into_iter().map(|c| c.ambient_ray_indices).collect(),
            cones,
            cone_lookup,
        })
    }

    /// Builds a fan from a list of cones.
    ///
    /// Rays are collected in order of first appearance.
    ///
    /// # Errors
    ///
    /// Same as [`Fan::new`]; cones from another lattice are rejected too.
    pub fn from_cones<'a>(
        cones: impl IntoIterator<Item = &'a Cone>,
        lattice_dim: usize,
        config: &FanConfig,
    ) -> Result<Self> {
        let mut rays: Vec<LatticePoint> = Vec::new();
        let mut positions: FxHashMap<LatticePoint, usize> = FxHashMap::default();
        let mut index_sets = Vec::new();

        for cone in cones {
            if cone.lattice_dim() != lattice_dim {
                return Err(LatticeError::DimensionMismatch {
                    expected: lattice_dim,
                    found: cone.lattice_dim(),
                }
                .into());
            }
            if !cone.is_strictly_convex() {
                return Err(GeometryError::NotStrictlyConvex { indices: Vec::new() });
            }
            let mut indices = Vec::with_capacity(cone.nrays());
            for r in cone.rays() {
                let next = rays.len();
                let i = *positions.entry(r.clone()).or_insert(next);
                if i == next {
                    rays.push(r.clone());
                }
                indices.push(i);
            }
            index_sets.push(indices);
        }

        Self::new(rays, index_sets, lattice_dim, config)
    }

    /// The fan whose only cone is the origin.
    #[must_use]
    pub fn trivial(lattice_dim: usize) -> Self {
        let origin = FanCone {
            cone: Cone::trivial(lattice_dim),
            ambient_ray_indices: Vec::new(),
        };
        let mut cones = vec![Vec::new(); lattice_dim + 1];
        cones[0].push(origin);
        let mut cone_lookup = FxHashMap::default();
        cone_lookup.insert(Vec::new(), (0, 0));
        Self {
            lattice_dim,
            rays: Vec::new(),
            ray_lookup: FxHashMap::default(),
            generating: vec![Vec::new()],
            cones,
            cone_lookup,
        }
    }

    /// Dimension of the ambient lattice.
    #[must_use]
    pub fn lattice_dim(&self) -> usize {
        self.lattice_dim
    }

    /// Largest dimension of a cone.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.cones.iter().rposition(|layer| !layer.is_empty()).unwrap_or(0)
    }

    /// The primitive rays.
    #[must_use]
    pub fn rays(&self) -> &[LatticePoint] {
        &self.rays
    }

    /// Number of rays.
    #[must_use]
    pub fn nrays(&self) -> usize {
        self.rays.len()
    }

    /// The `i`-th ray.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not below the number of rays of the fan.
    #[must_use]
    pub fn ray(&self, i: usize) -> &LatticePoint {
        &self.rays[i]
    }

    /// Index of a primitive ray, if it is a ray of the fan.
    #[must_use]
    pub fn ray_index(&self, ray: &LatticePoint) -> Option<usize> {
        self.ray_lookup.get(ray).copied()
    }

    /// Rays as the rows of a matrix.
    #[must_use]
    pub fn ray_matrix(&self) -> DenseMatrix<Z> {
        DenseMatrix::from_rows_with_cols(self.lattice_dim, self.rays.iter().map(LatticePoint::to_vec))
    }

    /// The maximal cones.
    #[must_use]
    pub fn generating_cones(&self) -> Vec<&FanCone> {
        self.generating
            .iter()
            .filter_map(|idx| self.cone_by_indices(idx))
            .collect()
    }

    /// Number of maximal cones.
    #[must_use]
    pub fn ngenerating_cones(&self) -> usize {
        self.generating.len()
    }

    /// The cones of dimension `dim`.
    #[must_use]
    pub fn cones_of_dim(&self, dim: usize) -> &[FanCone] {
        self.cones.get(dim).map_or(&[], Vec::as_slice)
    }

    /// All cones, by increasing dimension.
    pub fn cones(&self) -> impl Iterator<Item = &FanCone> + '_ {
        self.cones.iter().flatten()
    }

    /// Total number of cones, the origin included.
    #[must_use]
    pub fn ncones(&self) -> usize {
        self.cone_lookup.len()
    }

    /// The cone generated by the given rays, if it is a cone of the fan.
    #[must_use]
    pub fn cone_by_indices(&self, indices: &[usize]) -> Option<&FanCone> {
        let mut key = indices.to_vec();
        key.sort_unstable();
        key.dedup();
        let &(d, pos) = self.cone_lookup.get(&key)?;
        Some(&self.cones[d][pos])
    }

    /// Finds `cone` among the cones of the fan.
    #[must_use]
    pub fn embed(&self, cone: &Cone) -> Option<&FanCone> {
        if cone.lattice_dim() != self.lattice_dim || !cone.is_strictly_convex() {
            return None;
        }
        let indices: Option<Vec<usize>> = cone.rays().iter().map(|r| self.ray_index(r)).collect();
        self.cone_by_indices(&indices?)
    }

    /// Like [`Fan::embed`], failing for cones outside the fan.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ConeNotInFan`].
    pub fn try_embed(&self, cone: &Cone) -> Result<&FanCone> {
        self.embed(cone).ok_or_else(|| GeometryError::ConeNotInFan {
            cone: cone.to_string(),
        })
    }

    /// True if `cone` is a cone of the fan.
    #[must_use]
    pub fn contains(&self, cone: &Cone) -> bool {
        self.embed(cone).is_some()
    }

    /// The cone whose relative interior contains `point`, if any.
    #[must_use]
    pub fn smallest_cone_containing(&self, point: &LatticePoint) -> Option<&FanCone> {
        self.cones().find(|c| c.cone().contains(point))
    }

    /// The smallest cone of the fan containing `cone`, if any.
    #[must_use]
    pub fn smallest_cone_containing_cone(&self, cone: &Cone) -> Option<&FanCone> {
        let candidate = self.smallest_cone_containing(&cone.relative_interior_point())?;
        candidate.cone().contains_cone(cone).then_some(candidate)
    }

    /// Maximal cones having `cone` as a face.
    #[must_use]
    pub fn star_generators(&self, cone: &FanCone) -> Vec<&FanCone> {
        self.generating_cones()
            .into_iter()
            .filter(|g| cone.is_face_of(g))
            .collect()
    }

    /// True if the support is the whole space.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let n = self.lattice_dim;
        if n == 0 {
            return true;
        }
        if self.generating_cones().iter().any(|g| g.dim() != n) {
            return false;
        }
        self.cones_of_dim(n - 1)
            .iter()
            .all(|wall| self.star_generators(wall).len() == 2)
    }

    /// True if every cone is smooth.
    #[must_use]
    pub fn is_smooth(&self) -> bool {
        self.generating_cones().iter().all(|g| g.is_smooth())
    }

    /// True if every cone is simplicial.
    #[must_use]
    pub fn is_simplicial(&self) -> bool {
        self.generating_cones().iter().all(|g| g.is_simplicial())
    }

    fn sorted_generating(&self) -> Vec<&Vec<usize>> {
        let mut gens: Vec<&Vec<usize>> = self.generating.iter().collect();
        gens.sort();
        gens
    }
}

fn normalize_rays(
    rays: Vec<LatticePoint>,
    lattice_dim: usize,
) -> Result<(Vec<LatticePoint>, FxHashMap<LatticePoint, usize>)> {
    let mut lookup = FxHashMap::default();
    let mut normalized = Vec::with_capacity(rays.len());
    for (index, r) in rays.into_iter().enumerate() {
        if r.dim() != lattice_dim {
            return Err(LatticeError::DimensionMismatch {
                expected: lattice_dim,
                found: r.dim(),
            }
            .into());
        }
        if r.is_zero() {
            return Err(GeometryError::ZeroRay { index });
        }
        let r = r.primitive();
        if let Some(&first) = lookup.get(&r) {
            return Err(GeometryError::DuplicateRay {
                first,
                second: index,
            });
        }
        lookup.insert(r.clone(), index);
        normalized.push(r);
    }
    Ok((normalized, lookup))
}

fn normalize_index_sets(cones: Vec<Vec<usize>>, nrays: usize) -> Result<Vec<Vec<usize>>> {
    if cones.is_empty() {
        return Ok(vec![Vec::new()]);
    }
    let mut seen = FxHashSet::default();
    let mut sets = Vec::with_capacity(cones.len());
    for mut indices in cones {
        if let Some(&index) = indices.iter().find(|&&i| i >= nrays) {
            return Err(GeometryError::RayIndexOutOfRange { index, nrays });
        }
        indices.sort_unstable();
        indices.dedup();
        if seen.insert(indices.clone()) {
            sets.push(indices);
        }
    }
    Ok(sets)
}

/// Drops generating cones that are faces of other generating cones.
fn discard_faces(candidates: Vec<FanCone>) -> Vec<FanCone> {
    let total = candidates.len();
    let keep: Vec<bool> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            !candidates.iter().enumerate().any(|(j, d)| {
                i != j
                    && c.ambient_ray_indices.len() < d.ambient_ray_indices.len()
                    && c.is_face_of(d)
                    && c.cone.is_face_of(&d.cone)
            })
        })
        .collect();
    let kept: Vec<FanCone> = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect();
    if kept.len() < total {
        debug!(discarded = total - kept.len(), "dropped generating cones that are faces");
    }
    kept
}

/// Every pair of generating cones must meet along a face of both.
fn check_compatibility(generating: &[FanCone], parallel_threshold: usize) -> Result<()> {
    let pairs: Vec<(usize, usize)> = (0..generating.len())
        .flat_map(|i| (i + 1..generating.len()).map(move |j| (i, j)))
        .collect();

    let compatible = |&(i, j): &(usize, usize)| -> bool {
        let (a, b) = (&generating[i].cone, &generating[j].cone);
        a.intersection(b)
            .is_ok_and(|common| common.is_face_of(a) && common.is_face_of(b))
    };

    let bad = if pairs.len() >= parallel_threshold {
        debug!(pairs = pairs.len(), "checking fan compatibility in parallel");
        pairs.par_iter().find_any(|pair| !compatible(pair)).copied()
    } else {
        pairs.iter().find(|pair| !compatible(pair)).copied()
    };

    match bad {
        Some((i, j)) => Err(GeometryError::NotAFan {
            first: generating[i].ambient_ray_indices.clone(),
            second: generating[j].ambient_ray_indices.clone(),
        }),
        None => Ok(()),
    }
}

/// All faces of the generating cones, grouped by dimension.
fn all_cones(generating: &[FanCone], lattice_dim: usize) -> Vec<Vec<FanCone>> {
    let mut seen: FxHashSet<Vec<usize>> = FxHashSet::default();
    let mut cones: Vec<Vec<FanCone>> = vec![Vec::new(); lattice_dim + 1];

    for g in generating {
        for local in g.cone.face_ray_indices() {
            let ambient: Vec<usize> = local.iter().map(|&i| g.ambient_ray_indices[i]).collect();
            if !seen.insert(ambient.clone()) {
                continue;
            }
            let cone = g.cone.subcone(&local);
            cones[cone.dim()].push(FanCone {
                cone,
                ambient_ray_indices: ambient,
            });
        }
    }

    for layer in &mut cones {
        layer.sort_by(|a, b| a.ambient_ray_indices.cmp(&b.ambient_ray_indices));
    }
    cones
}

fn is_sorted_subset(small: &[usize], large: &[usize]) -> bool {
    let mut it = large.iter();
    small.iter().all(|x| it.any(|y| y == x))
}

impl PartialEq for Fan {
    fn eq(&self, other: &Self) -> bool {
        self.lattice_dim == other.lattice_dim
            && self.rays == other.rays
            && self.sorted_generating() == other.sorted_generating()
    }
}

impl Eq for Fan {}

impl fmt::Display for Fan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational polyhedral fan in {}-d lattice N", self.lattice_dim)
    }
}
