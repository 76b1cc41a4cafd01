//! Morphisms of fans.
//!
//! A fan morphism is a lattice map `φ: N₁ → N₂`, written in row convention
//! `φ(v) = v·M`, that sends every cone of the domain fan into some cone of
//! the codomain fan. The smallest such codomain cone is the image cone; the
//! whole table of image cones is computed once at construction.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use toric_geometry::{Cone, Fan, FanCone, FanConfig};
use toric_lattice::{LatticeIndex, LatticePoint, Sublattice};
use toric_linalg::DenseMatrix;
use toric_rings::{Ring, Z};
use tracing::debug;

use crate::config::MorphismConfig;
use crate::error::{MorphismError, Result};

/// A lattice map compatible with a domain and a codomain fan.
#[derive(Clone, Debug)]
pub struct FanMorphism {
    matrix: DenseMatrix<Z>,
    domain: Fan,
    codomain: Fan,
    /// Domain cone ray indices to image cone ray indices.
    image_cones: FxHashMap<Vec<usize>, Vec<usize>>,
}

impl FanMorphism {
    /// The fan morphism `Σ₁ → Σ₂` given by `matrix`.
    ///
    /// # Errors
    ///
    /// Fails if `matrix` is not `dim N₁ × dim N₂`, or (when checking) if
    /// some domain cone is not mapped into a codomain cone.
    pub fn new(
        matrix: DenseMatrix<Z>,
        domain: Fan,
        codomain: Fan,
        config: &MorphismConfig,
    ) -> Result<Self> {
        check_shape(&matrix, domain.lattice_dim(), codomain.lattice_dim())?;

        let mut image_cones = FxHashMap::default();
        for cone in domain.cones() {
            let indices = cone.ambient_ray_indices();
            match find_image_cone(&matrix, &codomain, cone)? {
                Some(target) => {
                    image_cones.insert(indices.to_vec(), target);
                }
                None if config.check => {
                    return Err(MorphismError::IncompatibleFans {
                        indices: indices.to_vec(),
                    });
                }
                None => debug!(?indices, "domain cone has no image cone"),
            }
        }

        debug!(
            domain_cones = domain.ncones(),
            codomain_cones = codomain.ncones(),
            "fan morphism constructed"
        );

        Ok(Self {
            matrix,
            domain,
            codomain,
            image_cones,
        })
    }

    /// The fan morphism whose codomain fan is spanned by the images of the
    /// generating cones of `domain` in `Z^codomain_dim`.
    ///
    /// # Errors
    ///
    /// Fails on a shape mismatch or when the image cones do not form a fan.
    pub fn with_codomain_lattice(
        matrix: DenseMatrix<Z>,
        domain: Fan,
        codomain_dim: usize,
        config: &MorphismConfig,
    ) -> Result<Self> {
        check_shape(&matrix, domain.lattice_dim(), codomain_dim)?;
        let mut images = Vec::with_capacity(domain.ngenerating_cones());
        for cone in domain.generating_cones() {
            images.push(cone.cone().image(&matrix)?);
        }
        let codomain = Fan::from_cones(&images, codomain_dim, &config.fan)?;
        Self::new(matrix, domain, codomain, config)
    }

    /// The identity of a fan.
    #[must_use]
    pub fn identity(fan: &Fan) -> Self {
        let image_cones = fan
            .cones()
            .map(|c| {
                let indices = c.ambient_ray_indices().to_vec();
                (indices.clone(), indices)
            })
            .collect();
        Self {
            matrix: DenseMatrix::identity(fan.lattice_dim()),
            domain: fan.clone(),
            codomain: fan.clone(),
            image_cones,
        }
    }

    /// The defining matrix, `dim N₁ × dim N₂`.
    #[must_use]
    pub fn matrix(&self) -> &DenseMatrix<Z> {
        &self.matrix
    }

    /// The domain fan.
    #[must_use]
    pub fn domain_fan(&self) -> &Fan {
        &self.domain
    }

    /// The codomain fan.
    #[must_use]
    pub fn codomain_fan(&self) -> &Fan {
        &self.codomain
    }

    /// `φ(v) = v·M`.
    ///
    /// # Errors
    ///
    /// Fails if `v` is not a point of the domain lattice.
    pub fn apply(&self, v: &LatticePoint) -> Result<LatticePoint> {
        Ok(v.apply(&self.matrix)?)
    }

    fn image_indices(&self, cone: &FanCone) -> Option<&[usize]> {
        self.image_cones
            .get(cone.ambient_ray_indices())
            .map(Vec::as_slice)
    }

    /// The smallest codomain cone containing the image of `cone`.
    ///
    /// # Errors
    ///
    /// Fails if `cone` is not a cone of the domain fan or its image lies in
    /// no codomain cone.
    pub fn image_cone(&self, cone: &Cone) -> Result<&FanCone> {
        let source = self.domain.try_embed(cone)?;
        self.image_indices(source)
            .and_then(|indices| self.codomain.cone_by_indices(indices))
            .ok_or_else(|| MorphismError::IncompatibleFans {
                indices: source.ambient_ray_indices().to_vec(),
            })
    }

    /// Domain cones whose image lies in `cone`.
    ///
    /// # Errors
    ///
    /// Fails if `cone` is not a cone of the codomain fan.
    pub fn preimage_cones(&self, cone: &Cone) -> Result<Vec<&FanCone>> {
        let target = self.codomain.try_embed(cone)?;
        Ok(self
            .domain
            .cones()
            .filter(|c| {
                self.image_indices(c)
                    .is_some_and(|img| is_sorted_subset(img, target.ambient_ray_indices()))
            })
            .collect())
    }

    /// Minimal domain cones whose image cone is exactly `cone`.
    ///
    /// # Errors
    ///
    /// Fails if `cone` is not a cone of the codomain fan.
    pub fn primitive_preimage_cones(&self, cone: &Cone) -> Result<Vec<&FanCone>> {
        let target = self.codomain.try_embed(cone)?;
        let key = Some(target.ambient_ray_indices());
        let hits: Vec<&FanCone> = self
            .domain
            .cones()
            .filter(|c| self.image_indices(c) == key)
            .collect();
        Ok(hits
            .iter()
            .filter(|c| !hits.iter().any(|d| d.nrays() < c.nrays() && d.is_face_of(c)))
            .copied()
            .collect())
    }

    /// Maximal domain cones containing `cone` with the same image cone.
    ///
    /// # Errors
    ///
    /// Fails if `cone` is not a cone of the domain fan.
    pub fn relative_star_generators(&self, cone: &Cone) -> Result<Vec<&FanCone>> {
        let source = self.domain.try_embed(cone)?;
        let key = self.image_indices(source);
        let star: Vec<&FanCone> = self
            .domain
            .cones()
            .filter(|c| source.is_face_of(c) && self.image_indices(c) == key)
            .collect();
        Ok(star
            .iter()
            .filter(|c| !star.iter().any(|d| d.nrays() > c.nrays() && c.is_face_of(d)))
            .copied()
            .collect())
    }

    /// `ker φ ⊆ N₁`.
    #[must_use]
    pub fn kernel(&self) -> Sublattice {
        Sublattice::kernel_of(&self.matrix)
    }

    /// `φ(N₁) ⊆ N₂`.
    #[must_use]
    pub fn image(&self) -> Sublattice {
        Sublattice::from_matrix(&self.matrix)
    }

    /// `[N₂ : φ(N₁)]`.
    #[must_use]
    pub fn index(&self) -> LatticeIndex {
        self.image().index_in_ambient()
    }

    /// Index of `N₁ → N₂ / N₂,cone`, or zero when nothing maps onto `cone`.
    ///
    /// # Errors
    ///
    /// Fails if `cone` is not a cone of the codomain fan.
    pub fn index_over(&self, cone: &Cone) -> Result<LatticeIndex> {
        if self.primitive_preimage_cones(cone)?.is_empty() {
            return Ok(LatticeIndex::Finite(Z::zero()));
        }
        let target = self.codomain.try_embed(cone)?;
        let generators = self.matrix.stack(target.sublattice().basis_matrix());
        Ok(Sublattice::from_matrix(&generators).index_in_ambient())
    }

    /// The subfan of domain cones mapped to the origin.
    ///
    /// # Errors
    ///
    /// Propagates fan construction failures.
    pub fn kernel_fan(&self) -> Result<Fan> {
        let cones: Vec<&Cone> = self
            .domain
            .cones()
            .filter(|c| self.image_indices(c).is_some_and(<[usize]>::is_empty))
            .map(FanCone::cone)
            .collect();
        Ok(Fan::from_cones(
            cones,
            self.domain.lattice_dim(),
            &FanConfig::unchecked(),
        )?)
    }

    /// True if `φ(N₁)` has full rank.
    #[must_use]
    pub fn is_dominant(&self) -> bool {
        self.image().rank() == self.codomain.lattice_dim()
    }

    /// True if dominant and every codomain cone is an image cone.
    #[must_use]
    pub fn is_surjective(&self) -> bool {
        if !self.is_dominant() {
            return false;
        }
        let hit: FxHashSet<&[usize]> = self.image_cones.values().map(Vec::as_slice).collect();
        self.codomain
            .cones()
            .all(|c| hit.contains(c.ambient_ray_indices()))
    }

    /// True if `φ` is a lattice isomorphism.
    #[must_use]
    pub fn is_birational(&self) -> bool {
        self.domain.lattice_dim() == self.codomain.lattice_dim()
            && self.kernel().rank() == 0
            && self.index().is_one()
    }

    /// True if `φ` identifies the domain fan with the trace of the codomain
    /// fan on a saturated sublattice.
    #[must_use]
    pub fn is_injective(&self) -> bool {
        let image = self.image();
        if self.kernel().rank() != 0 || !image.is_saturated() {
            return false;
        }
        let mut seen = FxHashSet::default();
        for cone in self.domain.cones() {
            let Some(indices) = self.image_indices(cone) else {
                return false;
            };
            if !seen.insert(indices) {
                return false;
            }
            let Some(target) = self.codomain.cone_by_indices(indices) else {
                return false;
            };
            let same = target
                .cone()
                .intersection_with_span(&image)
                .and_then(|slice| Ok(slice == cone.cone().image(&self.matrix)?));
            if !same.unwrap_or(false) {
                return false;
            }
        }
        true
    }

    /// True if dominant and every primitive preimage cone has the dimension
    /// of the codomain cone it maps onto, so fibers over each orbit keep the
    /// generic dimension.
    #[must_use]
    pub fn is_fibration(&self) -> bool {
        self.is_dominant()
            && self.codomain.cones().all(|target| {
                self.primitive_preimage_cones(target)
                    .is_ok_and(|preimages| preimages.iter().all(|p| p.dim() == target.dim()))
            })
    }

    /// True if the domain fan splits as the kernel fan times the codomain
    /// fan, with one lift per codomain ray.
    #[must_use]
    pub fn is_bundle(&self) -> bool {
        if !self.index().is_one() {
            return false;
        }
        let Ok(fiber) = self.kernel_fan() else {
            return false;
        };
        let base_count = self.codomain.ngenerating_cones();
        if fiber.ngenerating_cones() * base_count != self.domain.ngenerating_cones() {
            return false;
        }

        let zero = LatticePoint::zero(self.codomain.lattice_dim());
        let mut lifts: FxHashMap<usize, usize> = FxHashMap::default();
        let mut pairs: FxHashSet<(Vec<usize>, Vec<usize>)> = FxHashSet::default();

        for sigma in self.domain.generating_cones() {
            let Some(base) = self
                .image_indices(sigma)
                .and_then(|idx| self.codomain.cone_by_indices(idx))
            else {
                return false;
            };
            if !self.codomain.generating_cones().contains(&base) {
                return false;
            }

            let mut vertical = Vec::new();
            let mut horizontal = Vec::new();
            for &i in sigma.ambient_ray_indices() {
                let Ok(image) = self.apply(self.domain.ray(i)) else {
                    return false;
                };
                if image == zero {
                    vertical.push(self.domain.ray(i).clone());
                    continue;
                }
                let Some(j) = self.codomain.ray_index(&image) else {
                    return false;
                };
                if *lifts.entry(j).or_insert(i) != i {
                    return false;
                }
                horizontal.push(j);
            }
            horizontal.sort_unstable();
            if horizontal != base.ambient_ray_indices() {
                return false;
            }

            let Ok(fiber_cone) = Cone::new(self.domain.lattice_dim(), vertical) else {
                return false;
            };
            let Some(fiber_cone) = fiber.embed(&fiber_cone) else {
                return false;
            };
            pairs.insert((
                fiber_cone.ambient_ray_indices().to_vec(),
                horizontal,
            ));
        }
        pairs.len() == self.domain.ngenerating_cones()
    }

    /// `self ∘ right`.
    ///
    /// # Errors
    ///
    /// Fails if the codomain fan of `right` is not the domain fan of `self`.
    pub fn compose(&self, right: &FanMorphism) -> Result<FanMorphism> {
        if right.codomain != self.domain {
            return Err(MorphismError::CompositionMismatch);
        }
        Self::new(
            right.matrix.mm(&self.matrix),
            right.domain.clone(),
            self.codomain.clone(),
            &MorphismConfig::unchecked(),
        )
    }

    /// Splits `φ = φ_i ∘ φ_b ∘ φ_s`.
    ///
    /// With `L` the saturation of `φ(N₁)`: `φ_s` maps the domain fan onto the
    /// fan of its image cones in `L`, `φ_b` is the identity of `L` into the
    /// trace of the codomain fan on `L_R`, and `φ_i` is the inclusion of that
    /// trace into the codomain fan. Returns `(φ_i, φ_b, φ_s)`.
    ///
    /// # Errors
    ///
    /// Fails when the image cones of the domain fan do not form a fan.
    pub fn factor(&self) -> Result<(FanMorphism, FanMorphism, FanMorphism)> {
        let lattice = self.image().saturation();
        let rank = lattice.rank();

        let mut rows = Vec::with_capacity(self.matrix.num_rows());
        for row in self.matrix.rows() {
            let point = LatticePoint::new(row.iter().cloned());
            rows.push(lattice.coordinates_of(&point)?.to_vec());
        }
        let reduced = DenseMatrix::from_rows_with_cols(rank, rows);

        let surjective_config = MorphismConfig {
            check: false,
            fan: FanConfig::default(),
        };
        let surjective =
            Self::with_codomain_lattice(reduced, self.domain.clone(), rank, &surjective_config)?;

        let mut slices = Vec::with_capacity(self.codomain.ngenerating_cones());
        for cone in self.codomain.generating_cones() {
            let slice = cone.cone().intersection_with_span(&lattice)?;
            slices.push(slice.in_sublattice_coordinates(&lattice)?);
        }
        let trace = Fan::from_cones(&slices, rank, &FanConfig::unchecked())?;

        let unchecked = MorphismConfig::unchecked();
        let birational = Self::new(
            DenseMatrix::identity(rank),
            surjective.codomain.clone(),
            trace.clone(),
            &unchecked,
        )?;
        let injective = Self::new(
            lattice.basis_matrix().clone(),
            trace,
            self.codomain.clone(),
            &unchecked,
        )?;

        debug!(
            image_rank = rank,
            image_fan_cones = surjective.codomain.ncones(),
            trace_fan_cones = injective.domain.ncones(),
            "fan morphism factored"
        );
        Ok((injective, birational, surjective))
    }
}

fn check_shape(matrix: &DenseMatrix<Z>, domain: usize, codomain: usize) -> Result<()> {
    if matrix.num_rows() == domain && matrix.num_cols() == codomain {
        Ok(())
    } else {
        Err(MorphismError::ShapeMismatch {
            rows: matrix.num_rows(),
            cols: matrix.num_cols(),
            domain,
            codomain,
        })
    }
}

/// The smallest codomain cone containing the image of `cone`, as ray indices.
///
/// The sum of the ray images is a relative interior point of the image, so
/// the codomain cone carrying it is the only candidate.
fn find_image_cone(
    matrix: &DenseMatrix<Z>,
    codomain: &Fan,
    cone: &Cone,
) -> Result<Option<Vec<usize>>> {
    let mut images = Vec::with_capacity(cone.nrays());
    for r in cone.rays() {
        images.push(r.apply(matrix)?);
    }
    let point = images
        .iter()
        .fold(LatticePoint::zero(codomain.lattice_dim()), |acc, v| &acc + v);
    let Some(target) = codomain.smallest_cone_containing(&point) else {
        return Ok(None);
    };
    Ok(images
        .iter()
        .all(|v| target.cone().contains(v))
        .then(|| target.ambient_ray_indices().to_vec()))
}

pub(crate) fn is_sorted_subset(small: &[usize], large: &[usize]) -> bool {
    let mut it = large.iter();
    small.iter().all(|x| it.any(|y| y == x))
}

impl PartialEq for FanMorphism {
    fn eq(&self, other: &Self) -> bool {
        self.matrix == other.matrix && self.domain == other.domain && self.codomain == other.codomain
    }
}

impl Eq for FanMorphism {}

impl fmt::Display for FanMorphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fan morphism defined by the matrix")?;
        for row in self.matrix.rows() {
            let entries: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "[{}]", entries.join(" "))?;
        }
        writeln!(f, "Domain fan: {}", self.domain)?;
        write!(f, "Codomain fan: {}", self.codomain)
    }
}
