//! Irreducible components of fibers of toric morphisms.
//!
//! For a domain cone `σ` with image cone `τ`, let `L ⊆ N₁` be the lattice of
//! points mapping into `span τ`. The component attached to `σ` is the toric
//! variety of the relative star of `σ` projected to `L / L_σ`. When `σ` is
//! the origin this is the generic fiber, written in `L` coordinates.

use std::collections::BTreeSet;

use petgraph::graph::UnGraph;
use rustc_hash::FxHashMap;
use toric_geometry::{Cone, Fan, FanCone, FanConfig};
use toric_lattice::{LatticePoint, LatticeQuotient, Sublattice};
use toric_poly::{MonomialOrder, SparsePoly};
use tracing::debug;

use crate::config::MorphismConfig;
use crate::error::{MorphismError, Result};
use crate::fan_morphism::FanMorphism;
use crate::morphism::ToricMorphism;
use crate::variety::ToricVariety;

/// Graph of the components of a fiber, joined when they meet.
pub type FiberGraph = UnGraph<FiberComponent, ()>;

/// Map from `N₁` to the lattice of a fiber component.
enum FiberProjection {
    /// Coordinates in `L`, for the generic fiber.
    Lattice(Sublattice),
    /// Coordinates in `L`, then projection to `L / L_σ`.
    Quotient(Sublattice, LatticeQuotient),
}

impl FiberProjection {
    fn rank(&self) -> usize {
        match self {
            Self::Lattice(lattice) => lattice.rank(),
            Self::Quotient(_, quotient) => quotient.free_rank(),
        }
    }

    fn apply(&self, v: &LatticePoint) -> Result<LatticePoint> {
        match self {
            Self::Lattice(lattice) => Ok(lattice.coordinates_of(v)?),
            Self::Quotient(lattice, quotient) => {
                Ok(quotient.project(&lattice.coordinates_of(v)?)?)
            }
        }
    }
}

/// The torus orbit closure in a fiber attached to a domain cone.
#[derive(Clone, Debug)]
pub struct FiberComponent {
    ambient: ToricVariety,
    defining_cone: FanCone,
    base_cone: FanCone,
    fiber: ToricVariety,
    ray_index_map: FxHashMap<LatticePoint, usize>,
    /// Basis of `L` when the defining cone is the origin.
    lattice_basis: Option<Sublattice>,
}

impl FiberComponent {
    pub(crate) fn new(ambient: &ToricVariety, morphism: &FanMorphism, cone: &Cone) -> Result<Self> {
        let domain = morphism.domain_fan();
        let sigma = domain.try_embed(cone)?.clone();
        let base = morphism.image_cone(&sigma)?.clone();
        let lattice = Sublattice::preimage_of_span(morphism.matrix(), &base.sublattice())?;

        let projection = if sigma.is_trivial() {
            FiberProjection::Lattice(lattice.clone())
        } else {
            let local = sigma.in_sublattice_coordinates(&lattice)?;
            FiberProjection::Quotient(lattice.clone(), local.sublattice_quotient())
        };
        let rank = projection.rank();

        let mut star_rays = BTreeSet::new();
        let mut projected = Vec::new();
        for generator in morphism.relative_star_generators(&sigma)? {
            let mut images = Vec::with_capacity(generator.nrays());
            for &i in generator.ambient_ray_indices() {
                star_rays.insert(i);
                images.push(projection.apply(domain.ray(i))?);
            }
            projected.push(Cone::new(rank, images)?);
        }
        let fiber_fan = Fan::from_cones(&projected, rank, &FanConfig::default())?;

        let mut ray_index_map = FxHashMap::default();
        for i in star_rays {
            let image = projection.apply(domain.ray(i))?;
            if image.is_zero() {
                debug_assert!(sigma.ambient_ray_indices().contains(&i));
                continue;
            }
            ray_index_map.entry(image).or_insert(i);
        }

        debug!(
            cone = ?sigma.ambient_ray_indices(),
            base = ?base.ambient_ray_indices(),
            fiber_dim = rank,
            fiber_cones = fiber_fan.ngenerating_cones(),
            "fiber component constructed"
        );

        Ok(Self {
            ambient: ambient.clone(),
            lattice_basis: sigma.is_trivial().then_some(lattice),
            defining_cone: sigma,
            base_cone: base,
            fiber: ToricVariety::new(fiber_fan),
            ray_index_map,
        })
    }

    /// The component as a toric variety.
    #[must_use]
    pub fn variety(&self) -> &ToricVariety {
        &self.fiber
    }

    /// Dimension of the component.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.fiber.dimension()
    }

    /// The domain cone the component is attached to.
    #[must_use]
    pub fn defining_cone(&self) -> &FanCone {
        &self.defining_cone
    }

    /// The codomain cone over whose orbit the component lies.
    #[must_use]
    pub fn base_cone(&self) -> &FanCone {
        &self.base_cone
    }

    /// Fiber ray generator to the domain ray it comes from.
    #[must_use]
    pub fn ray_index_map(&self) -> &FxHashMap<LatticePoint, usize> {
        &self.ray_index_map
    }

    /// True for the component of the origin, the generic fiber.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.lattice_basis.is_some()
    }

    /// The embedding into the domain in homogeneous coordinates.
    ///
    /// # Errors
    ///
    /// Fails when a fiber ray is not the image of a domain ray.
    pub fn as_polynomial_map(&self) -> Result<ToricMorphism> {
        let nvars = self.fiber.ngens();
        let order = MonomialOrder::default();
        let mut polys = vec![SparsePoly::one(nvars, order); self.ambient.ngens()];
        for &i in self.defining_cone.ambient_ray_indices() {
            polys[i] = SparsePoly::zero(nvars, order);
        }
        for (k, ray) in self.fiber.fan().rays().iter().enumerate() {
            let &i = self
                .ray_index_map
                .get(ray)
                .ok_or(MorphismError::NotPolynomialFiberEmbedding)?;
            polys[i] = SparsePoly::var(k, nvars, order);
        }
        ToricMorphism::from_polynomials(
            self.fiber.clone(),
            self.ambient.clone(),
            polys,
            &MorphismConfig::unchecked(),
        )
    }

    /// The embedding of the generic fiber as a toric morphism.
    ///
    /// # Errors
    ///
    /// Returns [`MorphismError::NotFanBased`] for components over a
    /// non-trivial cone, whose embeddings are not toric.
    pub fn toric_embedding(&self) -> Result<ToricMorphism> {
        let lattice = self.lattice_basis.as_ref().ok_or(MorphismError::NotFanBased)?;
        ToricMorphism::from_matrix(
            self.fiber.clone(),
            self.ambient.clone(),
            lattice.basis_matrix().clone(),
            &MorphismConfig::unchecked(),
        )
    }
}

/// The fiber graph over a codomain cone.
pub(crate) fn fiber_graph(
    ambient: &ToricVariety,
    morphism: &FanMorphism,
    cone: &Cone,
) -> Result<FiberGraph> {
    let primitive = morphism.primitive_preimage_cones(cone)?;
    let domain = morphism.domain_fan();

    let mut graph = FiberGraph::with_capacity(primitive.len(), 0);
    let mut nodes = Vec::with_capacity(primitive.len());
    for p in &primitive {
        nodes.push(graph.add_node(FiberComponent::new(ambient, morphism, p)?));
    }

    for (i, a) in primitive.iter().enumerate() {
        for (j, b) in primitive.iter().enumerate().skip(i + 1) {
            let rays = a.rays().iter().chain(b.rays()).cloned();
            let union = Cone::new(domain.lattice_dim(), rays)?;
            if domain.contains(&union) {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    debug!(
        components = graph.node_count(),
        intersections = graph.edge_count(),
        "fiber graph constructed"
    );
    Ok(graph)
}
