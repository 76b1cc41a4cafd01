//! Morphisms of toric varieties.
//!
//! A toric morphism is given either by homogeneous polynomials in the Cox
//! coordinates of the domain, one per codomain ray, or by a fan morphism
//! between the fans of the two varieties. Conversions between the two forms
//! are explicit and fallible.

use std::fmt;

use toric_geometry::{Cone, Fan, FanConfig};
use toric_lattice::Sublattice;
use toric_linalg::DenseMatrix;
use toric_poly::{Monomial, MonomialOrder, SparsePoly};
use toric_rings::{Ring, Q, Z};
use tracing::{debug, trace};

use crate::config::MorphismConfig;
use crate::error::{MorphismError, Result};
use crate::fan_morphism::FanMorphism;
use crate::fiber::{self, FiberComponent, FiberGraph};
use crate::variety::{ToricPoint, ToricVariety};

/// How a toric morphism is defined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MorphismDefinition {
    /// One homogeneous polynomial in the domain Cox ring per codomain ray.
    Polynomial(Vec<SparsePoly<Q>>),
    /// A fan morphism between the fans of domain and codomain.
    FanBased(FanMorphism),
}

/// A morphism of toric varieties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToricMorphism {
    domain: ToricVariety,
    codomain: ToricVariety,
    definition: MorphismDefinition,
}

impl ToricMorphism {
    /// The morphism sending the Cox coordinates of `codomain` to `polys`.
    ///
    /// # Errors
    ///
    /// Fails unless there is one polynomial per codomain ray, each in the
    /// Cox ring of `domain`, and (when checking) each homogeneous.
    pub fn from_polynomials(
        domain: ToricVariety,
        codomain: ToricVariety,
        polys: Vec<SparsePoly<Q>>,
        config: &MorphismConfig,
    ) -> Result<Self> {
        if polys.len() != codomain.ngens() {
            return Err(MorphismError::PolynomialCount {
                expected: codomain.ngens(),
                found: polys.len(),
            });
        }
        for (index, p) in polys.iter().enumerate() {
            if p.num_vars() != domain.ngens() {
                return Err(MorphismError::WrongRing {
                    index,
                    expected: domain.ngens(),
                    found: p.num_vars(),
                });
            }
            if config.check && !domain.is_homogeneous(p) {
                return Err(MorphismError::NotHomogeneous {
                    polynomial: p.format_with(domain.coordinate_names()),
                });
            }
        }
        Ok(Self {
            domain,
            codomain,
            definition: MorphismDefinition::Polynomial(polys),
        })
    }

    /// The morphism induced by a fan morphism.
    ///
    /// # Errors
    ///
    /// Fails unless the fans of `morphism` are the fans of the varieties.
    pub fn from_fan_morphism(
        domain: ToricVariety,
        codomain: ToricVariety,
        morphism: FanMorphism,
    ) -> Result<Self> {
        if morphism.domain_fan() != domain.fan() {
            return Err(MorphismError::DomainFanMismatch);
        }
        if morphism.codomain_fan() != codomain.fan() {
            return Err(MorphismError::CodomainFanMismatch);
        }
        Ok(Self::fan_based(domain, codomain, morphism))
    }

    /// The morphism induced by the lattice map `matrix`.
    ///
    /// # Errors
    ///
    /// Fails as [`FanMorphism::new`] does.
    pub fn from_matrix(
        domain: ToricVariety,
        codomain: ToricVariety,
        matrix: DenseMatrix<Z>,
        config: &MorphismConfig,
    ) -> Result<Self> {
        let morphism = FanMorphism::new(
            matrix,
            domain.fan().clone(),
            codomain.fan().clone(),
            config,
        )?;
        Ok(Self::fan_based(domain, codomain, morphism))
    }

    fn fan_based(domain: ToricVariety, codomain: ToricVariety, morphism: FanMorphism) -> Self {
        Self {
            domain,
            codomain,
            definition: MorphismDefinition::FanBased(morphism),
        }
    }

    /// The domain.
    #[must_use]
    pub fn domain(&self) -> &ToricVariety {
        &self.domain
    }

    /// The codomain.
    #[must_use]
    pub fn codomain(&self) -> &ToricVariety {
        &self.codomain
    }

    /// The definition.
    #[must_use]
    pub fn definition(&self) -> &MorphismDefinition {
        &self.definition
    }

    /// The fan morphism, for fan-based morphisms.
    #[must_use]
    pub fn fan_morphism(&self) -> Option<&FanMorphism> {
        match &self.definition {
            MorphismDefinition::FanBased(morphism) => Some(morphism),
            MorphismDefinition::Polynomial(_) => None,
        }
    }

    /// The defining polynomials, for polynomial morphisms.
    #[must_use]
    pub fn polynomials(&self) -> Option<&[SparsePoly<Q>]> {
        match &self.definition {
            MorphismDefinition::Polynomial(polys) => Some(polys),
            MorphismDefinition::FanBased(_) => None,
        }
    }

    fn require_fan_morphism(&self) -> Result<&FanMorphism> {
        self.fan_morphism().ok_or(MorphismError::NotFanBased)
    }

    /// The same morphism in homogeneous coordinates.
    ///
    /// Each domain ray `u` maps into its image cone as `φ(u) = Σ d_ρ u_ρ`;
    /// the codomain coordinate of `u_ρ` picks up the factor `x_u^{d_ρ}`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphismError::NotPolynomialFanMorphism`] when some `d_ρ`
    /// is not a non-negative integer.
    pub fn as_polynomial_map(&self) -> Result<Self> {
        Ok(Self {
            domain: self.domain.clone(),
            codomain: self.codomain.clone(),
            definition: MorphismDefinition::Polynomial(self.polynomial_form()?),
        })
    }

    fn polynomial_form(&self) -> Result<Vec<SparsePoly<Q>>> {
        let morphism = match &self.definition {
            MorphismDefinition::Polynomial(polys) => return Ok(polys.clone()),
            MorphismDefinition::FanBased(morphism) => morphism,
        };
        let domain = morphism.domain_fan();
        let nvars = domain.nrays();
        let mut exponents = vec![vec![0u32; nvars]; self.codomain.ngens()];

        for k in 0..nvars {
            let ray = domain
                .cone_by_indices(&[k])
                .ok_or(MorphismError::NotPolynomialFanMorphism)?;
            let target = morphism.image_cone(ray)?;
            let image = morphism.apply(domain.ray(k))?;
            let basis = target.ray_matrix().map(|z| Q::from(z));
            let rhs: Vec<Q> = image.coords().iter().map(|z| Q::from(z)).collect();
            let degrees = basis
                .solve_left(&rhs)
                .ok_or(MorphismError::NotPolynomialFanMorphism)?;
            for (&j, d) in target.ambient_ray_indices().iter().zip(&degrees) {
                let d = d
                    .to_integer()
                    .and_then(|d| d.to_u32())
                    .ok_or(MorphismError::NotPolynomialFanMorphism)?;
                exponents[j][k] += d;
            }
            trace!(ray = k, ?degrees, "domain ray written in image cone rays");
        }

        let order = MonomialOrder::default();
        Ok(exponents
            .iter()
            .map(|e| SparsePoly::term(Monomial::from_exponents(e), Q::one(), order))
            .collect())
    }

    /// The same morphism as a fan morphism.
    ///
    /// Works for monomial maps with unit coefficients whose domain rays span
    /// the domain lattice: the matrix solves `V₁·M = A·V₂`, with `A` the
    /// exponents and `V` the ray matrices.
    ///
    /// # Errors
    ///
    /// Returns [`MorphismError::NotFanMorphism`] when no integral `M` exists,
    /// and propagates fan compatibility failures.
    pub fn as_fan_morphism(&self) -> Result<Self> {
        let polys = match &self.definition {
            MorphismDefinition::FanBased(_) => return Ok(self.clone()),
            MorphismDefinition::Polynomial(polys) => polys,
        };
        let not_fan = |reason: &str| MorphismError::NotFanMorphism {
            reason: reason.to_string(),
        };

        let n_domain = self.domain.ngens();
        let mut exponents = vec![vec![Z::zero(); polys.len()]; n_domain];
        for (j, p) in polys.iter().enumerate() {
            let (m, c) = p
                .as_term()
                .ok_or_else(|| not_fan("some coordinate is not a monomial"))?;
            if !c.is_one() {
                return Err(not_fan("some monomial has a coefficient other than one"));
            }
            for (k, &e) in m.exponents().iter().enumerate() {
                exponents[k][j] = Z::from(e);
            }
        }

        let v1 = self.domain.fan().ray_matrix().map(|z| Q::from(z));
        if v1.rank() != self.domain.dimension() {
            return Err(not_fan("the domain rays do not span the lattice"));
        }
        let rhs = DenseMatrix::from_rows_with_cols(polys.len(), exponents)
            .mm(&self.codomain.fan().ray_matrix())
            .map(|z| Q::from(z));

        let dim = self.codomain.dimension();
        let mut columns = Vec::with_capacity(dim);
        for c in 0..dim {
            let column = v1
                .solve(&rhs.col(c))
                .ok_or_else(|| not_fan("the exponents are not induced by a lattice map"))?;
            columns.push(column);
        }
        let mut rows = Vec::with_capacity(self.domain.dimension());
        for r in 0..self.domain.dimension() {
            let mut row = Vec::with_capacity(dim);
            for column in &columns {
                row.push(
                    column[r]
                        .to_integer()
                        .ok_or_else(|| not_fan("the lattice map is not integral"))?,
                );
            }
            rows.push(row);
        }
        let matrix = DenseMatrix::from_rows_with_cols(dim, rows);
        debug!(
            rows = matrix.num_rows(),
            cols = matrix.num_cols(),
            "monomial map converted to a lattice map"
        );
        Self::from_matrix(
            self.domain.clone(),
            self.codomain.clone(),
            matrix,
            &MorphismConfig::default(),
        )
    }

    /// `self ∘ right`.
    ///
    /// Two fan-based morphisms compose as fan morphisms; otherwise the
    /// polynomial forms are composed by substitution.
    ///
    /// # Errors
    ///
    /// Fails if the codomain of `right` is not the domain of `self`, or if a
    /// polynomial form is needed and does not exist.
    pub fn compose(&self, right: &Self) -> Result<Self> {
        if right.codomain != self.domain {
            return Err(MorphismError::CompositionMismatch);
        }
        if let (Some(left), Some(inner)) = (self.fan_morphism(), right.fan_morphism()) {
            return Ok(Self::fan_based(
                right.domain.clone(),
                self.codomain.clone(),
                left.compose(inner)?,
            ));
        }
        let images = right.polynomial_form()?;
        let nvars = right.domain.ngens();
        let polys = self
            .polynomial_form()?
            .iter()
            .map(|p| p.substitute(&images, nvars))
            .collect();
        Ok(Self {
            domain: right.domain.clone(),
            codomain: self.codomain.clone(),
            definition: MorphismDefinition::Polynomial(polys),
        })
    }

    /// Splits the morphism as `injective ∘ birational ∘ surjective`.
    ///
    /// Returns `(injective, birational, surjective)`, see
    /// [`FanMorphism::factor`].
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms and when factoring the fan morphism
    /// fails.
    pub fn factor(&self) -> Result<(Self, Self, Self)> {
        let (injective, birational, surjective) = self.require_fan_morphism()?.factor()?;
        let image = ToricVariety::new(surjective.codomain_fan().clone());
        let trace = ToricVariety::new(injective.domain_fan().clone());
        Ok((
            Self::fan_based(trace.clone(), self.codomain.clone(), injective),
            Self::fan_based(image.clone(), trace, birational),
            Self::fan_based(self.domain.clone(), image, surjective),
        ))
    }

    /// See [`FanMorphism::is_bundle`].
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms.
    pub fn is_bundle(&self) -> Result<bool> {
        Ok(self.require_fan_morphism()?.is_bundle())
    }

    /// See [`FanMorphism::is_fibration`].
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms.
    pub fn is_fibration(&self) -> Result<bool> {
        Ok(self.require_fan_morphism()?.is_fibration())
    }

    /// See [`FanMorphism::is_injective`].
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms.
    pub fn is_injective(&self) -> Result<bool> {
        Ok(self.require_fan_morphism()?.is_injective())
    }

    /// See [`FanMorphism::is_surjective`].
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms.
    pub fn is_surjective(&self) -> Result<bool> {
        Ok(self.require_fan_morphism()?.is_surjective())
    }

    /// See [`FanMorphism::is_birational`].
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms.
    pub fn is_birational(&self) -> Result<bool> {
        Ok(self.require_fan_morphism()?.is_birational())
    }

    /// The generic fiber with its embedding into the domain.
    ///
    /// The fiber is the toric variety of the kernel fan, written in
    /// coordinates of `ker φ`.
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms.
    pub fn fiber(&self) -> Result<Self> {
        let morphism = self.require_fan_morphism()?;
        let kernel: Sublattice = morphism.kernel();
        let kernel_fan = morphism.kernel_fan()?;

        let mut cones = Vec::with_capacity(kernel_fan.ngenerating_cones());
        for cone in kernel_fan.generating_cones() {
            cones.push(cone.cone().in_sublattice_coordinates(&kernel)?);
        }
        let fan = Fan::from_cones(&cones, kernel.rank(), &FanConfig::default())?;
        debug!(
            fiber_dim = kernel.rank(),
            fiber_cones = fan.ncones(),
            "generic fiber constructed"
        );
        Self::from_matrix(
            ToricVariety::new(fan),
            self.domain.clone(),
            kernel.basis_matrix().clone(),
            &MorphismConfig::unchecked(),
        )
    }

    /// The fiber component attached to a domain cone.
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms and cones outside the domain fan.
    pub fn fiber_component(&self, cone: &Cone) -> Result<FiberComponent> {
        FiberComponent::new(&self.domain, self.require_fan_morphism()?, cone)
    }

    /// Dimension of the fiber over a point of the orbit of a codomain cone.
    ///
    /// # Errors
    ///
    /// Returns [`MorphismError::NoPrimitivePreimage`] when no domain cone
    /// maps onto `cone`.
    pub fn fiber_dimension(&self, cone: &Cone) -> Result<usize> {
        let morphism = self.require_fan_morphism()?;
        let target = morphism.codomain_fan().try_embed(cone)?;
        let primitive = morphism.primitive_preimage_cones(cone)?;
        let base = target.dim() + self.domain.dimension() - morphism.image().rank();
        primitive
            .iter()
            .map(|p| base.saturating_sub(p.dim()))
            .max()
            .ok_or_else(|| MorphismError::NoPrimitivePreimage {
                cone: cone.to_string(),
            })
    }

    /// The components of the fiber over a codomain cone and how they meet.
    ///
    /// # Errors
    ///
    /// Fails for polynomial morphisms and cones outside the codomain fan.
    pub fn fiber_graph(&self, cone: &Cone) -> Result<FiberGraph> {
        fiber::fiber_graph(&self.domain, self.require_fan_morphism()?, cone)
    }

    /// The image of a point.
    ///
    /// # Errors
    ///
    /// Fails when the point is not a point of the domain, when no polynomial
    /// form exists, or when the image lies in the exceptional set.
    pub fn apply(&self, point: &ToricPoint) -> Result<ToricPoint> {
        if point.coords().len() != self.domain.ngens() {
            return Err(MorphismError::CoordinateCount {
                expected: self.domain.ngens(),
                found: point.coords().len(),
            });
        }
        let values = self
            .polynomial_form()?
            .iter()
            .map(|p| p.evaluate(point.coords()))
            .collect();
        self.codomain.point(values)
    }
}

impl fmt::Display for ToricMorphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scheme morphism:")?;
        writeln!(f, "  From: {}", self.domain)?;
        writeln!(f, "  To:   {}", self.codomain)?;
        match &self.definition {
            MorphismDefinition::Polynomial(polys) => {
                let names = self.domain.coordinate_names();
                let images: Vec<String> = polys.iter().map(|p| p.format_with(names)).collect();
                writeln!(f, "  Defn: Defined on coordinates by sending [{}] to", names.join(" : "))?;
                write!(f, "        [{}]", images.join(" : "))
            }
            MorphismDefinition::FanBased(morphism) => write!(
                f,
                "  Defn: Defined by sending {} to {}.",
                morphism.domain_fan(),
                morphism.codomain_fan()
            ),
        }
    }
}
