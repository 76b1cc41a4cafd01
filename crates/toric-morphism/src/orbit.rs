//! Torus orbit closures.
//!
//! The closure `V(σ)` of the orbit of a cone `σ` is the toric variety of the
//! star of `σ` projected to `N / N_σ`. Its embedding into the ambient
//! variety is recorded through where each star ray lands.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use toric_geometry::{Cone, Fan, FanCone, FanConfig};
use toric_lattice::LatticePoint;
use toric_poly::{MonomialOrder, SparsePoly};
use tracing::debug;

use crate::config::MorphismConfig;
use crate::error::{MorphismError, Result};
use crate::morphism::ToricMorphism;
use crate::variety::ToricVariety;

/// The closure of a torus orbit together with its embedding data.
#[derive(Clone, Debug)]
pub struct OrbitClosure {
    ambient: ToricVariety,
    defining_cone: FanCone,
    orbit: ToricVariety,
    /// Ambient ray index to its image in `N / N_σ`, for the star rays.
    ray_map: Vec<(usize, LatticePoint)>,
    reverse_ray_map: FxHashMap<LatticePoint, usize>,
}

impl OrbitClosure {
    pub(crate) fn new(ambient: &ToricVariety, cone: &Cone, config: &FanConfig) -> Result<Self> {
        let fan = ambient.fan();
        let sigma = fan.try_embed(cone)?.clone();
        let quotient = sigma.sublattice_quotient();
        let rank = quotient.free_rank();

        let mut star_rays = BTreeSet::new();
        let mut projected = Vec::new();
        for generator in fan.star_generators(&sigma) {
            let mut images = Vec::with_capacity(generator.nrays());
            for &i in generator.ambient_ray_indices() {
                star_rays.insert(i);
                images.push(quotient.project(fan.ray(i))?);
            }
            projected.push(Cone::new(rank, images)?);
        }
        let orbit_fan = Fan::from_cones(&projected, rank, config)?;

        let mut ray_map = Vec::with_capacity(star_rays.len());
        let mut reverse_ray_map = FxHashMap::default();
        for i in star_rays {
            let image = quotient.project(fan.ray(i))?;
            if image.is_zero() {
                debug_assert!(sigma.ambient_ray_indices().contains(&i));
            } else {
                reverse_ray_map.entry(image.clone()).or_insert(i);
            }
            ray_map.push((i, image));
        }

        debug!(
            cone = ?sigma.ambient_ray_indices(),
            orbit_dim = rank,
            orbit_rays = orbit_fan.nrays(),
            "orbit closure constructed"
        );

        Ok(Self {
            ambient: ambient.clone(),
            defining_cone: sigma,
            orbit: ToricVariety::new(orbit_fan),
            ray_map,
            reverse_ray_map,
        })
    }

    /// The cone whose orbit this is.
    #[must_use]
    pub fn defining_cone(&self) -> &FanCone {
        &self.defining_cone
    }

    /// The orbit closure as a toric variety.
    #[must_use]
    pub fn variety(&self) -> &ToricVariety {
        &self.orbit
    }

    /// The variety containing the orbit.
    #[must_use]
    pub fn ambient(&self) -> &ToricVariety {
        &self.ambient
    }

    /// Star rays and their images in `N / N_σ`, by ambient index.
    ///
    /// Rays of `σ` map to zero; other images need not be primitive.
    #[must_use]
    pub fn ray_map(&self) -> &[(usize, LatticePoint)] {
        &self.ray_map
    }

    /// Orbit ray generator to a preimage ray index; the smallest index wins.
    #[must_use]
    pub fn reverse_ray_map(&self) -> &FxHashMap<LatticePoint, usize> {
        &self.reverse_ray_map
    }

    /// The embedding in homogeneous coordinates.
    ///
    /// # Errors
    ///
    /// Fails when some orbit ray is not the image of an ambient ray.
    pub fn as_polynomial_map(&self) -> Result<ToricMorphism> {
        let nvars = self.orbit.ngens();
        let order = MonomialOrder::default();
        let mut polys = vec![SparsePoly::one(nvars, order); self.ambient.ngens()];
        for &i in self.defining_cone.ambient_ray_indices() {
            polys[i] = SparsePoly::zero(nvars, order);
        }
        for (k, ray) in self.orbit.fan().rays().iter().enumerate() {
            let &i = self
                .reverse_ray_map
                .get(ray)
                .ok_or(MorphismError::NotPolynomialOrbitEmbedding)?;
            polys[i] = SparsePoly::var(k, nvars, order);
        }
        ToricMorphism::from_polynomials(
            self.orbit.clone(),
            self.ambient.clone(),
            polys,
            &MorphismConfig::unchecked(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toric_rings::Q;

    fn variety(rays: &[&[i64]], cones: &[&[usize]]) -> ToricVariety {
        let fan = Fan::new(
            rays.iter().map(|r| LatticePoint::from_i64s(r)).collect(),
            cones.iter().map(|c| c.to_vec()).collect(),
            2,
            &FanConfig::default(),
        )
        .unwrap();
        ToricVariety::new(fan)
    }

    fn p2() -> ToricVariety {
        variety(&[&[1, 0], &[0, 1], &[-1, -1]], &[&[0, 1], &[1, 2], &[0, 2]])
    }

    #[test]
    fn test_orbit_of_a_ray_is_a_line() {
        let x = p2();
        let ray = x.fan().cone_by_indices(&[0]).unwrap().cone().clone();
        let orbit = x.orbit_closure(&ray).unwrap();
        assert_eq!(orbit.variety().dimension(), 1);
        assert_eq!(orbit.variety().naffine_patches(), 2);
        assert_eq!(orbit.ray_map().len(), 3);
        assert!(orbit.ray_map()[0].1.is_zero());
        assert_eq!(orbit.reverse_ray_map().len(), 2);

        let embedding = orbit.as_polynomial_map().unwrap();
        let polys = embedding.polynomials().unwrap();
        let names = orbit.variety().coordinate_names();
        let shown: Vec<String> = polys.iter().map(|p| p.format_with(names)).collect();
        assert_eq!(shown, vec!["0", "z0", "z1"]);

        let point = orbit.variety().point(vec![Q::from(2), Q::from(3)]).unwrap();
        let image = embedding.apply(&point).unwrap();
        assert_eq!(image.to_string(), "[0 : 2 : 3]");
    }

    #[test]
    fn test_orbit_of_a_maximal_cone_is_a_point() {
        let x = p2();
        let cone = x.fan().cone_by_indices(&[1, 2]).unwrap().cone().clone();
        let orbit = x.orbit_closure(&cone).unwrap();
        assert_eq!(orbit.variety().dimension(), 0);
        let embedding = orbit.as_polynomial_map().unwrap();
        let shown: Vec<String> = embedding
            .polynomials()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(shown, vec!["1", "0", "0"]);
    }

    #[test]
    fn test_weighted_orbit_is_not_polynomial() {
        let x = variety(&[&[1, 0], &[0, 1], &[-1, -2]], &[&[0, 1], &[1, 2], &[0, 2]]);
        let ray = x.fan().cone_by_indices(&[0]).unwrap().cone().clone();
        let orbit = x.orbit_closure(&ray).unwrap();
        let images: Vec<&LatticePoint> = orbit.ray_map().iter().map(|(_, v)| v).collect();
        assert!(images.iter().any(|v| !v.is_zero() && !v.is_primitive()));
        assert!(matches!(
            orbit.as_polynomial_map(),
            Err(MorphismError::NotPolynomialOrbitEmbedding)
        ));
        assert_eq!(
            MorphismError::NotPolynomialOrbitEmbedding.to_string(),
            "The embedding cannot be written with homogeneous polynomials."
        );
    }

    #[test]
    fn test_cone_outside_fan() {
        let x = p2();
        let cone = Cone::new(2, [LatticePoint::from_i64s(&[1, 1])]).unwrap();
        assert!(matches!(
            x.orbit_closure(&cone),
            Err(MorphismError::Geometry(_))
        ));
    }
}
