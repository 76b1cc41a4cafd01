//! Property-based tests for morphisms.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{MorphismConfig, ToricMorphism, ToricVariety};
    use toric_geometry::{Fan, FanConfig};
    use toric_lattice::LatticePoint;
    use toric_linalg::DenseMatrix;
    use toric_rings::Z;

    fn line() -> ToricVariety {
        let fan = Fan::new(
            vec![LatticePoint::from_i64s(&[1])],
            vec![vec![0]],
            1,
            &FanConfig::default(),
        )
        .unwrap();
        ToricVariety::new(fan)
    }

    fn power(k: i64) -> ToricMorphism {
        ToricMorphism::from_matrix(
            line(),
            line(),
            DenseMatrix::from_rows(vec![vec![Z::new(k)]]),
            &MorphismConfig::default(),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn powers_compose_by_multiplying(a in 1i64..6, b in 1i64..6) {
            let fan_based = power(a).compose(&power(b)).unwrap();
            prop_assert_eq!(&fan_based, &power(a * b));

            let polynomial = power(a)
                .as_polynomial_map()
                .unwrap()
                .compose(&power(b).as_polynomial_map().unwrap())
                .unwrap();
            let expected = power(a * b).as_polynomial_map().unwrap();
            prop_assert_eq!(polynomial.polynomials(), expected.polynomials());
        }

        #[test]
        fn polynomial_round_trip(k in 1i64..8) {
            let phi = power(k);
            let back = phi.as_polynomial_map().unwrap().as_fan_morphism().unwrap();
            prop_assert_eq!(back, phi);
        }

        #[test]
        fn apply_matches_evaluation(k in 1i64..5, x in -6i64..6) {
            let phi = power(k);
            let point = line().point_from_i64s(&[x]).unwrap();
            let image = phi.apply(&point).unwrap();
            let expected = line().point_from_i64s(&[x.pow(u32::try_from(k).unwrap())]).unwrap();
            prop_assert_eq!(image, expected);
        }
    }
}
