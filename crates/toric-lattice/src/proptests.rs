//! Property-based tests for sublattices and quotients.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use toric_rings::Z;

    use crate::{LatticePoint, LatticeQuotient, Sublattice};

    fn point(dim: usize) -> impl Strategy<Value = LatticePoint> {
        prop::collection::vec(-5i64..=5, dim).prop_map(|c| LatticePoint::from_i64s(&c))
    }

    fn generators() -> impl Strategy<Value = Vec<LatticePoint>> {
        prop::collection::vec(point(3), 0..=3)
    }

    proptest! {
        #[test]
        fn generators_are_contained(gens in generators()) {
            let s = Sublattice::span(3, &gens).unwrap();
            for g in &gens {
                prop_assert!(s.contains(g));
                let coords = s.coordinates(g).unwrap();
                prop_assert_eq!(&s.point_from_coordinates(&coords), g);
            }
        }

        #[test]
        fn saturation_contains_and_is_saturated(gens in generators()) {
            let s = Sublattice::span(3, &gens).unwrap();
            let sat = s.saturation();
            prop_assert_eq!(sat.rank(), s.rank());
            prop_assert!(sat.contains_sublattice(&s));
            prop_assert!(sat.is_saturated());
        }

        #[test]
        fn complement_pairs_to_zero(gens in generators()) {
            let s = Sublattice::span(3, &gens).unwrap();
            let perp = s.orthogonal_complement();
            prop_assert_eq!(perp.rank() + s.rank(), 3);
            for u in perp.basis() {
                for v in s.basis() {
                    prop_assert_eq!(u.dot(&v), Z::new(0));
                }
            }
        }

        #[test]
        fn quotient_kills_sublattice(gens in generators(), v in point(3)) {
            let s = Sublattice::span(3, &gens).unwrap();
            let q = LatticeQuotient::new(&s);
            prop_assert_eq!(q.free_rank(), 3 - s.rank());
            for g in &gens {
                prop_assert!(q.project(g).unwrap().is_zero());
            }
            // Projection is linear, so translating by a generator is invisible.
            if let Some(g) = gens.first() {
                let shifted = &v + g;
                prop_assert_eq!(q.project(&shifted).unwrap(), q.project(&v).unwrap());
            }
        }
    }
}
