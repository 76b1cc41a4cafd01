//! Property-based tests for cones.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::Cone;
    use toric_lattice::LatticePoint;

    fn point() -> impl Strategy<Value = LatticePoint> {
        prop::collection::vec(-3i64..=3, 3).prop_map(|c| LatticePoint::from_i64s(&c))
    }

    fn cone() -> impl Strategy<Value = Cone> {
        prop::collection::vec(point(), 0..=4).prop_map(|gens| Cone::new(3, gens).unwrap())
    }

    proptest! {
        #[test]
        fn generators_lie_in_cone(gens in prop::collection::vec(point(), 0..=4)) {
            let c = Cone::new(3, gens.clone()).unwrap();
            for g in &gens {
                prop_assert!(c.contains(g));
            }
            prop_assert!(c.contains(&c.relative_interior_point()));
        }

        #[test]
        fn facet_normals_are_tight_somewhere(c in cone()) {
            for u in c.facet_normals() {
                for r in c.rays() {
                    prop_assert!(u.dot(r) >= toric_rings::Z::new(0));
                }
            }
            prop_assert_eq!(c.dim() + c.orthogonal_sublattice().rank(), 3);
        }

        #[test]
        fn faces_are_faces(c in cone()) {
            prop_assume!(c.is_strictly_convex());
            for f in c.faces() {
                prop_assert!(f.is_face_of(&c));
                prop_assert!(c.contains_cone(&f));
            }
        }

        #[test]
        fn intersection_is_contained_in_both(a in cone(), b in cone()) {
            let common = a.intersection(&b).unwrap();
            prop_assert!(a.contains_cone(&common));
            prop_assert!(b.contains_cone(&common));
        }
    }
}
