//! Property-based tests for polynomial arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use toric_rings::Q;

    use crate::{Monomial, MonomialOrder, SparsePoly};

    fn poly(num_vars: usize) -> impl Strategy<Value = SparsePoly<Q>> {
        prop::collection::vec((prop::collection::vec(0u32..3, num_vars), -4i64..=4), 0..4).prop_map(
            move |terms| {
                SparsePoly::new(
                    terms
                        .into_iter()
                        .map(|(e, c)| (Monomial::from_exponents(&e), Q::from_integer(c)))
                        .collect(),
                    num_vars,
                    MonomialOrder::Grevlex,
                )
            },
        )
    }

    fn point(num_vars: usize) -> impl Strategy<Value = Vec<Q>> {
        prop::collection::vec((-3i64..=3).prop_map(Q::from_integer), num_vars)
    }

    proptest! {
        #[test]
        fn evaluation_is_a_ring_map(p in poly(2), q in poly(2), x in point(2)) {
            prop_assert_eq!(p.add(&q).evaluate(&x), p.evaluate(&x) + q.evaluate(&x));
            prop_assert_eq!(p.mul(&q).evaluate(&x), p.evaluate(&x) * q.evaluate(&x));
        }

        #[test]
        fn substitution_commutes_with_evaluation(
            p in poly(2),
            f in poly(3),
            g in poly(3),
            x in point(3),
        ) {
            let composed = p.substitute(&[f.clone(), g.clone()], 3);
            let inner = [f.evaluate(&x), g.evaluate(&x)];
            prop_assert_eq!(composed.evaluate(&x), p.evaluate(&inner));
        }
    }
}
