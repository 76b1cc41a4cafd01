//! Property-based tests for exact arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{EuclideanDomain, Field, OrderedRing, Ring, Q, Z};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn euclidean_division_reconstructs(a in small_int(), b in non_zero_int()) {
            let (a, b) = (Z::new(a), Z::new(b));
            let (q, r) = a.div_rem(&b);
            prop_assert_eq!(q * b.clone() + r.clone(), a);
            prop_assert!(!r.is_negative());
            prop_assert!(r < b.abs());
        }

        #[test]
        fn extended_gcd_is_bezout(a in small_int(), b in small_int()) {
            let (a, b) = (Z::new(a), Z::new(b));
            let (g, x, y) = a.extended_gcd(&b);
            prop_assert_eq!(a.clone() * x + b.clone() * y, g.clone());
            prop_assert_eq!(g, a.gcd(&b));
        }

        #[test]
        fn gcd_divides_both(a in non_zero_int(), b in non_zero_int()) {
            let (a, b) = (Z::new(a), Z::new(b));
            let g = a.gcd(&b);
            prop_assert!(g.divides(&a));
            prop_assert!(g.divides(&b));
        }

        #[test]
        fn rational_inverse(num in non_zero_int(), den in non_zero_int()) {
            let q = Q::new(num, den);
            let inv = q.inv().unwrap();
            prop_assert!((q * inv).is_one());
        }

        #[test]
        fn rational_integrality(num in small_int(), den in non_zero_int()) {
            let q = Q::new(num, den);
            prop_assert_eq!(q.is_integral(), num % den == 0);
        }
    }
}
