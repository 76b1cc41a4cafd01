//! Monomial orderings for polynomial operations.
//!
//! The ordering only fixes how terms are sorted and printed; none of the
//! toric code depends on a particular choice.

use std::cmp::Ordering;

use crate::monomial::{cmp_grevlex, cmp_grlex, cmp_lex, Monomial};

/// A monomial ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MonomialOrder {
    /// Lexicographic order.
    ///
    /// x > y > z means x^a y^b z^c > x^d y^e z^f iff
    /// the first nonzero difference (a-d, b-e, c-f) is positive.
    Lex,

    /// Graded lexicographic order.
    Grlex,

    /// Graded reverse lexicographic order.
    #[default]
    Grevlex,
}

impl MonomialOrder {
    /// Compares two monomials according to this ordering.
    #[must_use]
    pub fn compare(&self, a: &Monomial, b: &Monomial) -> Ordering {
        match self {
            MonomialOrder::Lex => cmp_lex(a, b),
            MonomialOrder::Grlex => cmp_grlex(a, b),
            MonomialOrder::Grevlex => cmp_grevlex(a, b),
        }
    }

    /// Returns a short name for the ordering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            MonomialOrder::Lex => "lex",
            MonomialOrder::Grlex => "grlex",
            MonomialOrder::Grevlex => "grevlex",
        }
    }
}

impl std::fmt::Display for MonomialOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_order() {
        let order = MonomialOrder::Lex;
        let x = Monomial::var(0, 2);
        let y2 = Monomial::var(1, 2).pow(2);

        // x > y^2 in lex (first variable dominates)
        assert_eq!(order.compare(&x, &y2), Ordering::Greater);
        assert_eq!(order.name(), "lex");
    }

    #[test]
    fn test_graded_orders_prefer_degree() {
        let xy = Monomial::from_exponents(&[1, 1]);
        let x = Monomial::var(0, 2);
        assert_eq!(MonomialOrder::Grevlex.compare(&xy, &x), Ordering::Greater);
        assert_eq!(MonomialOrder::Grlex.compare(&xy, &x), Ordering::Greater);
        assert_eq!(MonomialOrder::default().to_string(), "grevlex");
    }
}
