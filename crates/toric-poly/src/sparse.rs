//! Sparse multivariate polynomials.
//!
//! This module provides sparse polynomial representation for
//! efficient handling of polynomials with few non-zero terms.

use std::fmt::Display;

use toric_rings::traits::Ring;

use crate::monomial::Monomial;
use crate::ordering::MonomialOrder;

/// A sparse multivariate polynomial.
///
/// Terms are stored as (monomial, coefficient) pairs, sorted by
/// the monomial ordering with the leading term first.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SparsePoly<R: Ring> {
    /// Terms in sorted order (by monomial ordering).
    terms: Vec<(Monomial, R)>,
    /// Number of variables.
    num_vars: usize,
    /// Monomial ordering used for sorting.
    order: MonomialOrder,
}

impl<R: Ring> SparsePoly<R> {
    /// Creates a new polynomial from terms.
    ///
    /// Terms are automatically sorted and combined.
    #[must_use]
    pub fn new(terms: Vec<(Monomial, R)>, num_vars: usize, order: MonomialOrder) -> Self {
        debug_assert!(terms.iter().all(|(m, _)| m.num_vars() == num_vars));
        let mut poly = Self {
            terms,
            num_vars,
            order,
        };
        poly.normalize();
        poly
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero(num_vars: usize, order: MonomialOrder) -> Self {
        Self {
            terms: Vec::new(),
            num_vars,
            order,
        }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one(num_vars: usize, order: MonomialOrder) -> Self {
        Self::constant(R::one(), num_vars, order)
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: R, num_vars: usize, order: MonomialOrder) -> Self {
        Self::term(Monomial::one(num_vars), c, order)
    }

    /// Creates a single variable x_i.
    #[must_use]
    pub fn var(i: usize, num_vars: usize, order: MonomialOrder) -> Self {
        Self::term(Monomial::var(i, num_vars), R::one(), order)
    }

    /// Creates the single term `c · m`.
    #[must_use]
    pub fn term(m: Monomial, c: R, order: MonomialOrder) -> Self {
        let num_vars = m.num_vars();
        if c.is_zero() {
            Self::zero(num_vars, order)
        } else {
            Self {
                terms: vec![(m, c)],
                num_vars,
                order,
            }
        }
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the monomial ordering.
    #[must_use]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Returns the terms.
    #[must_use]
    pub fn terms(&self) -> &[(Monomial, R)] {
        &self.terms
    }

    /// Returns the only term of a single-term polynomial.
    #[must_use]
    pub fn as_term(&self) -> Option<(&Monomial, &R)> {
        match self.terms.as_slice() {
            [(m, c)] => Some((m, c)),
            _ => None,
        }
    }

    /// Returns true for a constant, including zero.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.iter().all(|(m, _)| m.is_one())
    }

    /// Sorts terms and combines like terms.
    fn normalize(&mut self) {
        let order = self.order;
        // Sort by monomial order (descending for leading term first)
        self.terms.sort_by(|a, b| order.compare(&b.0, &a.0));

        let mut merged: Vec<(Monomial, R)> = Vec::with_capacity(self.terms.len());
        for (m, c) in self.terms.drain(..) {
            if let Some((last, acc)) = merged.last_mut() {
                if *last == m {
                    *acc = acc.clone() + c;
                    continue;
                }
            }
            merged.push((m, c));
        }
        merged.retain(|(_, c)| !c.is_zero());
        self.terms = merged;
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.num_vars, other.num_vars);

        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());

        Self::new(terms, self.num_vars, self.order)
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c.clone())).collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two polynomials (schoolbook algorithm).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.num_vars, other.num_vars);

        if self.is_zero() || other.is_zero() {
            return Self::zero(self.num_vars, self.order);
        }

        let mut terms = Vec::with_capacity(self.len() * other.len());
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                terms.push((m1.mul(m2), c1.clone() * c2.clone()));
            }
        }

        Self::new(terms, self.num_vars, self.order)
    }

    /// Raises to a non-negative power by repeated squaring.
    #[must_use]
    pub fn pow(&self, mut k: u32) -> Self {
        if let Some((m, c)) = self.as_term() {
            return Self::term(m.pow(k), c.pow(k), self.order);
        }
        let mut result = Self::one(self.num_vars, self.order);
        let mut base = self.clone();
        while k > 0 {
            if k & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.mul(&base);
            k >>= 1;
        }
        result
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero(self.num_vars, self.order);
        }

        Self {
            terms: self.terms.iter().map(|(m, x)| (m.clone(), x.clone() * c.clone())).collect(),
            num_vars: self.num_vars,
            order: self.order,
        }
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// Evaluates at a point.
    ///
    /// # Panics
    ///
    /// Panics if `point` does not have one value per variable.
    #[must_use]
    pub fn evaluate(&self, point: &[R]) -> R {
        assert_eq!(point.len(), self.num_vars);
        self.terms.iter().fold(R::zero(), |acc, (m, c)| {
            let value = m
                .exponents()
                .iter()
                .zip(point)
                .filter(|(e, _)| **e > 0)
                .fold(c.clone(), |v, (&e, x)| v * x.pow(e));
            acc + value
        })
    }

    /// Substitutes `images[i]` for `x_i`.
    ///
    /// All images must live in a ring with `target_vars` variables; the
    /// result lives there too.
    ///
    /// # Panics
    ///
    /// Panics if there is not one image per variable.
    #[must_use]
    pub fn substitute(&self, images: &[Self], target_vars: usize) -> Self {
        assert_eq!(images.len(), self.num_vars);
        debug_assert!(images.iter().all(|p| p.num_vars == target_vars));

        let mut result = Self::zero(target_vars, self.order);
        for (m, c) in &self.terms {
            let mut term = Self::constant(c.clone(), target_vars, self.order);
            for (&e, image) in m.exponents().iter().zip(images) {
                if e > 0 {
                    term = term.mul(&image.pow(e));
                }
            }
            result = result.add(&term);
        }
        result
    }
}

impl<R: Ring + Display> SparsePoly<R> {
    /// Renders the polynomial with the given variable names.
    #[must_use]
    pub fn format_with(&self, names: &[String]) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        let mut out = String::new();
        for (i, (m, c)) in self.terms.iter().enumerate() {
            let mon = m.format_with(names);
            let minus_one = -R::one();
            let term = if m.is_one() {
                c.to_string()
            } else if c.is_one() {
                mon
            } else if *c == minus_one {
                format!("-{mon}")
            } else {
                format!("{c}*{mon}")
            };

            match (i, term.strip_prefix('-')) {
                (0, _) => out.push_str(&term),
                (_, Some(rest)) => {
                    out.push_str(" - ");
                    out.push_str(rest);
                }
                (_, None) => {
                    out.push_str(" + ");
                    out.push_str(&term);
                }
            }
        }
        out
    }
}

impl<R: Ring + Display> std::fmt::Display for SparsePoly<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_with(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toric_rings::rationals::Q;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_sparse_basic() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);

        let sum = x.add(&y);
        assert_eq!(sum.len(), 2);
        assert!(sum.sub(&x).sub(&y).is_zero());
    }

    #[test]
    fn test_sparse_mul() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let one = SparsePoly::one(2, order);

        // (x + 1)^2 = x^2 + 2x + 1
        let xp1 = x.add(&one);
        let sq = xp1.mul(&xp1);
        assert_eq!(sq.len(), 3);
        assert_eq!(xp1.pow(2), sq);
        assert_eq!(sq.total_degree(), 2);
    }

    #[test]
    fn test_evaluate() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let y = SparsePoly::<Q>::var(1, 2, order);
        // x^2 y - 3
        let p = x.pow(2).mul(&y).sub(&SparsePoly::constant(Q::from_integer(3), 2, order));
        let value = p.evaluate(&[Q::from_integer(2), Q::new(1, 2)]);
        assert_eq!(value, Q::from_integer(-1));
    }

    #[test]
    fn test_substitute() {
        let order = MonomialOrder::Grevlex;
        // p(u, v) = u^2 v, with u = s*t and v = t
        let u = SparsePoly::<Q>::var(0, 2, order);
        let v = SparsePoly::<Q>::var(1, 2, order);
        let p = u.pow(2).mul(&v);

        let s = SparsePoly::<Q>::var(0, 2, order);
        let t = SparsePoly::<Q>::var(1, 2, order);
        let composed = p.substitute(&[s.mul(&t), t.clone()], 2);
        assert_eq!(composed, s.pow(2).mul(&t.pow(3)));

        let constant = SparsePoly::<Q>::one(0, order);
        assert_eq!(constant.substitute(&[], 3), SparsePoly::one(3, order));
    }

    #[test]
    fn test_as_term() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Q>::var(0, 2, order);
        let cube = x.pow(3);
        let (m, c) = cube.as_term().unwrap();
        assert_eq!(m.exponents(), &[3, 0]);
        assert_eq!(*c, Q::from_integer(1));
        assert!(x.add(&SparsePoly::one(2, order)).as_term().is_none());
        assert!(SparsePoly::<Q>::one(2, order).is_constant());
    }

    #[test]
    fn test_format() {
        let order = MonomialOrder::Grevlex;
        let z0 = SparsePoly::<Q>::var(0, 2, order);
        let z1 = SparsePoly::<Q>::var(1, 2, order);
        let p = z0.pow(2).sub(&z1.scale(&Q::from_integer(3))).add(&SparsePoly::one(2, order));
        assert_eq!(p.format_with(&names(&["z0", "z1"])), "z0^2 - 3*z1 + 1");
        assert_eq!(z1.neg().format_with(&names(&["a", "b"])), "-b");
        assert_eq!(SparsePoly::<Q>::zero(2, order).to_string(), "0");
    }
}
