//! Monomials over an arbitrary number of variables.
//!
//! Cox rings have one variable per ray, so the variable count is not
//! bounded; exponents live inline for the common small cases.

use std::cmp::Ordering;

use smallvec::SmallVec;

type Exponents = SmallVec<[u32; 8]>;

/// A monomial `x_0^{e_0} ⋯ x_{n-1}^{e_{n-1}}`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Monomial {
    exps: Exponents,
}

impl Monomial {
    /// Creates the monomial 1 (all exponents zero).
    #[must_use]
    pub fn one(num_vars: usize) -> Self {
        Self {
            exps: SmallVec::from_elem(0, num_vars),
        }
    }

    /// Creates the monomial x_i.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_vars`.
    #[must_use]
    pub fn var(i: usize, num_vars: usize) -> Self {
        assert!(i < num_vars);
        let mut m = Self::one(num_vars);
        m.exps[i] = 1;
        m
    }

    /// Creates a monomial from exponents.
    #[must_use]
    pub fn from_exponents(exps: &[u32]) -> Self {
        Self {
            exps: SmallVec::from_slice(exps),
        }
    }

    /// Number of variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.exps.len()
    }

    /// Returns the exponent of variable i.
    #[must_use]
    pub fn exponent(&self, i: usize) -> u32 {
        self.exps[i]
    }

    /// Returns all exponents.
    #[must_use]
    pub fn exponents(&self) -> &[u32] {
        &self.exps
    }

    /// True for the monomial 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.exps.iter().all(|&e| e == 0)
    }

    /// Multiplies two monomials (adds exponents).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        debug_assert_eq!(self.num_vars(), other.num_vars());
        Self {
            exps: self.exps.iter().zip(&other.exps).map(|(a, b)| a + b).collect(),
        }
    }

    /// Raises to the power `k`.
    #[must_use]
    pub fn pow(&self, k: u32) -> Self {
        Self {
            exps: self.exps.iter().map(|e| e * k).collect(),
        }
    }

    /// Divides by another monomial if possible.
    #[must_use]
    pub fn div(&self, other: &Self) -> Option<Self> {
        if !other.divides(self) {
            return None;
        }
        Some(Self {
            exps: self.exps.iter().zip(&other.exps).map(|(a, b)| a - b).collect(),
        })
    }

    /// Returns true if self divides other.
    #[must_use]
    pub fn divides(&self, other: &Self) -> bool {
        self.exps.iter().zip(&other.exps).all(|(a, b)| a <= b)
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.exps.iter().sum()
    }

    /// Renders the monomial with the given variable names.
    ///
    /// Missing names fall back to `x{i}`.
    #[must_use]
    pub fn format_with(&self, names: &[String]) -> String {
        let mut parts = Vec::new();
        for (i, &e) in self.exps.iter().enumerate() {
            if e == 0 {
                continue;
            }
            let name = names.get(i).cloned().unwrap_or_else(|| format!("x{i}"));
            if e == 1 {
                parts.push(name);
            } else {
                parts.push(format!("{name}^{e}"));
            }
        }

        if parts.is_empty() {
            "1".to_string()
        } else {
            parts.join("*")
        }
    }
}

impl std::fmt::Display for Monomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_with(&[]))
    }
}

/// Compares two monomials lexicographically.
#[must_use]
pub fn cmp_lex(a: &Monomial, b: &Monomial) -> Ordering {
    a.exps.iter().cmp(b.exps.iter())
}

/// Compares two monomials by graded reverse lexicographic order.
#[must_use]
pub fn cmp_grevlex(a: &Monomial, b: &Monomial) -> Ordering {
    match a.total_degree().cmp(&b.total_degree()) {
        Ordering::Equal => {}
        ord => return ord,
    }

    // Then compare in reverse order, reversed
    for (x, y) in a.exps.iter().zip(&b.exps).rev() {
        match y.cmp(x) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Compares two monomials by graded lexicographic order.
#[must_use]
pub fn cmp_grlex(a: &Monomial, b: &Monomial) -> Ordering {
    match a.total_degree().cmp(&b.total_degree()) {
        Ordering::Equal => cmp_lex(a, b),
        ord => ord,
    }
}
