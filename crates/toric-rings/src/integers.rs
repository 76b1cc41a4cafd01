//! The ring of integers Z.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use dashu::base::{Abs, Gcd, Signed};
use dashu::integer::IBig;

use crate::traits::{CommutativeRing, EuclideanDomain, IntegralDomain, OrderedRing, Ring};

/// An arbitrary precision integer.
///
/// Division follows the Euclidean convention: the remainder of `a / b` is
/// always in `[0, |b|)`. Lattice reductions (Hermite normal form, primitive
/// vectors) rely on that.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Z(IBig);

impl Z {
    /// Creates a new integer.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Attempts to convert to an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Attempts to convert to a u32 exponent.
    #[must_use]
    pub fn to_u32(&self) -> Option<u32> {
        self.0.clone().try_into().ok()
    }

    /// Returns the non-negative greatest common divisor of a slice.
    ///
    /// The gcd of an empty or all-zero slice is zero.
    #[must_use]
    pub fn gcd_all(values: &[Z]) -> Z {
        values
            .iter()
            .fold(<Z as Ring>::zero(), |acc, v| EuclideanDomain::gcd(&acc, v))
    }

    /// Exact division; the caller guarantees `other` divides `self`.
    #[must_use]
    pub fn exact_div(&self, other: &Self) -> Self {
        debug_assert!(other.divides(self), "{other} does not divide {self}");
        Self(&self.0 / &other.0)
    }
}

impl Ring for Z {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl CommutativeRing for Z {}
impl IntegralDomain for Z {}

impl EuclideanDomain for Z {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        assert!(!other.is_zero(), "division by zero");
        let mut q = &self.0 / &other.0;
        let mut r = &self.0 - &q * &other.0;
        // Normalize whatever rounding dashu used to a remainder in [0, |b|).
        while Signed::is_negative(&r) {
            if Signed::is_positive(&other.0) {
                q -= IBig::ONE;
                r += &other.0;
            } else {
                q += IBig::ONE;
                r -= &other.0;
            }
        }
        let modulus = other.0.clone().abs();
        while r >= modulus {
            if Signed::is_positive(&other.0) {
                q += IBig::ONE;
            } else {
                q -= IBig::ONE;
            }
            r -= &modulus;
        }
        (Self(q), Self(r))
    }

    fn gcd(&self, other: &Self) -> Self {
        // dashu rejects gcd(0, 0), and gcd(0, b) = |b| anyway.
        if self.is_zero() {
            return OrderedRing::abs(other);
        }
        if other.is_zero() {
            return OrderedRing::abs(self);
        }
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        let mut old_r = self.clone();
        let mut r = other.clone();
        let mut old_s = Self::one();
        let mut s = Self::zero();
        let mut old_t = Self::zero();
        let mut t = Self::one();

        while !r.is_zero() {
            let (q, rem) = old_r.div_rem(&r);
            old_r = r;
            r = rem;

            let new_s = old_s - q.clone() * s.clone();
            old_s = s;
            s = new_s;

            let new_t = old_t - q * t.clone();
            old_t = t;
            t = new_t;
        }

        // Keep the gcd non-negative.
        if old_r.is_negative() {
            (-old_r, -old_s, -old_t)
        } else {
            (old_r, old_s, old_t)
        }
    }
}

impl OrderedRing for Z {
    fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if Signed::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }
}

impl num_traits::Zero for Z {
    fn zero() -> Self {
        <Self as Ring>::zero()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl num_traits::One for Z {
    fn one() -> Self {
        <Self as Ring>::one()
    }
}

impl Add for Z {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add for &Z {
    type Output = Z;

    fn add(self, rhs: Self) -> Self::Output {
        Z(&self.0 + &rhs.0)
    }
}

impl Sub for Z {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub for &Z {
    type Output = Z;

    fn sub(self, rhs: Self) -> Self::Output {
        Z(&self.0 - &rhs.0)
    }
}

impl Mul for Z {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul for &Z {
    type Output = Z;

    fn mul(self, rhs: Self) -> Self::Output {
        Z(&self.0 * &rhs.0)
    }
}

impl Neg for Z {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Z {
    type Output = Z;

    fn neg(self) -> Self::Output {
        Z(-&self.0)
    }
}

impl From<i64> for Z {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Z {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<u32> for Z {
    fn from(value: u32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<IBig> for Z {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Z {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Z {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
