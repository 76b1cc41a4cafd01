//! The field of rational numbers Q.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use dashu::base::{Inverse, Signed, UnsignedAbs};
use dashu::integer::IBig;
use dashu::rational::RBig;

use crate::integers::Z;
use crate::traits::{CommutativeRing, EuclideanDomain, Field, IntegralDomain, OrderedRing, Ring};

/// An arbitrary precision rational number.
///
/// Rationals are always stored in lowest terms with a positive denominator.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Q(RBig);

impl Q {
    /// Creates a new rational from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Self {
        Self::from_parts(&Z::new(num), &Z::new(den))
    }

    /// Creates a rational from integer numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn from_parts(num: &Z, den: &Z) -> Self {
        assert!(!den.is_zero(), "denominator cannot be zero");
        let sign_flip = den.is_negative();
        let value = RBig::from_parts(num.as_inner().clone(), den.as_inner().clone().unsigned_abs());
        if sign_flip {
            Self(-value)
        } else {
            Self(value)
        }
    }

    /// Creates a rational from an integer.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self(RBig::from(IBig::from(n)))
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> Z {
        Z::from(self.0.numerator().clone())
    }

    /// Returns the (positive) denominator.
    #[must_use]
    pub fn denominator(&self) -> Z {
        Z::from(IBig::from(self.0.denominator().clone()))
    }

    /// Returns true if this rational is an integer.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Converts to an integer if the denominator is 1.
    #[must_use]
    pub fn to_integer(&self) -> Option<Z> {
        if self.is_integral() {
            Some(self.numerator())
        } else {
            None
        }
    }

    /// Returns the reciprocal (1/x).
    ///
    /// # Panics
    ///
    /// Panics if the rational is zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        assert!(!self.is_zero(), "cannot take reciprocal of zero");
        Self(Inverse::inv(self.0.clone()))
    }

    /// Returns the inner `dashu::RBig`.
    #[must_use]
    pub fn as_inner(&self) -> &RBig {
        &self.0
    }
}

impl Ring for Q {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl CommutativeRing for Q {}
impl IntegralDomain for Q {}

impl EuclideanDomain for Q {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        // Division is exact in a field.
        (Self(&self.0 / &other.0), Self::zero())
    }

    fn gcd(&self, other: &Self) -> Self {
        if self.is_zero() && other.is_zero() {
            Self::zero()
        } else {
            Self::one()
        }
    }

    fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        if !self.is_zero() {
            (Self::one(), self.recip(), Self::zero())
        } else if !other.is_zero() {
            (Self::one(), Self::zero(), other.recip())
        } else {
            (Self::zero(), Self::zero(), Self::zero())
        }
    }
}

impl Field for Q {
    fn inv(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.recip())
        }
    }
}

impl OrderedRing for Q {
    fn abs(&self) -> Self {
        if Signed::is_negative(&self.0) {
            Self(-self.0.clone())
        } else {
            self.clone()
        }
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

impl num_traits::Zero for Q {
    fn zero() -> Self {
        <Self as Ring>::zero()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl num_traits::One for Q {
    fn one() -> Self {
        <Self as Ring>::one()
    }
}

impl Add for Q {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Q {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Q {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Neg for Q {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<i64> for Q {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<&Z> for Q {
    fn from(value: &Z) -> Self {
        Self(RBig::from(value.as_inner().clone()))
    }
}

impl From<Z> for Q {
    fn from(value: Z) -> Self {
        Self(RBig::from(value.into_inner()))
    }
}

impl fmt::Debug for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_laws() {
        let a = Q::new(2, 3);
        let b = Q::new(3, 4);

        assert_eq!(a.clone() + b.clone(), Q::new(17, 12));
        assert_eq!(a * b, Q::new(1, 2));
    }

    #[test]
    fn test_negative_denominator() {
        assert_eq!(Q::new(1, -2), Q::new(-1, 2));
        assert_eq!(Q::new(-4, -6), Q::new(2, 3));
    }

    #[test]
    fn test_integrality() {
        assert_eq!(Q::new(6, 3).to_integer(), Some(Z::new(2)));
        assert!(Q::new(1, 2).to_integer().is_none());
        assert_eq!(Q::new(-1, 2).denominator(), Z::new(2));
    }

    #[test]
    fn test_inverse() {
        let a = Q::new(3, 5);
        let inv = a.inv().unwrap();
        assert!((a * inv).is_one());
        assert!(Q::zero().inv().is_none());
    }
}
