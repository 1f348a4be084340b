use super::RingElement;

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_traits::Zero;
use rand::distributions::{Distribution, Standard};
use rand::Rng;

/// An element of GF(2): addition is XOR, multiplication is AND.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bit(u8);

impl Bit {
    pub const ZERO: Bit = Bit(0);
    pub const ONE: Bit = Bit(1);

    pub fn new(v: u8) -> Bit {
        debug_assert!(v < 2);
        Bit(v)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl From<bool> for Bit {
    fn from(v: bool) -> Self {
        Bit(v as u8)
    }
}

impl From<Bit> for bool {
    fn from(v: Bit) -> Self {
        v.0 == 1
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Bit {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self(self.0 ^ other.0)
    }
}

impl Sub for Bit {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self(self.0 ^ other.0)
    }
}

impl Mul for Bit {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self(self.0 & other.0)
    }
}

impl Neg for Bit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self
    }
}

impl Zero for Bit {
    fn zero() -> Self {
        Bit::ZERO
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl RingElement for Bit {}

impl Distribution<Bit> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bit {
        Bit::from(rng.gen::<bool>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field() {
        for a in [Bit::ZERO, Bit::ONE] {
            assert_eq!(a + a, Bit::zero());
            assert_eq!(a - a, Bit::zero());
            assert_eq!(-a, a);
            assert_eq!(a * Bit::ONE, a);
            assert_eq!(a * Bit::ZERO, Bit::ZERO);
            for b in [Bit::ZERO, Bit::ONE] {
                let expected = bool::from(a) && bool::from(b);
                assert_eq!(a * b, Bit::from(expected));
                assert_eq!(bool::from(a + b), bool::from(a) != bool::from(b));
            }
        }
    }
}
