//! Compile-time unit safety for transmission-line quantities.
//!
//! Prevents mixing incompatible units like kilometers and miles, or
//! kilovolts and megawatts. All types use `#[repr(transparent)]` so they
//! have the same memory layout as `f64`; the compiler optimizes away the
//! wrapper.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Kilometers per mile, i.e. miles = km * MILES_PER_KM.
pub const MILES_PER_KM: f64 = 0.621_371;

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.4} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Line-to-line voltage in kilovolts (kV)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilovolts(pub f64);

impl_unit_ops!(Kilovolts, "kV");

/// Planar length in kilometers (km)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(pub f64);

impl_unit_ops!(Kilometers, "km");

impl Kilometers {
    /// Convert to statute miles.
    #[inline]
    pub fn to_miles(self) -> Miles {
        Miles(self.0 * MILES_PER_KM)
    }
}

/// Planar length in statute miles (mi)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Miles(pub f64);

impl_unit_ops!(Miles, "mi");

/// Deliverable power in megawatts (MW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl_unit_ops!(Megawatts, "MW");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_km_to_miles() {
        let km = Kilometers(100.0);
        let mi = km.to_miles();
        assert!((mi.value() - 62.1371).abs() < 1e-9);
    }

    #[test]
    fn test_unit_arithmetic() {
        let total = Kilometers(1.5) + Kilometers(2.5);
        assert_eq!(total, Kilometers(4.0));
        let ratio = Kilovolts(500.0) / Kilovolts(250.0);
        assert_eq!(ratio, 2.0);
    }

    #[test]
    fn test_sum_over_iterator() {
        let lengths = [Kilometers(1.0), Kilometers(2.0), Kilometers(3.0)];
        let total: Kilometers = lengths.iter().sum();
        assert_eq!(total, Kilometers(6.0));
    }
}
