//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Prices arrive from the frontend as JSON floats:                        │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Floats are rounded to cents once, at the JSON boundary.              │
//! │    Totals and change due are then exact.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Reading
//! Records written by older app versions carry prices typed into a text
//! field, so `preco` may be `12.5`, `"12.50"`, `"12,50"`, `""` or missing.
//! Anything that is not a number reads as zero.
//!
//! ## Overflow
//! Arithmetic saturates at the `i64` bounds. A corrupt stored price never
//! panics a total, it pins it.
//!
//! ## Usage
//! ```rust
//! use comanda_core::money::Money;
//!
//! let price = Money::from_cents(1000); // 10.00
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.to_string(), "20.00");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents (centavos).
///
/// Serialized as a JSON number in major units (`10.5`), so the stored
/// format stays what the mobile frontend already writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -5.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        let major = major.saturating_mul(100);
        if major < 0 {
            Money(major.saturating_sub(minor))
        } else {
            Money(major.saturating_add(minor))
        }
    }

    /// Converts a float amount in major units, rounding to the nearest cent.
    ///
    /// Non-finite input is zero. Out-of-range input saturates.
    pub fn from_major_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Parses a user-typed amount (`"30"`, `"12.50"`, `"12,50"`).
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// assert_eq!(Money::parse("12,50"), Some(Money::from_cents(1250)));
    /// assert_eq!(Money::parse("abc"), None);
    /// assert_eq!(Money::parse(""), None);
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().replace(',', ".");
        if normalized.is_empty() {
            return None;
        }
        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Money::from_major_f64)
    }

    /// Reads an amount from any JSON value; non-numeric values are zero.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Money::from_major_f64).unwrap_or_default(),
            serde_json::Value::String(s) => Money::parse(s).unwrap_or_default(),
            _ => Money::zero(),
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn whole(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value in major units as a float (for the wire format only).
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Money::from_json(&value))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimal places, no currency symbol (`25.00`, `-5.50`).
///
/// The symbol is a display setting, applied by the caller.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.whole().abs(), self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
