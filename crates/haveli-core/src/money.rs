//! # Money Module
//!
//! Provides the `Money` and `Percent` types for handling monetary values and
//! percentage rates safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A folio is recalculated after every mutation. Accumulating float       │
//! │  error across dozens of line-item and discount edits would make the     │
//! │  grand total drift from what an independent recomputation produces.    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹12.50 = 1250 paise. Percentages are basis points (1000 = 10%),      │
//! │    applied with explicit half-up rounding. Same input, same paisa.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use haveli_core::money::{Money, Percent};
//!
//! let nightly = Money::from_rupees(1200);
//! let two_nights = nightly * 2;                 // ₹2400.00
//! let discount = two_nights.percent_of(Percent::from_bps(1000)); // 10%
//! assert_eq!(discount, Money::from_rupees(240));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative balances are meaningful (overpaid folios)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support, persisted as a bare integer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use haveli_core::money::Money;
    ///
    /// let rate = Money::from_rupees(1200);
    /// assert_eq!(rate.paise(), 120_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes `rate` percent of this amount with half-up rounding.
    ///
    /// Used by the folio recalculation for both the percentage discount and
    /// the tax line:
    /// ```text
    /// subtotal ──► percent_of(discount%) ──► discount portion
    /// after-discount ──► percent_of(tax%) ──► tax amount
    /// ```
    ///
    /// ## Implementation
    /// Integer math in i128 to avoid overflow: `(paise * bps + 5000) / 10000`.
    /// The +5000 rounds the half-paisa boundary up.
    ///
    /// ## Example
    /// ```rust
    /// use haveli_core::money::{Money, Percent};
    ///
    /// let subtotal = Money::from_rupees(2900);
    /// let ten_pct = subtotal.percent_of(Percent::from_bps(1000));
    /// assert_eq!(ten_pct, Money::from_rupees(290));
    /// ```
    pub fn percent_of(&self, rate: Percent) -> Money {
        let portion = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(portion as i64)
    }

    /// Multiplies money by a quantity (line total = unit price × quantity).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10% (a typical folio discount)
/// 1200 bps = 12% (GST on budget hotel rooms)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Percent(u32);

impl Percent {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a rate from a percentage value (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and audit descriptions. UI layers own their own
/// localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for nights / quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over payments and line items.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupees() {
        let money = Money::from_rupees(1200);
        assert_eq!(money.paise(), 120_000);
        assert_eq!(money.rupees(), 1200);
        assert_eq!(money.paise_part(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(109_950)), "₹1099.50");
        assert_eq!(format!("{}", Money::from_rupees(500)), "₹500.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!((a + b).rupees(), 15);
        assert_eq!((a - b).rupees(), 5);
        assert_eq!((a * 3).rupees(), 30);
    }

    #[test]
    fn test_sum() {
        let payments = vec![
            Money::from_rupees(1000),
            Money::from_rupees(610),
            Money::from_rupees(1000),
        ];
        let total: Money = payments.into_iter().sum();
        assert_eq!(total, Money::from_rupees(2610));
    }

    #[test]
    fn test_percent_of_basic() {
        // ₹2900 at 10% = ₹290
        let amount = Money::from_rupees(2900);
        let rate = Percent::from_bps(1000);
        assert_eq!(amount.percent_of(rate), Money::from_rupees(290));
    }

    #[test]
    fn test_percent_of_with_rounding() {
        // ₹10.00 at 8.25% = ₹0.825 → rounds half-up to ₹0.83
        let amount = Money::from_rupees(10);
        let rate = Percent::from_bps(825);
        assert_eq!(amount.percent_of(rate).paise(), 83);
    }

    #[test]
    fn test_percent_from_percentage() {
        assert_eq!(Percent::from_percentage(12.0).bps(), 1200);
        assert_eq!(Percent::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(format!("{}", Percent::from_bps(1000)), "10%");
        assert_eq!(format!("{}", Percent::from_bps(825)), "8.25%");
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_rupees(1200);
        assert_eq!(unit_price.multiply_quantity(2), Money::from_rupees(2400));
    }

    #[test]
    fn test_negative_balance_checks() {
        let overpaid = Money::from_rupees(-150);
        assert!(overpaid.is_negative());
        assert!(!overpaid.is_positive());
        assert!(!overpaid.is_zero());
    }
}
