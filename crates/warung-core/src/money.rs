//! # Money
//!
//! Rupiah amounts in the smallest currency unit (whole rupiah).
//! Every computation in the engine happens on these integers; display
//! formatting is a presentation concern layered on top and never feeds
//! back into a total.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// An amount of Indonesian rupiah.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rupiah(i64);

impl Rupiah {
    /// Zero rupiah
    pub const ZERO: Rupiah = Rupiah(0);

    /// Create an amount from whole rupiah
    pub fn new(amount: i64) -> Self {
        Rupiah(amount)
    }

    /// Amount in whole rupiah
    pub fn amount(&self) -> i64 {
        self.0
    }

    /// Whether this amount is negative
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Format for display, id-ID style (e.g. "Rp 25.000")
    pub fn display(&self) -> String {
        format!("Rp {}", group_thousands(self.0))
    }
}

/// Group digits with dots every three places, id-ID style.
fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Add for Rupiah {
    type Output = Rupiah;

    fn add(self, rhs: Rupiah) -> Rupiah {
        Rupiah(self.0 + rhs.0)
    }
}

impl AddAssign for Rupiah {
    fn add_assign(&mut self, rhs: Rupiah) {
        self.0 += rhs.0;
    }
}

impl Mul<u32> for Rupiah {
    type Output = Rupiah;

    fn mul(self, quantity: u32) -> Rupiah {
        Rupiah(self.0 * i64::from(quantity))
    }
}

impl Sum for Rupiah {
    fn sum<I: Iterator<Item = Rupiah>>(iter: I) -> Rupiah {
        iter.fold(Rupiah::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formatting() {
        assert_eq!(Rupiah::new(25_000).display(), "Rp 25.000");
        assert_eq!(Rupiah::new(500_000).display(), "Rp 500.000");
        assert_eq!(Rupiah::new(5_000).display(), "Rp 5.000");
        assert_eq!(Rupiah::new(0).display(), "Rp 0");
        assert_eq!(Rupiah::new(999).display(), "Rp 999");
        assert_eq!(Rupiah::new(1_234_567).display(), "Rp 1.234.567");
    }

    #[test]
    fn test_negative_display() {
        assert_eq!(Rupiah::new(-25_000).display(), "Rp -25.000");
    }

    #[test]
    fn test_arithmetic() {
        let total = Rupiah::new(25_000) * 2;
        assert_eq!(total.amount(), 50_000);

        let sum: Rupiah = [Rupiah::new(25_000), Rupiah::new(5_000)].into_iter().sum();
        assert_eq!(sum, Rupiah::new(30_000));
    }

    #[test]
    fn test_ordering() {
        assert!(Rupiah::new(50_000) > Rupiah::new(25_000));
        assert!(Rupiah::new(25_000) <= Rupiah::new(25_000));
    }
}
