//! Fixed-point monetary amounts.
//!
//! Prices and report totals are carried as a whole number of minor units
//! (cents), so accumulating thousands of sales never drifts the way `f64`
//! addition would. Parsing accepts the decimal notation used throughout the
//! marketplace ("10", "10.5", "10.50"); anything else is rejected rather
//! than rounded.
//!
//! ```
//! use money::Money;
//!
//! let price: Money = "10.50".parse().unwrap();
//! assert_eq!(price.minor_units(), 1050);
//! assert_eq!(price.to_string(), "10.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An amount of money in minor units (cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor_units(units: i64) -> Self {
        Money(units)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }

    /// Addition that pins at the representable extremes instead of wrapping.
    /// Report totals use this; a saturated total is still ordered correctly
    /// against every real-world amount.
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
    }
}

/// The input was not a plain decimal amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoneyError {
    pub input: String,
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} is not a valid monetary amount", self.input)
    }
}

impl std::error::Error for ParseMoneyError {}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parses `123`, `123.4`, `123.45`, with an optional leading `-`.
    /// More than two fractional digits would silently lose precision, so the
    /// parser refuses them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseMoneyError {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((_, "")) => return Err(error()),
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() || fraction.len() > 2 {
            return Err(error());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(error());
        }

        let whole: i64 = whole.parse().map_err(|_| error())?;
        let mut cents = fraction.parse::<i64>().unwrap_or(0);
        if fraction.len() == 1 {
            cents *= 10;
        }

        let magnitude = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .ok_or_else(error)?;
        Ok(Money(if negative { -magnitude } else { magnitude }))
    }
}
