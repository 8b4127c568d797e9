//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that category and daily sums
//! are exact. Statistics and forecasts work on `f64` via [`Money::to_f64`].

use std::fmt;

use thiserror::Error;

/// Largest magnitude accepted from any input, in cents
const MAX_CENTS: i64 = 90_000_000_000_000_000;

/// The same bound in currency units, for floating point input
const MAX_UNITS: f64 = MAX_CENTS as f64 / 100.0;

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use budget_insights::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from a floating point value, rounding to the nearest cent
    ///
    /// Non-finite and out-of-range values are rejected.
    pub fn from_f64(value: f64) -> Result<Self, MoneyParseError> {
        if !value.is_finite() {
            return Err(MoneyParseError::NotFinite);
        }
        if value.abs() > MAX_UNITS {
            return Err(MoneyParseError::OutOfRange(value.to_string()));
        }
        Ok(Self((value * 100.0).round() as i64))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Amount in currency units as a float
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Add two amounts, returning `None` on overflow
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Sum amounts, returning `None` if the total overflows
    pub fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |total, amount| total.checked_add(amount))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10.50", "-10.50", "$10.50", "10", ".5" and exponent forms
    /// such as "1e3". Decimal input is parsed exactly and rounded half away
    /// from zero to the nearest cent, like [`Money::from_f64`].
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        // Handle negative sign at start
        let (negative, unsigned) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s.strip_prefix('+').unwrap_or(s))
        };

        // Remove currency symbol if present
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

        let cents = match parse_decimal_cents(unsigned) {
            Some(cents) if cents > MAX_CENTS => {
                return Err(MoneyParseError::OutOfRange(s.to_string()))
            }
            Some(cents) => cents,
            None if is_decimal(unsigned) => {
                return Err(MoneyParseError::OutOfRange(s.to_string()))
            }
            None => {
                // Fall back to float syntax (exponents); rejects "nan"/"inf"
                let value: f64 = unsigned
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;
                Self::from_f64(value)?.cents()
            }
        };

        Ok(Self(if negative { -cents } else { cents }))
    }
}

fn split_decimal(s: &str) -> (&str, &str) {
    s.split_once('.').unwrap_or((s, ""))
}

/// Whether `s` is plain decimal digits ("10", "10.5", ".25")
fn is_decimal(s: &str) -> bool {
    let (whole, frac) = split_decimal(s);
    !(whole.is_empty() && frac.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && frac.chars().all(|c| c.is_ascii_digit())
}

/// Parse plain decimal digits into cents; `None` if not decimal or too large for i64
fn parse_decimal_cents(s: &str) -> Option<i64> {
    if !is_decimal(s) {
        return None;
    }
    let (whole, frac) = split_decimal(s);
    let digit = |i: usize| frac.as_bytes().get(i).map_or(0, |b| i64::from(b - b'0'));

    let dollars: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents = digit(0) * 10 + digit(1);
    let round_up = i64::from(digit(2) >= 5);

    dollars.checked_mul(100)?.checked_add(cents + round_up)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

/// Error type for money parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("Invalid money format: {0}")]
    InvalidFormat(String),

    #[error("Amount is not a finite number")]
    NotFinite,

    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}
