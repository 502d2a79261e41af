//! Exact monetary amounts in the ledger's smallest denomination.
//!
//! Human-readable decimal strings are scaled to integers without ever going
//! through floating point, so `"0.1"` becomes exactly `100_000_000_000_000_000`
//! wei and formats back to `"0.1"`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Decimal places of the ledger's native currency (wei per ether).
pub const NATIVE_DECIMALS: u32 = 18;

/// An amount in smallest-denomination integer units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw smallest-denomination value.
    #[must_use]
    pub const fn from_units(units: u128) -> Self {
        Self(units)
    }

    /// Raw smallest-denomination value.
    #[must_use]
    pub const fn units(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parse a strictly positive decimal string, scaling by `decimals`.
    ///
    /// `field` names the input in the returned error.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidNumber`] when the input is not a decimal number
    /// - [`ValidationError::NonPositive`] for zero or negative values
    /// - [`ValidationError::TooPrecise`] when it has more than `decimals` fractional digits
    /// - [`ValidationError::Overflow`] when the scaled value does not fit
    pub fn parse_positive(
        input: &str,
        field: &'static str,
        decimals: u32,
    ) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let value = Decimal::from_str_exact(trimmed).map_err(|_| {
            if !looks_numeric(trimmed) {
                ValidationError::InvalidNumber {
                    field,
                    value: input.to_string(),
                }
            } else if fraction_digits(trimmed) > decimals as usize {
                ValidationError::TooPrecise {
                    field,
                    max_decimals: decimals,
                }
            } else if trimmed.starts_with('-') {
                ValidationError::NonPositive { field }
            } else {
                ValidationError::Overflow { field }
            }
        })?;

        if value <= Decimal::ZERO {
            return Err(ValidationError::NonPositive { field });
        }

        let value = value.normalize();
        let scale = value.scale();
        if scale > decimals {
            return Err(ValidationError::TooPrecise {
                field,
                max_decimals: decimals,
            });
        }

        let mantissa = u128::try_from(value.mantissa())
            .map_err(|_| ValidationError::NonPositive { field })?;
        10u128
            .checked_pow(decimals - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
            .map(Self)
            .ok_or(ValidationError::Overflow { field })
    }

    /// Parse a native-currency amount (18 decimals).
    ///
    /// # Errors
    ///
    /// See [`Amount::parse_positive`].
    pub fn parse_native(input: &str, field: &'static str) -> Result<Self, ValidationError> {
        Self::parse_positive(input, field, NATIVE_DECIMALS)
    }

    /// Format as a human-readable decimal with `decimals` fractional places,
    /// trailing zeros removed.
    #[must_use]
    pub fn format_units(self, decimals: u32) -> String {
        let Some(factor) = 10u128.checked_pow(decimals) else {
            return self.0.to_string();
        };
        let whole = self.0 / factor;
        let fraction = self.0 % factor;
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{fraction:0>width$}", width = decimals as usize);
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }

    /// Format as native currency (18 decimals).
    #[must_use]
    pub fn format_native(self) -> String {
        self.format_units(NATIVE_DECIMALS)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    /// Parses a native-currency decimal string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_native(s, "amount")
    }
}

/// Significant fractional digits, ignoring trailing zeros.
fn fraction_digits(input: &str) -> usize {
    input.split_once('.').map_or(0, |(_, fraction)| {
        fraction
            .trim_end_matches(['0', '_'])
            .chars()
            .filter(char::is_ascii_digit)
            .count()
    })
}

fn looks_numeric(input: &str) -> bool {
    let digits = input.strip_prefix(['+', '-']).unwrap_or(input);
    let mut seen_point = false;
    let mut seen_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            '_' => {}
            _ => return false,
        }
    }
    seen_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn parses_fractional_native_amounts_exactly() {
        let amount = Amount::parse_native("0.1", "amount").unwrap();
        assert_eq!(amount.units(), ONE_ETHER / 10);
        assert_eq!(amount.format_native(), "0.1");
    }

    #[test]
    fn formats_whole_and_tiny_amounts() {
        assert_eq!(Amount::from_units(5 * ONE_ETHER).format_native(), "5");
        assert_eq!(Amount::from_units(1).format_native(), "0.000000000000000001");
        assert_eq!(Amount::ZERO.format_native(), "0");
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        let amount = Amount::parse_positive("1.500", "threshold", 1).unwrap();
        assert_eq!(amount.units(), 15);
    }

    #[test]
    fn rejects_malformed_and_non_positive_input() {
        assert!(matches!(
            Amount::parse_native("abc", "amount"),
            Err(ValidationError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Amount::parse_native("", "amount"),
            Err(ValidationError::InvalidNumber { .. })
        ));
        assert_eq!(
            Amount::parse_native("-1", "amount"),
            Err(ValidationError::NonPositive { field: "amount" })
        );
        assert_eq!(
            Amount::parse_native("0", "amount"),
            Err(ValidationError::NonPositive { field: "amount" })
        );
    }

    #[test]
    fn rejects_more_decimals_than_the_denomination() {
        assert_eq!(
            Amount::parse_native("0.0000000000000000001", "amount"),
            Err(ValidationError::TooPrecise {
                field: "amount",
                max_decimals: 18
            })
        );
    }

    #[test]
    fn precision_beyond_decimal_range_is_too_precise() {
        assert_eq!(
            Amount::parse_native("0.00000000000000000000000000001", "amount"),
            Err(ValidationError::TooPrecise {
                field: "amount",
                max_decimals: 18
            })
        );
        assert_eq!(
            Amount::parse_positive("1.000000000000000000000000000001", "threshold", 0),
            Err(ValidationError::TooPrecise {
                field: "threshold",
                max_decimals: 0
            })
        );
    }

    #[test]
    fn rejects_amounts_that_overflow_after_scaling() {
        let huge = "9".repeat(27);
        assert_eq!(
            Amount::parse_native(&huge, "amount"),
            Err(ValidationError::Overflow { field: "amount" })
        );
    }

    #[test]
    fn round_trips_every_precision_level() {
        for input in ["1", "0.5", "12.345", "0.000000000000000001", "1000000.000001"] {
            let amount = Amount::parse_native(input, "amount").unwrap();
            assert_eq!(amount.format_native(), input);
        }
    }
}
