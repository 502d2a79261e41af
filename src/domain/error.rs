//! Validation errors for bet lifecycle requests.
//!
//! These errors are produced before any external call is made. They are
//! reported to the user as-is and never retried automatically.
//!
//! # Examples
//!
//! ```
//! use wagerline::domain::error::ValidationError;
//! use wagerline::domain::lifecycle::{BetLifecycle, LifecyclePolicy};
//!
//! let lifecycle = BetLifecycle::new(LifecyclePolicy::default());
//! let result = lifecycle.validate_create("ETH > 5000", "abc");
//!
//! assert!(matches!(result, Err(ValidationError::InvalidNumber { field: "threshold", .. })));
//! ```

use thiserror::Error;

use super::id::BetId;

/// Errors raised when a requested bet transition is malformed or not allowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Bet titles must contain at least one non-whitespace character.
    #[error("title is required")]
    EmptyTitle,

    /// The input is not a decimal number.
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber {
        /// Which input was malformed.
        field: &'static str,
        /// The raw input.
        value: String,
    },

    /// Zero or negative amounts are never accepted.
    #[error("{field} must be greater than zero")]
    NonPositive {
        /// Which input was out of range.
        field: &'static str,
    },

    /// More fractional digits than the smallest denomination can hold.
    #[error("{field} supports at most {max_decimals} decimal places")]
    TooPrecise {
        /// Which input was too precise.
        field: &'static str,
        /// Decimal places available for this field.
        max_decimals: u32,
    },

    /// The scaled amount does not fit the smallest-denomination integer.
    #[error("{field} is too large")]
    Overflow {
        /// Which input overflowed.
        field: &'static str,
    },

    /// The bet's epoch has already ended; it accepts no further operations.
    #[error("bet {bet_id} has already ended")]
    StaleBet {
        /// The ended bet.
        bet_id: BetId,
    },

    /// Ending an epoch requires at least one oracle update payload.
    #[error("no resolution evidence supplied for bet {bet_id}")]
    MissingEvidence {
        /// The bet being resolved.
        bet_id: BetId,
    },

    /// The bet is not present in the latest ledger snapshot.
    #[error("bet {bet_id} not found")]
    UnknownBet {
        /// The requested id.
        bet_id: BetId,
    },

    /// Price feed ids are 32 bytes written as 64 hex digits.
    #[error("invalid price feed id '{value}'")]
    InvalidFeedId {
        /// The raw input.
        value: String,
    },
}

impl ValidationError {
    /// True when the error means the local bet snapshot is out of date.
    #[must_use]
    pub const fn is_stale_bet(&self) -> bool {
        matches!(self, Self::StaleBet { .. })
    }
}
