//! Bet projections as read from the ledger.
//!
//! - [`Bet`] - A threshold claim with two opposing stake pools
//! - [`Side`] - Which pool a stake goes into
//! - [`BetStatus`] - Whether the epoch is still open
//!
//! The ledger owns every bet. Values here are read-only snapshots, replaced
//! wholesale on refetch and never patched in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::BetId;
use super::money::Amount;

/// The side of a bet a stake is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The metric will exceed the threshold.
    Exceed,
    /// The metric will not exceed the threshold.
    NotExceed,
}

impl Side {
    /// Ledger encoding: `true` selects the Exceed pool.
    #[must_use]
    pub const fn as_flag(self) -> bool {
        matches!(self, Self::Exceed)
    }

    #[must_use]
    pub const fn from_flag(exceed: bool) -> Self {
        if exceed {
            Self::Exceed
        } else {
            Self::NotExceed
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Exceed => Self::NotExceed,
            Self::NotExceed => Self::Exceed,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exceed => write!(f, "exceed"),
            Self::NotExceed => write!(f, "not-exceed"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exceed" | "yes" | "over" => Ok(Self::Exceed),
            "not-exceed" | "not_exceed" | "notexceed" | "no" | "under" => Ok(Self::NotExceed),
            other => Err(format!("unknown side '{other}' (expected exceed or not-exceed)")),
        }
    }
}

/// Whether a bet still accepts stakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Active,
    Ended,
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

/// A threshold claim with two stake pools.
///
/// `id`, `title` and `threshold` never change after creation. Pools only grow
/// and `epoch_ended` flips to `true` exactly once, after which the bet is
/// terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    id: BetId,
    title: String,
    threshold: Amount,
    pool_exceed: Amount,
    pool_not_exceed: Amount,
    epoch_ended: bool,
}

impl Bet {
    /// Create a bet snapshot.
    pub fn new(
        id: BetId,
        title: impl Into<String>,
        threshold: Amount,
        pool_exceed: Amount,
        pool_not_exceed: Amount,
        epoch_ended: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            threshold,
            pool_exceed,
            pool_not_exceed,
            epoch_ended,
        }
    }

    #[must_use]
    pub const fn id(&self) -> BetId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn threshold(&self) -> Amount {
        self.threshold
    }

    #[must_use]
    pub const fn pool_exceed(&self) -> Amount {
        self.pool_exceed
    }

    #[must_use]
    pub const fn pool_not_exceed(&self) -> Amount {
        self.pool_not_exceed
    }

    /// Accumulated stake on one side.
    #[must_use]
    pub const fn pool(&self, side: Side) -> Amount {
        match side {
            Side::Exceed => self.pool_exceed,
            Side::NotExceed => self.pool_not_exceed,
        }
    }

    /// Sum of both pools, saturating at the representable maximum.
    #[must_use]
    pub fn total_pool(&self) -> Amount {
        self.pool_exceed
            .checked_add(self.pool_not_exceed)
            .unwrap_or(Amount::from_units(u128::MAX))
    }

    #[must_use]
    pub const fn epoch_ended(&self) -> bool {
        self.epoch_ended
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.epoch_ended
    }

    #[must_use]
    pub const fn status(&self) -> BetStatus {
        if self.epoch_ended {
            BetStatus::Ended
        } else {
            BetStatus::Active
        }
    }
}
