//! Bet lifecycle rules.
//!
//! A bet moves `Created -> (Staked)* -> Ended`. Staking is a repeatable
//! self-loop and `Ended` is terminal. [`BetLifecycle`] decides whether a
//! requested transition is well-formed and shapes the canonical request that
//! is handed to the ledger. It performs no I/O.
//!
//! # Example
//!
//! ```
//! use wagerline::domain::bet::{Bet, Side};
//! use wagerline::domain::id::BetId;
//! use wagerline::domain::lifecycle::{BetLifecycle, LifecyclePolicy};
//! use wagerline::domain::money::Amount;
//!
//! let lifecycle = BetLifecycle::new(LifecyclePolicy::default());
//! let bet = Bet::new(BetId::new(0), "ETH > 5000", Amount::from_units(5000), Amount::ZERO, Amount::ZERO, false);
//!
//! let stake = lifecycle.validate_stake(&bet, Side::Exceed, "0.5").unwrap();
//! assert_eq!(stake.amount.format_native(), "0.5");
//! ```

use serde::{Deserialize, Serialize};

use super::bet::{Bet, Side};
use super::error::ValidationError;
use super::evidence::ResolutionEvidence;
use super::id::BetId;
use super::money::Amount;

/// Protocol fee attached to every end-epoch call unless configured otherwise:
/// 0.01 of the native currency.
pub const DEFAULT_PROTOCOL_FEE: Amount = Amount::from_units(10_000_000_000_000_000);

/// Thresholds go to the ledger as typed, unscaled: `"5000"` is `5000`.
pub const DEFAULT_THRESHOLD_DECIMALS: u32 = 0;

/// Parameters the lifecycle rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Decimal places thresholds are scaled by before submission.
    pub threshold_decimals: u32,
    /// Fixed value the ledger requires to accept a resolution.
    pub protocol_fee: Amount,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            threshold_decimals: DEFAULT_THRESHOLD_DECIMALS,
            protocol_fee: DEFAULT_PROTOCOL_FEE,
        }
    }
}

/// A validated bet creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub title: String,
    pub threshold: Amount,
}

/// A validated stake placement. `amount` is transferred into the `side` pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRequest {
    pub bet_id: BetId,
    pub side: Side,
    pub amount: Amount,
}

/// A validated resolution: evidence bytes plus the protocol fee as value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndEpochRequest {
    pub bet_id: BetId,
    pub evidence: ResolutionEvidence,
    pub fee: Amount,
}

/// The ledger write a request turns into, for tracking and notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    CreateBet { title: String },
    PlaceStake { bet_id: BetId, side: Side, amount: Amount },
    EndEpoch { bet_id: BetId },
}

impl Operation {
    /// The bet this operation targets, if it already exists.
    #[must_use]
    pub const fn bet_id(&self) -> Option<BetId> {
        match self {
            Self::CreateBet { .. } => None,
            Self::PlaceStake { bet_id, .. } | Self::EndEpoch { bet_id } => Some(*bet_id),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateBet { title } => write!(f, "create bet '{title}'"),
            Self::PlaceStake {
                bet_id,
                side,
                amount,
            } => write!(
                f,
                "stake {} on {side} for bet {bet_id}",
                amount.format_native()
            ),
            Self::EndEpoch { bet_id } => write!(f, "end epoch for bet {bet_id}"),
        }
    }
}

impl From<&CreateRequest> for Operation {
    fn from(request: &CreateRequest) -> Self {
        Self::CreateBet {
            title: request.title.clone(),
        }
    }
}

impl From<&StakeRequest> for Operation {
    fn from(request: &StakeRequest) -> Self {
        Self::PlaceStake {
            bet_id: request.bet_id,
            side: request.side,
            amount: request.amount,
        }
    }
}

impl From<&EndEpochRequest> for Operation {
    fn from(request: &EndEpochRequest) -> Self {
        Self::EndEpoch {
            bet_id: request.bet_id,
        }
    }
}

/// Pure validation of bet lifecycle transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BetLifecycle {
    policy: LifecyclePolicy,
}

impl BetLifecycle {
    #[must_use]
    pub const fn new(policy: LifecyclePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    /// Validate a new bet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] for a blank title, or an amount
    /// error when `threshold` is not a positive number.
    pub fn validate_create(
        &self,
        title: &str,
        threshold: &str,
    ) -> Result<CreateRequest, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let threshold =
            Amount::parse_positive(threshold, "threshold", self.policy.threshold_decimals)?;

        Ok(CreateRequest {
            title: title.to_string(),
            threshold,
        })
    }

    /// Validate a stake on an open bet.
    ///
    /// An ended bet is rejected before the amount is looked at.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StaleBet`] if the epoch has ended, or an
    /// amount error when `amount` is not a positive native amount.
    pub fn validate_stake(
        &self,
        bet: &Bet,
        side: Side,
        amount: &str,
    ) -> Result<StakeRequest, ValidationError> {
        Self::ensure_open(bet)?;
        let amount = Amount::parse_native(amount, "amount")?;

        Ok(StakeRequest {
            bet_id: bet.id(),
            side,
            amount,
        })
    }

    /// Validate a resolution of an open bet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StaleBet`] if the epoch has ended and
    /// [`ValidationError::MissingEvidence`] if no update payload was supplied.
    pub fn validate_end_epoch(
        &self,
        bet: &Bet,
        evidence: ResolutionEvidence,
    ) -> Result<EndEpochRequest, ValidationError> {
        Self::ensure_open(bet)?;
        if evidence.is_empty() {
            return Err(ValidationError::MissingEvidence { bet_id: bet.id() });
        }

        Ok(EndEpochRequest {
            bet_id: bet.id(),
            evidence,
            fee: self.policy.protocol_fee,
        })
    }

    /// Reject any operation on a bet whose epoch has ended.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StaleBet`] for ended bets.
    pub fn ensure_open(bet: &Bet) -> Result<(), ValidationError> {
        if bet.epoch_ended() {
            return Err(ValidationError::StaleBet { bet_id: bet.id() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::FeedId;

    fn open_bet() -> Bet {
        Bet::new(
            BetId::new(7),
            "ETH > 5000",
            Amount::from_units(5000),
            Amount::ZERO,
            Amount::ZERO,
            false,
        )
    }

    fn ended_bet() -> Bet {
        Bet::new(
            BetId::new(8),
            "BTC > 100000",
            Amount::from_units(100_000),
            Amount::from_units(10),
            Amount::from_units(20),
            true,
        )
    }

    fn evidence() -> ResolutionEvidence {
        ResolutionEvidence::new(vec![FeedId::from_bytes([0xff; 32])], vec![vec![0x50, 0x4e, 0x41, 0x55]])
    }

    #[test]
    fn create_requires_title_and_positive_threshold() {
        let lifecycle = BetLifecycle::default();

        let request = lifecycle.validate_create("  ETH > 5000 ", "5000").unwrap();
        assert_eq!(request.title, "ETH > 5000");
        assert_eq!(request.threshold.units(), 5000);

        assert_eq!(
            lifecycle.validate_create("   ", "5000"),
            Err(ValidationError::EmptyTitle)
        );
        for bad in ["abc", "-1", "", "0", "5000.5"] {
            assert!(
                lifecycle.validate_create("ETH > 5000", bad).is_err(),
                "threshold {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_threshold_is_sent_unscaled() {
        let lifecycle = BetLifecycle::default();
        assert_eq!(lifecycle.policy().threshold_decimals, 0);
        assert_eq!(
            lifecycle.validate_create("ETH > 5000", "5000").unwrap().threshold,
            Amount::from_units(5000)
        );
        assert!(matches!(
            lifecycle.validate_create("ETH > 5000", "5000.5"),
            Err(ValidationError::TooPrecise { field: "threshold", max_decimals: 0 })
        ));
    }

    #[test]
    fn threshold_scaling_is_opt_in() {
        let lifecycle = BetLifecycle::new(LifecyclePolicy {
            threshold_decimals: 18,
            ..LifecyclePolicy::default()
        });
        let threshold = lifecycle.validate_create("ETH > 5000", "5000.5").unwrap().threshold;
        assert_eq!(threshold.units(), 5_000_500_000_000_000_000_000);
        assert_eq!(threshold.format_units(18), "5000.5");
    }

    #[test]
    fn stake_scales_amount_to_smallest_denomination() {
        let request = BetLifecycle::default()
            .validate_stake(&open_bet(), Side::Exceed, "0.5")
            .unwrap();
        assert_eq!(request.bet_id, BetId::new(7));
        assert_eq!(request.side, Side::Exceed);
        assert_eq!(request.amount.units(), 500_000_000_000_000_000);
    }

    #[test]
    fn ended_bets_reject_stakes_regardless_of_amount() {
        let lifecycle = BetLifecycle::default();
        for amount in ["0.5", "abc", "-1", ""] {
            let err = lifecycle
                .validate_stake(&ended_bet(), Side::NotExceed, amount)
                .unwrap_err();
            assert!(err.is_stale_bet(), "amount {amount:?} gave {err:?}");
        }
    }

    #[test]
    fn ended_bets_reject_resolution_regardless_of_evidence() {
        let lifecycle = BetLifecycle::default();
        for evidence in [evidence(), ResolutionEvidence::default()] {
            let err = lifecycle.validate_end_epoch(&ended_bet(), evidence).unwrap_err();
            assert!(err.is_stale_bet());
        }
    }

    #[test]
    fn end_epoch_requires_evidence_and_attaches_fee() {
        let lifecycle = BetLifecycle::default();
        assert_eq!(
            lifecycle.validate_end_epoch(&open_bet(), ResolutionEvidence::default()),
            Err(ValidationError::MissingEvidence { bet_id: BetId::new(7) })
        );

        let request = lifecycle.validate_end_epoch(&open_bet(), evidence()).unwrap();
        assert_eq!(request.fee, DEFAULT_PROTOCOL_FEE);
        assert_eq!(request.fee.format_native(), "0.01");
        assert_eq!(request.evidence.len(), 1);
    }

    #[test]
    fn configured_fee_replaces_default() {
        let fee = Amount::parse_native("0.02", "protocol_fee").unwrap();
        let lifecycle = BetLifecycle::new(LifecyclePolicy {
            protocol_fee: fee,
            ..LifecyclePolicy::default()
        });
        let request = lifecycle.validate_end_epoch(&open_bet(), evidence()).unwrap();
        assert_eq!(request.fee, fee);
    }

    #[test]
    fn operations_describe_their_request() {
        let stake = BetLifecycle::default()
            .validate_stake(&open_bet(), Side::NotExceed, "1.25")
            .unwrap();
        let operation = Operation::from(&stake);
        assert_eq!(operation.bet_id(), Some(BetId::new(7)));
        assert_eq!(operation.to_string(), "stake 1.25 on not-exceed for bet 7");

        let create = BetLifecycle::default()
            .validate_create("ETH > 5000", "5000")
            .unwrap();
        assert_eq!(Operation::from(&create).bet_id(), None);
    }
}
