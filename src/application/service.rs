//! Bet orchestration.
//!
//! Each user action runs validate → submit → track → refetch:
//!
//! 1. [`BetLifecycle`] validates the input and shapes the request
//! 2. [`LedgerGateway`] submits it and hands back a submission handle
//! 3. [`FlowTracker`] follows the handle to its terminal state
//! 4. On confirmation the bet snapshot is fetched again, since the old one is
//!    stale by definition
//!
//! Ending an epoch additionally consults the [`PriceOracle`] between steps 1
//! and 2. If evidence cannot be fetched the ledger is never called.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::flow::{FlowTracker, TransactionFlow};
use crate::domain::{Bet, BetId, BetLifecycle, FeedId, Operation, Side, ValidationError};
use crate::error::{OracleError, Result};
use crate::port::{LedgerGateway, PriceOracle, PriceQuote, SubmissionHandle};

/// Result of a completed user action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// The settled transaction flow.
    pub flow: TransactionFlow,
    /// Fresh snapshot, present when the write confirmed and the refetch worked.
    pub bets: Option<Vec<Bet>>,
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        self.flow.is_confirmed()
    }
}

/// Client-side bet lifecycle service.
///
/// The ledger and oracle connections are injected; the service holds no
/// session state of its own.
pub struct WagerService {
    lifecycle: BetLifecycle,
    ledger: Arc<dyn LedgerGateway>,
    oracle: Arc<dyn PriceOracle>,
    tracker: FlowTracker,
    feeds: Vec<FeedId>,
}

impl WagerService {
    pub fn new(
        lifecycle: BetLifecycle,
        ledger: Arc<dyn LedgerGateway>,
        oracle: Arc<dyn PriceOracle>,
        tracker: FlowTracker,
        feeds: Vec<FeedId>,
    ) -> Self {
        Self {
            lifecycle,
            ledger,
            oracle,
            tracker,
            feeds,
        }
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &BetLifecycle {
        &self.lifecycle
    }

    #[must_use]
    pub const fn tracker(&self) -> &FlowTracker {
        &self.tracker
    }

    /// Feeds whose evidence resolves an epoch.
    #[must_use]
    pub fn feeds(&self) -> &[FeedId] {
        &self.feeds
    }

    #[must_use]
    pub fn ledger_name(&self) -> &'static str {
        self.ledger.ledger_name()
    }

    /// Full snapshot of every bet on the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    pub async fn list_bets(&self) -> Result<Vec<Bet>> {
        let bets = self.ledger.list_bets().await?;
        debug!(count = bets.len(), ledger = self.ledger.ledger_name(), "Fetched bets");
        Ok(bets)
    }

    /// Fetch a fresh snapshot and pick one bet out of it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownBet`] if the id is not on the ledger.
    pub async fn find_bet(&self, bet_id: BetId) -> Result<Bet> {
        self.list_bets()
            .await?
            .into_iter()
            .find(|bet| bet.id() == bet_id)
            .ok_or_else(|| ValidationError::UnknownBet { bet_id }.into())
    }

    /// Create a bet and wait for the ledger's verdict.
    ///
    /// # Errors
    ///
    /// Returns validation errors before any call and submission errors if the
    /// ledger refuses the write. Confirmation failures are reported in the
    /// returned flow.
    pub async fn create_bet(&self, title: &str, threshold: &str) -> Result<ActionOutcome> {
        let request = self.lifecycle.validate_create(title, threshold)?;
        info!(title = %request.title, threshold = %request.threshold, "Creating bet");

        let handle = self.ledger.create_bet(&request).await?;
        Ok(self.complete(Operation::from(&request), handle).await)
    }

    /// Stake on one side of `bet` and wait for the ledger's verdict.
    ///
    /// `bet` is the caller's latest snapshot; the ledger remains the final
    /// judge of whether the epoch is still open.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StaleBet`] for ended bets, amount validation
    /// errors, or a submission error if the ledger refuses the write.
    pub async fn place_stake(&self, bet: &Bet, side: Side, amount: &str) -> Result<ActionOutcome> {
        let request = self.lifecycle.validate_stake(bet, side, amount)?;
        info!(
            bet_id = %request.bet_id,
            side = %request.side,
            amount = %request.amount.format_native(),
            "Placing stake"
        );

        let handle = self.ledger.place_stake(&request).await?;
        Ok(self.complete(Operation::from(&request), handle).await)
    }

    /// Resolve `bet` with freshly fetched oracle evidence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::StaleBet`] for ended bets and
    /// [`OracleError`] if evidence cannot be fetched; in both cases the ledger
    /// is not called.
    pub async fn end_epoch(&self, bet: &Bet) -> Result<ActionOutcome> {
        BetLifecycle::ensure_open(bet)?;
        if self.feeds.is_empty() {
            return Err(OracleError::NoFeeds.into());
        }

        let evidence = self
            .oracle
            .fetch_update_evidence(&self.feeds)
            .await
            .inspect_err(|e| warn!(bet_id = %bet.id(), error = %e, "Resolution evidence unavailable"))?;
        debug!(
            bet_id = %bet.id(),
            updates = evidence.len(),
            bytes = evidence.byte_len(),
            "Fetched resolution evidence"
        );

        let request = self.lifecycle.validate_end_epoch(bet, evidence)?;
        info!(bet_id = %request.bet_id, fee = %request.fee.format_native(), "Ending epoch");

        let handle = self.ledger.end_epoch(&request).await?;
        Ok(self.complete(Operation::from(&request), handle).await)
    }

    /// Latest decoded prices for the resolution feeds.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the price service fails.
    pub async fn latest_prices(&self) -> Result<Vec<PriceQuote>> {
        if self.feeds.is_empty() {
            return Err(OracleError::NoFeeds.into());
        }
        Ok(self.oracle.latest_prices(&self.feeds).await?)
    }

    async fn complete(&self, operation: Operation, handle: SubmissionHandle) -> ActionOutcome {
        let flow = self.tracker.track(operation, handle).await;
        let bets = if flow.is_confirmed() {
            match self.ledger.list_bets().await {
                Ok(bets) => Some(bets),
                Err(e) => {
                    warn!(error = %e, "Failed to refresh bets after confirmation");
                    None
                }
            }
        } else {
            None
        };
        ActionOutcome { flow, bets }
    }
}
