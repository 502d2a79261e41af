//! Price oracle port.
//!
//! Supplies the signed update payloads the ledger needs to resolve an epoch,
//! and human-readable quotes for display.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{FeedId, ResolutionEvidence};
use crate::error::OracleError;

/// A decoded price for one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    /// Feed the quote belongs to.
    pub feed_id: FeedId,
    /// Price as an exact decimal (mantissa scaled by the feed exponent).
    pub price: Decimal,
    /// Confidence interval, in the same units as `price`.
    pub confidence: Decimal,
    /// Publisher timestamp.
    pub publish_time: DateTime<Utc>,
}

/// Port for the external price service.
///
/// Every call is a fresh fetch. Evidence is freshness-bound, so
/// implementations must not cache it.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Fetch update payloads covering every requested feed.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the service is unreachable or any requested
    /// feed is missing from the response.
    async fn fetch_update_evidence(
        &self,
        feeds: &[FeedId],
    ) -> Result<ResolutionEvidence, OracleError>;

    /// Fetch the latest decoded prices for the requested feeds.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`PriceOracle::fetch_update_evidence`].
    async fn latest_prices(&self, feeds: &[FeedId]) -> Result<Vec<PriceQuote>, OracleError>;

    /// Return the oracle name for logging and display.
    fn oracle_name(&self) -> &'static str;
}
