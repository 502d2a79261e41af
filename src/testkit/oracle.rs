//! Scripted price oracle double.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::DateTime;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{FeedId, ResolutionEvidence};
use crate::error::OracleError;
use crate::port::{PriceOracle, PriceQuote};

/// Oracle that answers every fetch with the same canned outcome.
pub struct ScriptedOracle {
    outcome: Mutex<Result<Vec<u8>, OracleError>>,
    price: Decimal,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    /// Answer each requested feed with `update` as its payload.
    #[must_use]
    pub fn returning(update: Vec<u8>) -> Self {
        Self {
            outcome: Mutex::new(Ok(update)),
            price: Decimal::new(350_012, 2),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every fetch with `error`.
    #[must_use]
    pub fn failing(error: OracleError) -> Self {
        Self {
            outcome: Mutex::new(Err(error)),
            price: Decimal::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Replace the canned outcome.
    pub fn set_outcome(&self, outcome: Result<Vec<u8>, OracleError>) {
        *self.outcome.lock() = outcome;
    }

    /// Number of fetches received, prices included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedOracle {
    fn default() -> Self {
        Self::returning(b"PNAU".to_vec())
    }
}

#[async_trait]
impl PriceOracle for ScriptedOracle {
    async fn fetch_update_evidence(
        &self,
        feeds: &[FeedId],
    ) -> Result<ResolutionEvidence, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let update = self.outcome.lock().clone()?;
        Ok(ResolutionEvidence::new(
            feeds.to_vec(),
            feeds.iter().map(|_| update.clone()).collect(),
        ))
    }

    async fn latest_prices(&self, feeds: &[FeedId]) -> Result<Vec<PriceQuote>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.lock().clone()?;
        Ok(feeds
            .iter()
            .map(|feed_id| PriceQuote {
                feed_id: *feed_id,
                price: self.price,
                confidence: Decimal::new(150, 2),
                publish_time: DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default(),
            })
            .collect())
    }

    fn oracle_name(&self) -> &'static str {
        "scripted"
    }
}
