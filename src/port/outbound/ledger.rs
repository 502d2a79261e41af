//! Ledger gateway port.
//!
//! Defines the typed interface to the external wager ledger: three
//! state-changing calls and one snapshot read. Writes return a
//! [`SubmissionHandle`] as soon as the call is accepted for submission;
//! they never decide success themselves.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::domain::{Bet, CreateRequest, EndEpochRequest, StakeRequest, TxRef};
use crate::error::{ConfirmationFailure, Result, SubmissionError};

/// Proof that a write was included and accepted by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Reference of the confirmed write.
    pub reference: TxRef,
    /// Block the write was included in, if the ledger has blocks.
    pub block_number: Option<u64>,
}

/// Resolves once the ledger reaches a terminal verdict on a write.
pub type ConfirmationFuture = BoxFuture<'static, std::result::Result<Receipt, ConfirmationFailure>>;

/// Reference to a pending, externally-confirmed write.
///
/// Dropping the handle (or its confirmation future) abandons observation of
/// the write. It does not cancel the write on the ledger.
pub struct SubmissionHandle {
    reference: TxRef,
    confirmation: ConfirmationFuture,
}

impl SubmissionHandle {
    /// Create a handle from a reference and the future that observes it.
    pub fn new<F>(reference: TxRef, confirmation: F) -> Self
    where
        F: Future<Output = std::result::Result<Receipt, ConfirmationFailure>> + Send + 'static,
    {
        Self {
            reference,
            confirmation: confirmation.boxed(),
        }
    }

    /// A handle whose write is already confirmed.
    #[must_use]
    pub fn confirmed(reference: TxRef, block_number: Option<u64>) -> Self {
        let receipt = Receipt {
            reference: reference.clone(),
            block_number,
        };
        Self::new(reference, futures_util::future::ready(Ok(receipt)))
    }

    #[must_use]
    pub fn reference(&self) -> &TxRef {
        &self.reference
    }

    /// Split into the reference and the confirmation future.
    #[must_use]
    pub fn into_parts(self) -> (TxRef, ConfirmationFuture) {
        (self.reference, self.confirmation)
    }
}

impl fmt::Debug for SubmissionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionHandle")
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

/// Port for the external wager ledger.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Errors
///
/// Write methods return [`SubmissionError`] when the call is refused before it
/// becomes pending (insufficient balance, reverted simulation, malformed
/// arguments). Later failures are reported through the handle.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Submit a bet creation.
    async fn create_bet(
        &self,
        request: &CreateRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError>;

    /// Submit a stake, transferring `request.amount` into the `request.side` pool.
    async fn place_stake(
        &self,
        request: &StakeRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError>;

    /// Submit a resolution, transferring the protocol fee with the evidence.
    async fn end_epoch(
        &self,
        request: &EndEpochRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError>;

    /// Read every bet, in ledger (insertion) order.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    async fn list_bets(&self) -> Result<Vec<Bet>>;

    /// Return the ledger name for logging and display.
    fn ledger_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirmed_handle_resolves_immediately() {
        let handle = SubmissionHandle::confirmed(TxRef::from("0x01"), Some(9));
        assert_eq!(handle.reference().as_str(), "0x01");

        let (reference, confirmation) = handle.into_parts();
        let receipt = confirmation.await.unwrap();
        assert_eq!(receipt.reference, reference);
        assert_eq!(receipt.block_number, Some(9));
    }
}
