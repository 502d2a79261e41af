//! Scripted ledger double.
//!
//! Wraps a [`MemoryLedger`] so accepted writes still follow the contract
//! rules, while each write's fate can be scripted in advance. Writes with no
//! script entry confirm immediately.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::adapter::outbound::memory::MemoryLedger;
use crate::domain::{Amount, Bet, CreateRequest, EndEpochRequest, StakeRequest, TxRef};
use crate::error::{ConfirmationFailure, Error, Result, SubmissionError};
use crate::port::{LedgerGateway, SubmissionHandle};

/// What happens to the next write.
#[derive(Debug, Clone)]
pub enum Scripted {
    /// Applied and confirmed immediately.
    Confirm,
    /// Applied, confirmed after the delay.
    ConfirmAfter(Duration),
    /// Included but reverted; state is unchanged.
    Revert,
    /// Observation lost; state is unchanged.
    Drop(String),
    /// Refused before it becomes pending.
    Reject(String),
}

/// Ledger double with per-write scripting and call counters.
pub struct ScriptedLedger {
    inner: MemoryLedger,
    script: Mutex<VecDeque<Scripted>>,
    create_calls: AtomicUsize,
    stake_calls: AtomicUsize,
    end_epoch_calls: AtomicUsize,
    list_calls: AtomicUsize,
    fail_reads: AtomicBool,
    unapplied: AtomicUsize,
}

impl ScriptedLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fee(crate::domain::lifecycle::DEFAULT_PROTOCOL_FEE)
    }

    #[must_use]
    pub fn with_fee(fee: Amount) -> Self {
        Self {
            inner: MemoryLedger::new(fee),
            script: Mutex::new(VecDeque::new()),
            create_calls: AtomicUsize::new(0),
            stake_calls: AtomicUsize::new(0),
            end_epoch_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            unapplied: AtomicUsize::new(0),
        }
    }

    /// Queue the fate of the next write.
    pub fn push(&self, step: Scripted) -> &Self {
        self.script.lock().push_back(step);
        self
    }

    /// Make every subsequent `list_bets` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stake_calls(&self) -> usize {
        self.stake_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn end_epoch_calls(&self) -> usize {
        self.end_epoch_calls.load(Ordering::SeqCst)
    }

    /// Total state-changing calls received.
    #[must_use]
    pub fn write_calls(&self) -> usize {
        self.create_calls() + self.stake_calls() + self.end_epoch_calls()
    }

    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> Scripted {
        self.script.lock().pop_front().unwrap_or(Scripted::Confirm)
    }

    fn unapplied_reference(&self) -> TxRef {
        let n = self.unapplied.fetch_add(1, Ordering::SeqCst) + 1;
        TxRef::new(format!("0x{:062x}ff", n))
    }

    /// Resolve the scripted fate, running `apply` only when the write lands.
    async fn run<F>(
        &self,
        apply: F,
    ) -> std::result::Result<SubmissionHandle, SubmissionError>
    where
        F: std::future::Future<Output = std::result::Result<SubmissionHandle, SubmissionError>>,
    {
        match self.next_step() {
            Scripted::Confirm => apply.await,
            Scripted::ConfirmAfter(delay) => {
                let (reference, confirmation) = apply.await?.into_parts();
                Ok(SubmissionHandle::new(reference, async move {
                    tokio::time::sleep(delay).await;
                    confirmation.await
                }))
            }
            Scripted::Revert => {
                let reference = self.unapplied_reference();
                let failure = ConfirmationFailure::Reverted {
                    reference: reference.clone(),
                };
                Ok(SubmissionHandle::new(reference, async move { Err(failure) }))
            }
            Scripted::Drop(reason) => {
                let reference = self.unapplied_reference();
                let failure = ConfirmationFailure::Dropped {
                    reference: reference.clone(),
                    reason,
                };
                Ok(SubmissionHandle::new(reference, async move { Err(failure) }))
            }
            Scripted::Reject(reason) => Err(SubmissionError::Rejected(reason)),
        }
    }
}

impl Default for ScriptedLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerGateway for ScriptedLedger {
    async fn create_bet(
        &self,
        request: &CreateRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.run(self.inner.create_bet(request)).await
    }

    async fn place_stake(
        &self,
        request: &StakeRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        self.stake_calls.fetch_add(1, Ordering::SeqCst);
        self.run(self.inner.place_stake(request)).await
    }

    async fn end_epoch(
        &self,
        request: &EndEpochRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        self.end_epoch_calls.fetch_add(1, Ordering::SeqCst);
        self.run(self.inner.end_epoch(request)).await
    }

    async fn list_bets(&self) -> Result<Vec<Bet>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Ledger("scripted read failure".into()));
        }
        self.inner.list_bets().await
    }

    fn ledger_name(&self) -> &'static str {
        "scripted"
    }
}
