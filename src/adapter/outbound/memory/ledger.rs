//! In-memory ledger for dry runs and tests.
//!
//! Enforces the same acceptance rules the wager contract does: ids are
//! assigned sequentially and never reused, stakes only grow a pool, the
//! epoch flag flips once, and resolution needs evidence plus the fee.
//! Every accepted write is confirmed immediately.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{
    Amount, Bet, BetId, CreateRequest, EndEpochRequest, Side, StakeRequest, TxRef,
};
use crate::error::{Result, SubmissionError};
use crate::port::{LedgerGateway, SubmissionHandle};

#[derive(Debug, Clone)]
struct BetRecord {
    title: String,
    threshold: Amount,
    pool_exceed: Amount,
    pool_not_exceed: Amount,
    epoch_ended: bool,
}

#[derive(Debug, Default)]
struct LedgerState {
    bets: Vec<BetRecord>,
    block: u64,
}

impl LedgerState {
    fn open_bet(&mut self, bet_id: BetId) -> std::result::Result<&mut BetRecord, SubmissionError> {
        let record = usize::try_from(bet_id.value())
            .ok()
            .and_then(|index| self.bets.get_mut(index))
            .ok_or_else(|| SubmissionError::Rejected(format!("bet {bet_id} does not exist")))?;
        if record.epoch_ended {
            return Err(SubmissionError::Rejected(format!(
                "epoch already ended for bet {bet_id}"
            )));
        }
        Ok(record)
    }

    fn next_receipt(&mut self) -> SubmissionHandle {
        self.block += 1;
        let reference = TxRef::new(format!("0x{:064x}", self.block));
        SubmissionHandle::confirmed(reference, Some(self.block))
    }
}

/// Ledger held entirely in process memory.
#[derive(Debug)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
    required_fee: Amount,
}

impl MemoryLedger {
    /// Create an empty ledger that accepts resolutions paying at least `required_fee`.
    #[must_use]
    pub fn new(required_fee: Amount) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            required_fee,
        }
    }

    /// Number of bets ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().bets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().bets.is_empty()
    }

    fn snapshot(&self) -> Vec<Bet> {
        self.state
            .read()
            .bets
            .iter()
            .enumerate()
            .map(|(index, record)| {
                Bet::new(
                    BetId::new(index as u64),
                    record.title.clone(),
                    record.threshold,
                    record.pool_exceed,
                    record.pool_not_exceed,
                    record.epoch_ended,
                )
            })
            .collect()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new(crate::domain::lifecycle::DEFAULT_PROTOCOL_FEE)
    }
}

#[async_trait]
impl LedgerGateway for MemoryLedger {
    async fn create_bet(
        &self,
        request: &CreateRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        if request.title.is_empty() {
            return Err(SubmissionError::Rejected("title is empty".into()));
        }
        let mut state = self.state.write();
        state.bets.push(BetRecord {
            title: request.title.clone(),
            threshold: request.threshold,
            pool_exceed: Amount::ZERO,
            pool_not_exceed: Amount::ZERO,
            epoch_ended: false,
        });
        debug!(bet_id = state.bets.len() - 1, "Memory ledger created bet");
        Ok(state.next_receipt())
    }

    async fn place_stake(
        &self,
        request: &StakeRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        if request.amount.is_zero() {
            return Err(SubmissionError::Rejected("stake must carry value".into()));
        }
        let mut state = self.state.write();
        let record = state.open_bet(request.bet_id)?;
        let pool = match request.side {
            Side::Exceed => &mut record.pool_exceed,
            Side::NotExceed => &mut record.pool_not_exceed,
        };
        *pool = pool
            .checked_add(request.amount)
            .ok_or_else(|| SubmissionError::Rejected("pool overflow".into()))?;
        Ok(state.next_receipt())
    }

    async fn end_epoch(
        &self,
        request: &EndEpochRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        if request.fee < self.required_fee {
            return Err(SubmissionError::Rejected(format!(
                "insufficient fee: {} < {}",
                request.fee.format_native(),
                self.required_fee.format_native()
            )));
        }
        if request.evidence.is_empty() {
            return Err(SubmissionError::Rejected("missing price update".into()));
        }
        let mut state = self.state.write();
        state.open_bet(request.bet_id)?.epoch_ended = true;
        Ok(state.next_receipt())
    }

    async fn list_bets(&self) -> Result<Vec<Bet>> {
        Ok(self.snapshot())
    }

    fn ledger_name(&self) -> &'static str {
        "memory"
    }
}
