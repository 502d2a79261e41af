//! Transaction flow tracking.
//!
//! A [`TransactionFlow`] follows one submitted write through
//! `Idle -> Pending -> {Confirmed, Failed}`. [`FlowTracker`] drives the flow
//! from a [`SubmissionHandle`] and emits one `Submitted` notification when the
//! flow becomes pending and exactly one terminal notification when it settles.
//!
//! The tracker imposes no timeout. Observation stops only when the ledger
//! reaches a verdict or the caller drops the watch.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::{FlowId, Operation, TxRef};
use crate::error::{ConfirmationFailure, Error, Result};
use crate::port::{
    ConfirmedEvent, Event, FailedEvent, NotifierRegistry, Receipt, SubmissionHandle,
    SubmittedEvent,
};

/// Coarse state of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Idle,
    Pending,
    Confirmed,
    Failed,
}

impl FlowStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

/// State of a flow together with what it has learned so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Pending { reference: TxRef },
    Confirmed(Receipt),
    Failed(ConfirmationFailure),
}

/// Transient state of one submitted operation. Never persisted.
#[derive(Debug, Clone)]
pub struct TransactionFlow {
    id: FlowId,
    operation: Operation,
    state: FlowState,
}

impl TransactionFlow {
    /// Start an idle flow for `operation`.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            id: FlowId::generate(),
            operation,
            state: FlowState::Idle,
        }
    }

    #[must_use]
    pub const fn id(&self) -> FlowId {
        self.id
    }

    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.operation
    }

    #[must_use]
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    #[must_use]
    pub const fn status(&self) -> FlowStatus {
        match self.state {
            FlowState::Idle => FlowStatus::Idle,
            FlowState::Pending { .. } => FlowStatus::Pending,
            FlowState::Confirmed(_) => FlowStatus::Confirmed,
            FlowState::Failed(_) => FlowStatus::Failed,
        }
    }

    /// Reference of the tracked write, once it exists.
    #[must_use]
    pub fn reference(&self) -> Option<&TxRef> {
        match &self.state {
            FlowState::Idle => None,
            FlowState::Pending { reference } => Some(reference),
            FlowState::Confirmed(receipt) => Some(&receipt.reference),
            FlowState::Failed(failure) => Some(failure.reference()),
        }
    }

    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.state, FlowState::Confirmed(_))
    }

    /// The failure, if the flow ended in `Failed`.
    #[must_use]
    pub const fn failure(&self) -> Option<&ConfirmationFailure> {
        match &self.state {
            FlowState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// `Idle -> Pending`. Returns false if the flow was not idle.
    fn begin(&mut self, reference: TxRef) -> bool {
        if !matches!(self.state, FlowState::Idle) {
            return false;
        }
        self.state = FlowState::Pending { reference };
        true
    }

    /// `Pending -> Confirmed | Failed`. Returns false unless the flow was pending.
    fn settle(&mut self, outcome: std::result::Result<Receipt, ConfirmationFailure>) -> bool {
        if !matches!(self.state, FlowState::Pending { .. }) {
            return false;
        }
        self.state = match outcome {
            Ok(receipt) => FlowState::Confirmed(receipt),
            Err(failure) => FlowState::Failed(failure),
        };
        true
    }
}

/// Observes submission handles and notifies on each transition.
#[derive(Clone)]
pub struct FlowTracker {
    notifiers: Arc<NotifierRegistry>,
    explorer_tx_url: Option<String>,
}

impl FlowTracker {
    #[must_use]
    pub fn new(notifiers: Arc<NotifierRegistry>) -> Self {
        Self {
            notifiers,
            explorer_tx_url: None,
        }
    }

    /// Link confirmed references to a block explorer (`base` + reference).
    #[must_use]
    pub fn with_explorer(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.explorer_tx_url = (!base.is_empty()).then_some(base);
        self
    }

    /// Explorer link for a reference, if an explorer is configured.
    #[must_use]
    pub fn explorer_url(&self, reference: &TxRef) -> Option<String> {
        self.explorer_tx_url
            .as_ref()
            .map(|base| format!("{base}{reference}"))
    }

    /// Follow a handle to its terminal state on the current task.
    ///
    /// Dropping the returned future abandons observation: no terminal
    /// notification is emitted and nothing is retried.
    pub async fn track(&self, operation: Operation, handle: SubmissionHandle) -> TransactionFlow {
        let (reference, confirmation) = handle.into_parts();
        let mut flow = TransactionFlow::new(operation);
        self.begin(&mut flow, reference);

        let outcome = confirmation.await;
        self.settle(&mut flow, outcome);
        flow
    }

    /// Follow a handle on a background task.
    ///
    /// The flow is pending (and `Submitted` has fired) by the time this
    /// returns. Earlier watches keep running; each settles on its own.
    #[must_use]
    pub fn watch(&self, operation: Operation, handle: SubmissionHandle) -> FlowWatch {
        let (reference, confirmation) = handle.into_parts();
        let mut flow = TransactionFlow::new(operation);
        self.begin(&mut flow, reference);

        let id = flow.id();
        let (sender, receiver) = watch::channel(flow.clone());
        let tracker = self.clone();
        let task = tokio::spawn(async move {
            let outcome = confirmation.await;
            tracker.settle(&mut flow, outcome);
            let _ = sender.send(flow.clone());
            flow
        });

        FlowWatch {
            id,
            receiver,
            task: Some(task),
        }
    }

    fn begin(&self, flow: &mut TransactionFlow, reference: TxRef) {
        if !flow.begin(reference.clone()) {
            return;
        }
        info!(flow = %flow.id(), operation = %flow.operation(), tx = %reference, "Transaction pending");
        self.notifiers.notify_all(Event::Submitted(SubmittedEvent {
            flow_id: flow.id(),
            operation: flow.operation().clone(),
            reference,
            at: Utc::now(),
        }));
    }

    fn settle(
        &self,
        flow: &mut TransactionFlow,
        outcome: std::result::Result<Receipt, ConfirmationFailure>,
    ) {
        if !flow.settle(outcome) {
            return;
        }
        let event = match flow.state() {
            FlowState::Confirmed(receipt) => {
                info!(
                    flow = %flow.id(),
                    operation = %flow.operation(),
                    tx = %receipt.reference,
                    block = ?receipt.block_number,
                    "Transaction confirmed"
                );
                Event::Confirmed(ConfirmedEvent {
                    flow_id: flow.id(),
                    operation: flow.operation().clone(),
                    reference: receipt.reference.clone(),
                    block_number: receipt.block_number,
                    explorer_url: self.explorer_url(&receipt.reference),
                    at: Utc::now(),
                })
            }
            FlowState::Failed(failure) => {
                warn!(
                    flow = %flow.id(),
                    operation = %flow.operation(),
                    error = %failure,
                    "Transaction failed"
                );
                Event::Failed(FailedEvent {
                    flow_id: flow.id(),
                    operation: flow.operation().clone(),
                    reference: failure.reference().clone(),
                    reason: failure.to_string(),
                    at: Utc::now(),
                })
            }
            FlowState::Idle | FlowState::Pending { .. } => return,
        };
        self.notifiers.notify_all(event);
    }
}

/// A flow observed on a background task.
///
/// Dropping the watch aborts observation without side effects.
pub struct FlowWatch {
    id: FlowId,
    receiver: watch::Receiver<TransactionFlow>,
    task: Option<JoinHandle<TransactionFlow>>,
}

impl FlowWatch {
    #[must_use]
    pub const fn id(&self) -> FlowId {
        self.id
    }

    /// Latest observed state of the flow.
    #[must_use]
    pub fn current(&self) -> TransactionFlow {
        self.receiver.borrow().clone()
    }

    /// Wait for the terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the observing task did not finish.
    pub async fn wait(mut self) -> Result<TransactionFlow> {
        let task = self.task.take().ok_or(Error::Cancelled)?;
        task.await.map_err(|_| Error::Cancelled)
    }

    /// Stop observing. No terminal notification fires after this.
    pub fn cancel(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for FlowWatch {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
