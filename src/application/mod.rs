//! Application layer - transaction flow tracking and bet orchestration.

pub mod flow;
pub mod service;

pub use flow::{FlowState, FlowStatus, FlowTracker, FlowWatch, TransactionFlow};
pub use service::{ActionOutcome, WagerService};
