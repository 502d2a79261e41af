//! EVM wager contract implementation.
//!
//! Talks to the deployed wager contract over JSON-RPC through alloy. Writes
//! are signed with the configured wallet; reads need no wallet.

mod contract;
mod gateway;

pub use gateway::EvmLedger;
