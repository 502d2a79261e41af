//! Outbound adapters for the ledger, the price oracle, and notifications.

#[cfg(feature = "evm")]
pub mod evm;
pub mod memory;
pub mod notifier;
pub mod pyth;
