//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe infrastructure dependencies: the wager ledger,
//! the price oracle, and notification sinks.

pub mod ledger;
pub mod notifier;
pub mod oracle;
