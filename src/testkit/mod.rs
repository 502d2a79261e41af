//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`ledger`] - `ScriptedLedger`, a memory ledger whose confirmations can
//!   be scripted to revert, drop, stall or be refused.
//! - [`oracle`] - `ScriptedOracle`, a price oracle with canned answers and a
//!   call counter.
//! - [`notifier`] - `RecordingNotifier`, which keeps every event it sees.
//! - [`domain`] - Builders for bets, feeds, and evidence.
//! - [`config`] - Canonical test configurations.
//! - [`service`] - A `WagerService` wired to the doubles above.

pub mod config;
pub mod domain;
pub mod ledger;
pub mod notifier;
pub mod oracle;
pub mod service;
