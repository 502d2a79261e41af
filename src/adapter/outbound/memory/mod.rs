//! In-process ledger implementation.

mod ledger;

pub use ledger::MemoryLedger;
