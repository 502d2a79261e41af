//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the wager ledger, the price service, notification sinks).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Ledger  │            │   Oracle    │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`LedgerGateway`](outbound::ledger::LedgerGateway) - Bet writes and snapshot reads
//! - [`PriceOracle`](outbound::oracle::PriceOracle) - Resolution evidence and price quotes
//! - [`Notifier`](outbound::notifier::Notifier) - Transaction flow notifications

pub mod outbound;

pub use outbound::ledger::{ConfirmationFuture, LedgerGateway, Receipt, SubmissionHandle};
pub use outbound::notifier::{
    ConfirmedEvent, Event, FailedEvent, Notifier, NotifierRegistry, NullNotifier, SubmittedEvent,
};
pub use outbound::oracle::{PriceOracle, PriceQuote};
