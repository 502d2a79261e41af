//! Wagerline - client for threshold wagers resolved by a price oracle.
//!
//! A bet asks whether a price feed will exceed a threshold by the end of its
//! epoch. Users stake native currency on either side; anyone may end the epoch
//! by submitting freshly signed oracle updates, after which the bet is final.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Bets, exact amounts, and the lifecycle rules (no I/O)
//! - [`port`] - Traits for the ledger, the price oracle, and notifications
//! - [`adapter`] - The wager contract over alloy, Pyth Hermes over HTTP, an
//!   in-process ledger, and the command-line surface
//! - [`application`] - Transaction flow tracking and bet orchestration
//! - [`infrastructure`] - Configuration and service wiring
//!
//! # Features
//!
//! - `evm` (default) - Enable the on-chain ledger through alloy
//! - `testkit` - Expose test doubles to integration tests
//!
//! # Example
//!
//! ```no_run
//! use wagerline::infrastructure::bootstrap;
//! use wagerline::infrastructure::config::Config;
//!
//! # async fn run() -> wagerline::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let service = bootstrap::build_service(&config, Vec::new())?;
//! for bet in service.list_bets().await? {
//!     println!("{} {}", bet.id(), bet.title());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
