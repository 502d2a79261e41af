//! Pyth Hermes price service implementation.
//!
//! Fetches signed price-update payloads used as resolution evidence, and
//! the parsed prices that accompany them.

pub mod client;
pub mod response;
pub mod settings;

pub use client::HermesClient;
pub use settings::{HermesConfig, HermesHttpConfig};
