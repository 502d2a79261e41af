//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for notification backends.

mod log;

pub use log::LogNotifier;
