//! Notifier port for transaction flow notifications.
//!
//! Every submitted ledger write produces exactly one [`Event::Submitted`]
//! followed by exactly one terminal event, [`Event::Confirmed`] or
//! [`Event::Failed`].

use chrono::{DateTime, Utc};

use crate::domain::{FlowId, Operation, TxRef};

/// Events that can trigger notifications.
#[derive(Debug, Clone)]
pub enum Event {
    /// A write was accepted for submission and is now pending.
    Submitted(SubmittedEvent),
    /// A pending write was included and accepted by the ledger.
    Confirmed(ConfirmedEvent),
    /// A pending write was rejected, reverted, or lost.
    Failed(FailedEvent),
}

impl Event {
    /// The flow this event belongs to.
    #[must_use]
    pub const fn flow_id(&self) -> FlowId {
        match self {
            Self::Submitted(e) => e.flow_id,
            Self::Confirmed(e) => e.flow_id,
            Self::Failed(e) => e.flow_id,
        }
    }

    /// True for `Confirmed` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Submitted(_))
    }
}

/// Submission start event.
#[derive(Debug, Clone)]
pub struct SubmittedEvent {
    /// Flow the event belongs to.
    pub flow_id: FlowId,
    /// What was submitted.
    pub operation: Operation,
    /// Ledger reference of the pending write.
    pub reference: TxRef,
    /// When the write entered the pending state.
    pub at: DateTime<Utc>,
}

/// Confirmation event.
#[derive(Debug, Clone)]
pub struct ConfirmedEvent {
    /// Flow the event belongs to.
    pub flow_id: FlowId,
    /// What was confirmed.
    pub operation: Operation,
    /// Ledger reference of the confirmed write.
    pub reference: TxRef,
    /// Block the write was included in, when the ledger reports one.
    pub block_number: Option<u64>,
    /// Block explorer link the user can open.
    pub explorer_url: Option<String>,
    /// When confirmation was observed.
    pub at: DateTime<Utc>,
}

/// Failure event.
#[derive(Debug, Clone)]
pub struct FailedEvent {
    /// Flow the event belongs to.
    pub flow_id: FlowId,
    /// What failed.
    pub operation: Operation,
    /// Ledger reference of the failed write.
    pub reference: TxRef,
    /// The causing error message.
    pub reason: String,
    /// When the failure was observed.
    pub at: DateTime<Utc>,
}

/// Trait for notification handlers.
///
/// Implement this trait to receive events from the system.
/// Notifications are fire-and-forget (async but not awaited).
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
/// - Consider spawning async tasks for slow operations
pub trait Notifier: Send + Sync {
    /// Handle an event.
    ///
    /// This method should return quickly. For slow operations (e.g., HTTP calls),
    /// implementations should spawn an async task.
    fn notify(&self, event: Event);
}

/// Registry of notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingNotifier {
        count: Arc<AtomicUsize>,
    }

    impl Notifier for CountingNotifier {
        fn notify(&self, _event: Event) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn submitted() -> Event {
        Event::Submitted(SubmittedEvent {
            flow_id: FlowId::generate(),
            operation: Operation::EndEpoch {
                bet_id: crate::domain::BetId::new(1),
            },
            reference: TxRef::from("0xabc"),
            at: Utc::now(),
        })
    }

    #[test]
    fn test_registry_notify_all() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();

        registry.register(Box::new(CountingNotifier {
            count: count.clone(),
        }));
        registry.register(Box::new(CountingNotifier {
            count: count.clone(),
        }));

        registry.notify_all(submitted());

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_null_notifier() {
        let notifier = NullNotifier;
        notifier.notify(submitted());
    }

    #[test]
    fn test_registry_len_and_is_empty() {
        let mut registry = NotifierRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);

        registry.register(Box::new(NullNotifier));
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn submitted_is_not_terminal() {
        assert!(!submitted().is_terminal());
    }
}
