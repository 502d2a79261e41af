//! Notifier that records every event.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::FlowId;
use crate::port::{ConfirmedEvent, Event, FailedEvent, Notifier};

/// Keeps every event it is handed. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    #[must_use]
    pub fn submitted_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, Event::Submitted(_)))
            .count()
    }

    #[must_use]
    pub fn terminal_count(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.is_terminal())
            .count()
    }

    /// Terminal events seen for `flow_id`.
    #[must_use]
    pub fn terminal_count_for(&self, flow_id: FlowId) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.is_terminal() && event.flow_id() == flow_id)
            .count()
    }

    #[must_use]
    pub fn confirmed(&self) -> Vec<ConfirmedEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Confirmed(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn failed(&self) -> Vec<FailedEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Failed(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
