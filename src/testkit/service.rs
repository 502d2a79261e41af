//! A `WagerService` wired to test doubles.

use std::sync::Arc;

use super::domain::eth_feed;
use super::ledger::ScriptedLedger;
use super::notifier::RecordingNotifier;
use super::oracle::ScriptedOracle;
use crate::application::{FlowTracker, WagerService};
use crate::domain::BetLifecycle;
use crate::port::NotifierRegistry;

/// Explorer prefix used by [`harness`].
pub const EXPLORER: &str = "https://explorer.test/tx/";

/// Service plus handles to every double it talks to.
pub struct Harness {
    pub service: WagerService,
    pub ledger: Arc<ScriptedLedger>,
    pub oracle: Arc<ScriptedOracle>,
    pub recorder: RecordingNotifier,
}

/// Build a service over `ledger` and `oracle` that records notifications.
#[must_use]
pub fn harness_with(ledger: ScriptedLedger, oracle: ScriptedOracle) -> Harness {
    let ledger = Arc::new(ledger);
    let oracle = Arc::new(oracle);
    let recorder = RecordingNotifier::new();

    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));
    let tracker = FlowTracker::new(Arc::new(registry)).with_explorer(EXPLORER);

    let service = WagerService::new(
        BetLifecycle::default(),
        ledger.clone(),
        oracle.clone(),
        tracker,
        vec![eth_feed()],
    );
    Harness {
        service,
        ledger,
        oracle,
        recorder,
    }
}

/// Default harness: every write confirms, the oracle answers.
#[must_use]
pub fn harness() -> Harness {
    harness_with(ScriptedLedger::new(), ScriptedOracle::default())
}
