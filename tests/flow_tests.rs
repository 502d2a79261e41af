mod support;

use std::collections::HashSet;
use std::time::Duration;

use wagerline::application::FlowStatus;
use wagerline::domain::{BetId, Side};
use wagerline::error::{ConfirmationFailure, Error};
use wagerline::port::{Event, LedgerGateway};
use wagerline::testkit::ledger::{Scripted, ScriptedLedger};
use wagerline::testkit::oracle::ScriptedOracle;
use wagerline::testkit::service::{harness, harness_with, EXPLORER};

#[tokio::test]
async fn confirmed_write_fires_exactly_one_terminal_notification() {
    let h = harness();
    let outcome = h.service.create_bet("ETH > 5000", "5000").await.unwrap();

    let events = h.recorder.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], Event::Submitted(_)));
    assert!(matches!(events[1], Event::Confirmed(_)));
    assert_eq!(h.recorder.terminal_count_for(outcome.flow.id()), 1);

    let confirmed = &h.recorder.confirmed()[0];
    let reference = outcome.flow.reference().unwrap();
    assert_eq!(&confirmed.reference, reference);
    assert_eq!(
        confirmed.explorer_url.as_deref(),
        Some(format!("{EXPLORER}{reference}").as_str())
    );
}

#[tokio::test]
async fn reverted_write_fires_exactly_one_failure() {
    let ledger = ScriptedLedger::new();
    ledger.push(Scripted::Revert);
    let h = harness_with(ledger, ScriptedOracle::default());

    let outcome = h.service.create_bet("ETH > 5000", "5000").await.unwrap();

    assert_eq!(outcome.flow.status(), FlowStatus::Failed);
    assert!(matches!(
        outcome.flow.failure(),
        Some(ConfirmationFailure::Reverted { .. })
    ));
    assert!(outcome.bets.is_none());
    assert_eq!(h.recorder.submitted_count(), 1);
    assert_eq!(h.recorder.terminal_count(), 1);
    assert_eq!(h.recorder.failed().len(), 1);
    assert!(h.recorder.confirmed().is_empty());
    // Reverted writes change nothing and trigger no refetch.
    assert_eq!(h.ledger.list_calls(), 0);
    assert!(h.service.list_bets().await.unwrap().is_empty());
}

#[tokio::test]
async fn dropped_write_reports_its_reason() {
    let ledger = ScriptedLedger::new();
    ledger.push(Scripted::Drop("rpc connection reset".into()));
    let h = harness_with(ledger, ScriptedOracle::default());

    let outcome = h.service.create_bet("ETH > 5000", "5000").await.unwrap();

    let failed = h.recorder.failed();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].reason.contains("rpc connection reset"));
    assert_eq!(outcome.flow.status(), FlowStatus::Failed);
}

#[tokio::test]
async fn refused_submission_is_not_a_flow() {
    let ledger = ScriptedLedger::new();
    ledger.push(Scripted::Reject("insufficient funds".into()));
    let h = harness_with(ledger, ScriptedOracle::default());

    let err = h.service.create_bet("ETH > 5000", "5000").await.unwrap_err();

    assert!(matches!(err, Error::Submission(_)));
    assert!(h.recorder.events().is_empty());
}

#[tokio::test]
async fn concurrent_watches_settle_independently() {
    let ledger = ScriptedLedger::new();
    ledger
        .push(Scripted::Confirm)
        .push(Scripted::ConfirmAfter(Duration::from_millis(40)))
        .push(Scripted::ConfirmAfter(Duration::from_millis(5)));
    let h = harness_with(ledger, ScriptedOracle::default());
    h.service.create_bet("ETH > 5000", "5000").await.unwrap();
    let bet = h.service.find_bet(BetId::new(0)).await.unwrap();

    let lifecycle = h.service.lifecycle();
    let slow = lifecycle.validate_stake(&bet, Side::Exceed, "1").unwrap();
    let fast = lifecycle.validate_stake(&bet, Side::NotExceed, "2").unwrap();

    let tracker = h.service.tracker();
    let slow_watch = tracker.watch((&slow).into(), h.ledger.place_stake(&slow).await.unwrap());
    let fast_watch = tracker.watch((&fast).into(), h.ledger.place_stake(&fast).await.unwrap());
    assert_eq!(slow_watch.current().status(), FlowStatus::Pending);

    let fast_flow = fast_watch.wait().await.unwrap();
    assert!(fast_flow.is_confirmed());
    let slow_flow = slow_watch.wait().await.unwrap();
    assert!(slow_flow.is_confirmed());

    let flows: HashSet<_> = [slow_flow.id(), fast_flow.id()].into_iter().collect();
    assert_eq!(flows.len(), 2);
    for id in flows {
        assert_eq!(h.recorder.terminal_count_for(id), 1);
    }
    // One create plus two stakes.
    assert_eq!(h.recorder.terminal_count(), 3);
}

#[tokio::test]
async fn cancelled_watch_stays_silent() {
    let ledger = ScriptedLedger::new();
    ledger
        .push(Scripted::Confirm)
        .push(Scripted::ConfirmAfter(Duration::from_millis(20)));
    let h = harness_with(ledger, ScriptedOracle::default());
    h.service.create_bet("ETH > 5000", "5000").await.unwrap();
    let bet = h.service.find_bet(BetId::new(0)).await.unwrap();

    let stake = h
        .service
        .lifecycle()
        .validate_stake(&bet, Side::Exceed, "1")
        .unwrap();
    let handle = h.ledger.place_stake(&stake).await.unwrap();
    let watch = h.service.tracker().watch((&stake).into(), handle);
    watch.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(h.recorder.submitted_count(), 2);
    assert_eq!(h.recorder.terminal_count(), 1);
}
