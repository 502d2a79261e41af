use wagerline::domain::BetId;
use wagerline::error::{Error, OracleError};
use wagerline::testkit::domain::ended_bet;
use wagerline::testkit::ledger::ScriptedLedger;
use wagerline::testkit::oracle::ScriptedOracle;
use wagerline::testkit::service::{harness, harness_with};

#[tokio::test]
async fn unreachable_oracle_never_reaches_the_ledger() {
    let h = harness_with(
        ScriptedLedger::new(),
        ScriptedOracle::failing(OracleError::Unreachable("connection refused".into())),
    );
    h.service.create_bet("ETH > 5000", "5000").await.unwrap();
    let bet = h.service.find_bet(BetId::new(0)).await.unwrap();

    let err = h.service.end_epoch(&bet).await.unwrap_err();

    assert!(matches!(err, Error::Oracle(OracleError::Unreachable(_))));
    assert_eq!(h.oracle.calls(), 1);
    assert_eq!(h.ledger.end_epoch_calls(), 0);
    // Only the create above.
    assert_eq!(h.ledger.write_calls(), 1);
    assert_eq!(h.recorder.submitted_count(), 1);
    assert!(!h.service.find_bet(BetId::new(0)).await.unwrap().epoch_ended());
}

#[tokio::test]
async fn every_oracle_failure_kind_blocks_resolution() {
    let failures = [
        OracleError::Status { status: 503 },
        OracleError::EmptyPayload,
        OracleError::Malformed("missing binary.data".into()),
    ];
    for failure in failures {
        let h = harness();
        h.service.create_bet("ETH > 5000", "5000").await.unwrap();
        let bet = h.service.find_bet(BetId::new(0)).await.unwrap();
        h.oracle.set_outcome(Err(failure.clone()));

        let err = h.service.end_epoch(&bet).await.unwrap_err();
        assert!(matches!(&err, Error::Oracle(e) if *e == failure), "{err:?}");
        assert_eq!(h.ledger.end_epoch_calls(), 0);
    }
}

#[tokio::test]
async fn empty_update_payload_is_missing_evidence() {
    let h = harness_with(ScriptedLedger::new(), ScriptedOracle::returning(Vec::new()));
    h.service.create_bet("ETH > 5000", "5000").await.unwrap();
    let bet = h.service.find_bet(BetId::new(0)).await.unwrap();

    let err = h.service.end_epoch(&bet).await.unwrap_err();

    assert!(matches!(err, Error::Validation(_)), "{err:?}");
    assert_eq!(h.ledger.end_epoch_calls(), 0);
}

#[tokio::test]
async fn ended_bet_skips_the_oracle() {
    let h = harness();

    let err = h.service.end_epoch(&ended_bet(4, "BTC > 100000")).await.unwrap_err();

    assert!(matches!(err, Error::Validation(e) if e.is_stale_bet()));
    assert_eq!(h.oracle.calls(), 0);
    assert_eq!(h.ledger.write_calls(), 0);
}

#[tokio::test]
async fn recovered_oracle_allows_resolution() {
    let h = harness_with(
        ScriptedLedger::new(),
        ScriptedOracle::failing(OracleError::Status { status: 502 }),
    );
    h.service.create_bet("ETH > 5000", "5000").await.unwrap();
    let bet = h.service.find_bet(BetId::new(0)).await.unwrap();
    assert!(h.service.end_epoch(&bet).await.is_err());

    h.oracle.set_outcome(Ok(b"PNAU".to_vec()));
    let outcome = h.service.end_epoch(&bet).await.unwrap();

    assert!(outcome.is_confirmed());
    assert_eq!(h.oracle.calls(), 2);
    assert_eq!(h.ledger.end_epoch_calls(), 1);
}
