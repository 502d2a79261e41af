#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use wagerline::application::{ActionOutcome, FlowStatus};
use wagerline::domain::{Bet, BetId};

/// A config file inside a temporary directory that lives as long as the value.
pub struct TempConfig {
    pub dir: TempDir,
    pub path: PathBuf,
}

pub fn write_temp_config(contents: &str) -> TempConfig {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    TempConfig { dir, path }
}

pub fn bet_in(outcome: &ActionOutcome, bet_id: BetId) -> Bet {
    outcome
        .bets
        .as_ref()
        .expect("refetched bets")
        .iter()
        .find(|bet| bet.id() == bet_id)
        .cloned()
        .expect("bet present in refetch")
}

pub fn assert_confirmed(outcome: &ActionOutcome) {
    assert_eq!(
        outcome.flow.status(),
        FlowStatus::Confirmed,
        "flow did not confirm: {:?}",
        outcome.flow.state()
    );
}
