//! Builders for domain primitives used across tests.

use crate::adapter::outbound::pyth::settings::ETH_USD_FEED;
use crate::domain::{Amount, Bet, BetId, FeedId, ResolutionEvidence};

/// The ETH/USD feed.
#[must_use]
pub fn eth_feed() -> FeedId {
    ETH_USD_FEED.parse().unwrap_or(FeedId::from_bytes([0xff; 32]))
}

/// An open bet with empty pools.
#[must_use]
pub fn open_bet(id: u64, title: &str) -> Bet {
    Bet::new(
        BetId::new(id),
        title,
        Amount::from_units(5000),
        Amount::ZERO,
        Amount::ZERO,
        false,
    )
}

/// An ended bet with funded pools.
#[must_use]
pub fn ended_bet(id: u64, title: &str) -> Bet {
    Bet::new(
        BetId::new(id),
        title,
        Amount::from_units(5000),
        Amount::from_units(10),
        Amount::from_units(20),
        true,
    )
}

/// Evidence with one short payload for the ETH/USD feed.
#[must_use]
pub fn evidence() -> ResolutionEvidence {
    ResolutionEvidence::new(vec![eth_feed()], vec![b"PNAU".to_vec()])
}
