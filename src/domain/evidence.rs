//! Oracle resolution evidence.

use super::id::FeedId;

/// Signed price-update payloads, passed to the ledger verbatim.
///
/// Each blob is independently verifiable by the ledger and only valid for a
/// short freshness window, so evidence is fetched right before use and never
/// cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionEvidence {
    feeds: Vec<FeedId>,
    updates: Vec<Vec<u8>>,
}

impl ResolutionEvidence {
    /// Bundle update blobs with the feeds they cover.
    #[must_use]
    pub fn new(feeds: Vec<FeedId>, updates: Vec<Vec<u8>>) -> Self {
        Self { feeds, updates }
    }

    /// Feeds the evidence was requested for.
    #[must_use]
    pub fn feeds(&self) -> &[FeedId] {
        &self.feeds
    }

    /// Opaque update payloads.
    #[must_use]
    pub fn updates(&self) -> &[Vec<u8>] {
        &self.updates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() || self.updates.iter().all(Vec::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Total payload size in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.updates.iter().map(Vec::len).sum()
    }
}
