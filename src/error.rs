use thiserror::Error;

use crate::domain::error::ValidationError;
use crate::domain::{FeedId, TxRef};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// A ledger write refused before it ever became pending.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The ledger or its transport rejected the call (insufficient funds,
    /// reverted simulation, malformed arguments).
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// No signing wallet is configured for writes.
    #[error("wallet unavailable: {0}")]
    Wallet(String),
}

/// Resolution evidence could not be obtained. `endEpoch` must not be attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("price service unreachable: {0}")]
    Unreachable(String),

    #[error("price service returned HTTP {status}")]
    Status { status: u16 },

    #[error("price service returned no update for feed {feed_id}")]
    MissingFeed { feed_id: FeedId },

    #[error("price service returned an empty update payload")]
    EmptyPayload,

    #[error("malformed price service response: {0}")]
    Malformed(String),

    #[error("no price feeds requested")]
    NoFeeds,
}

/// A pending write that was included but not accepted, or whose outcome
/// could not be observed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationFailure {
    #[error("transaction {reference} reverted")]
    Reverted { reference: TxRef },

    #[error("lost track of transaction {reference}: {reason}")]
    Dropped { reference: TxRef, reason: String },
}

impl ConfirmationFailure {
    #[must_use]
    pub fn reference(&self) -> &TxRef {
        match self {
            Self::Reverted { reference } | Self::Dropped { reference, .. } => reference,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Confirmation(#[from] ConfirmationFailure),

    #[error("ledger read failed: {0}")]
    Ledger(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("action cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
