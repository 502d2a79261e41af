//! Ledger-agnostic domain logic.
//!
//! Contains the bet projection, exact amount handling, and the lifecycle
//! rules. Nothing here performs I/O.

pub mod bet;
pub mod error;
pub mod evidence;
pub mod id;
pub mod lifecycle;
pub mod money;

pub use bet::{Bet, BetStatus, Side};
pub use error::ValidationError;
pub use evidence::ResolutionEvidence;
pub use id::{BetId, FeedId, FlowId, TxRef};
pub use lifecycle::{
    BetLifecycle, CreateRequest, EndEpochRequest, LifecyclePolicy, Operation, StakeRequest,
    DEFAULT_THRESHOLD_DECIMALS,
};
pub use money::{Amount, NATIVE_DECIMALS};
