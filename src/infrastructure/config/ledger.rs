//! Ledger connection configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, LifecyclePolicy, ValidationError, DEFAULT_THRESHOLD_DECIMALS};

/// Morph Holesky public RPC endpoint.
pub const MORPH_HOLESKY_RPC_URL: &str = "https://rpc-quicknode-holesky.morphl2.io";

/// Morph Holesky chain id.
pub const MORPH_HOLESKY_CHAIN_ID: u64 = 2810;

/// Morph Holesky explorer transaction page prefix.
pub const MORPH_HOLESKY_EXPLORER_TX_URL: &str = "https://explorer-holesky.morphl2.io/tx/";

/// Which ledger implementation to connect to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    /// Wager contract on an EVM chain.
    #[default]
    Evm,
    /// In-process ledger, lost when the process exits.
    Memory,
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Evm => write!(f, "evm"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub kind: LedgerKind,
    /// JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Chain id writes are signed for.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Deployed wager contract. Required for the `evm` ledger.
    #[serde(default)]
    pub contract_address: String,
    /// Value attached to every end-epoch call, in native units.
    #[serde(default = "default_protocol_fee")]
    pub protocol_fee: String,
    /// Decimal places thresholds are scaled by. 0 sends them as typed.
    #[serde(default = "default_threshold_decimals")]
    pub threshold_decimals: u32,
    /// Prefix that turns a transaction reference into an explorer link.
    /// Empty disables links.
    #[serde(default = "default_explorer_tx_url")]
    pub explorer_tx_url: String,
}

fn default_rpc_url() -> String {
    MORPH_HOLESKY_RPC_URL.to_string()
}

const fn default_chain_id() -> u64 {
    MORPH_HOLESKY_CHAIN_ID
}

fn default_protocol_fee() -> String {
    "0.01".to_string()
}

const fn default_threshold_decimals() -> u32 {
    DEFAULT_THRESHOLD_DECIMALS
}

fn default_explorer_tx_url() -> String {
    MORPH_HOLESKY_EXPLORER_TX_URL.to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            kind: LedgerKind::default(),
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            contract_address: String::new(),
            protocol_fee: default_protocol_fee(),
            threshold_decimals: default_threshold_decimals(),
            explorer_tx_url: default_explorer_tx_url(),
        }
    }
}

impl LedgerConfig {
    /// The configured protocol fee as an exact native amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the fee is not a positive native amount.
    pub fn protocol_fee(&self) -> Result<Amount, ValidationError> {
        Amount::parse_native(&self.protocol_fee, "protocol_fee")
    }

    /// Lifecycle parameters derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the fee is invalid.
    pub fn policy(&self) -> Result<LifecyclePolicy, ValidationError> {
        Ok(LifecyclePolicy {
            threshold_decimals: self.threshold_decimals,
            protocol_fee: self.protocol_fee()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_morph_holesky() {
        let config = LedgerConfig::default();
        assert_eq!(config.kind, LedgerKind::Evm);
        assert_eq!(config.chain_id, 2810);
        assert_eq!(config.protocol_fee().unwrap().format_native(), "0.01");
        assert_eq!(config.policy().unwrap(), LifecyclePolicy::default());
    }

    #[test]
    fn invalid_fee_is_rejected() {
        let config = LedgerConfig {
            protocol_fee: "free".into(),
            ..LedgerConfig::default()
        };
        assert!(matches!(
            config.policy(),
            Err(ValidationError::InvalidNumber { field: "protocol_fee", .. })
        ));
    }
}
