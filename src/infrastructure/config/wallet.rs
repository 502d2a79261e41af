//! Wallet configuration for signing ledger writes.

use serde::{Deserialize, Serialize};

/// Wallet configuration.
/// The private key is loaded from `WALLET_PRIVATE_KEY` at runtime, never from the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WalletConfig {
    /// Optional path to an encrypted keystore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystore_path: Option<String>,
    /// Private key resolved at load time.
    #[serde(skip)]
    pub private_key: Option<String>,
}

impl WalletConfig {
    #[must_use]
    pub fn has_signer(&self) -> bool {
        self.private_key.is_some()
    }
}
