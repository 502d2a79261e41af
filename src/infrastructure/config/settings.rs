//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the signing key comes from the
//! `WALLET_PRIVATE_KEY` environment variable or an encrypted keystore.
//!
//! # Example
//!
//! ```no_run
//! use wagerline::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ledger::{LedgerConfig, LedgerKind};
use super::logging::LoggingConfig;
use super::wallet::WalletConfig;
use crate::adapter::outbound::pyth::HermesConfig;
use crate::domain::NATIVE_DECIMALS;
use crate::error::{ConfigError, Result};

/// Environment variable holding the signing key.
pub const PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
/// Environment variable holding the keystore password.
pub const KEYSTORE_PASSWORD_ENV: &str = "WAGERLINE_KEYSTORE_PASSWORD";
/// Environment variable naming a file that holds the keystore password.
pub const KEYSTORE_PASSWORD_FILE_ENV: &str = "WAGERLINE_KEYSTORE_PASSWORD_FILE";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Ledger connection and lifecycle parameters.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Price oracle used to resolve epochs.
    #[serde(default)]
    pub oracle: HermesConfig,

    /// Wallet used for ledger writes.
    #[serde(default)]
    pub wallet: WalletConfig,
}

fn read_keystore_password() -> Result<String> {
    if let Ok(password) = std::env::var(KEYSTORE_PASSWORD_ENV) {
        return Ok(password);
    }
    if let Ok(path) = std::env::var(KEYSTORE_PASSWORD_FILE_ENV) {
        let contents = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let password = contents.trim().to_string();
        if password.is_empty() {
            return Err(ConfigError::MissingField {
                field: KEYSTORE_PASSWORD_FILE_ENV,
            }
            .into());
        }
        return Ok(password);
    }

    Err(ConfigError::MissingField {
        field: KEYSTORE_PASSWORD_ENV,
    }
    .into())
}

#[cfg(feature = "evm")]
fn decrypt_keystore_private_key(path: &str, password: &str) -> Result<String> {
    use alloy_signer_local::PrivateKeySigner;

    let signer = PrivateKeySigner::decrypt_keystore(path, password).map_err(|e| {
        ConfigError::InvalidValue {
            field: "wallet.keystore_path",
            reason: e.to_string(),
        }
    })?;
    Ok(format!("{:x}", signer.to_bytes()))
}

#[cfg(not(feature = "evm"))]
fn decrypt_keystore_private_key(_path: &str, _password: &str) -> Result<String> {
    Err(ConfigError::InvalidValue {
        field: "wallet.keystore_path",
        reason: "keystore support requires the evm feature".to_string(),
    }
    .into())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the private key from `WALLET_PRIVATE_KEY`, or decrypts it from
    /// the keystore when `wallet.keystore_path` is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., an unparseable protocol fee)
    /// - Keystore decryption fails when using keystore authentication
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config = Self::parse_unresolved(content)?;
        config.resolve_wallet()?;
        Ok(config)
    }

    /// Parse and validate TOML content without touching the wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed or fails validation.
    #[allow(clippy::result_large_err)]
    pub fn parse_unresolved(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Fill `wallet.private_key` from the environment or the keystore.
    ///
    /// # Errors
    ///
    /// Returns an error if a keystore is configured but cannot be unlocked.
    #[allow(clippy::result_large_err)]
    pub fn resolve_wallet(&mut self) -> Result<()> {
        // Never from the config file
        self.wallet.private_key = std::env::var(PRIVATE_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if self.wallet.private_key.is_none() {
            if let Some(ref keystore_path) = self.wallet.keystore_path {
                let password = read_keystore_password()?;
                self.wallet.private_key =
                    Some(decrypt_keystore_private_key(keystore_path, &password)?);
            }
        }
        Ok(())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let ledger = &self.ledger;
        if ledger.kind == LedgerKind::Evm {
            if ledger.rpc_url.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "ledger.rpc_url",
                }
                .into());
            }
            url::Url::parse(&ledger.rpc_url).map_err(|e| invalid("ledger.rpc_url", e.to_string()))?;
            if ledger.contract_address.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "ledger.contract_address",
                }
                .into());
            }
            if !is_address(&ledger.contract_address) {
                return Err(invalid(
                    "ledger.contract_address",
                    "must be 0x followed by 40 hex digits",
                ));
            }
        }
        ledger
            .protocol_fee()
            .map_err(|e| invalid("ledger.protocol_fee", e.to_string()))?;
        if ledger.threshold_decimals > NATIVE_DECIMALS {
            return Err(invalid(
                "ledger.threshold_decimals",
                format!("must be at most {NATIVE_DECIMALS}"),
            ));
        }

        let oracle = &self.oracle;
        if oracle.hermes_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "oracle.hermes_url",
            }
            .into());
        }
        url::Url::parse(&oracle.hermes_url)
            .map_err(|e| invalid("oracle.hermes_url", e.to_string()))?;
        if oracle.feed_ids.is_empty() {
            return Err(ConfigError::MissingField {
                field: "oracle.feed_ids",
            }
            .into());
        }
        oracle
            .feeds()
            .map_err(|e| invalid("oracle.feed_ids", e.to_string()))?;
        if oracle.http.timeout_ms == 0 || oracle.http.connect_timeout_ms == 0 {
            return Err(invalid("oracle.http", "timeouts must be greater than 0"));
        }
        if oracle.http.retry_max_attempts == 0 {
            return Err(invalid(
                "oracle.http.retry_max_attempts",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Render as TOML for display. The private key is never included.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| invalid("config", e.to_string()))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn is_address(value: &str) -> bool {
    let value = value.trim();
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .is_some_and(|digits| digits.len() == 40 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn evm_config(extra: &str) -> String {
        format!(
            r#"
[ledger]
kind = "evm"
contract_address = "{CONTRACT}"
{extra}
"#
        )
    }

    #[test]
    fn memory_ledger_needs_no_sections() {
        let config = Config::parse_unresolved("[ledger]\nkind = \"memory\"\n").unwrap();
        assert_eq!(config.ledger.kind, LedgerKind::Memory);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.oracle.feed_ids.len(), 1);
    }

    #[test]
    fn evm_ledger_requires_contract_address() {
        let err = Config::parse_unresolved("").unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Config(ConfigError::MissingField {
                field: "ledger.contract_address"
            })
        ));
        assert!(Config::parse_unresolved(&evm_config("")).is_ok());
    }

    #[test]
    fn malformed_contract_address_is_rejected() {
        let toml = "[ledger]\ncontract_address = \"0x1234\"\n";
        assert!(matches!(
            Config::parse_unresolved(toml),
            Err(crate::error::Error::Config(ConfigError::InvalidValue {
                field: "ledger.contract_address",
                ..
            }))
        ));
    }

    #[test]
    fn protocol_fee_must_be_positive() {
        for fee in ["0", "-0.01", "abc"] {
            let toml = evm_config(&format!("protocol_fee = \"{fee}\""));
            assert!(Config::parse_unresolved(&toml).is_err(), "fee {fee:?}");
        }
        let config = Config::parse_unresolved(&evm_config("protocol_fee = \"0.02\"")).unwrap();
        assert_eq!(config.ledger.protocol_fee().unwrap().format_native(), "0.02");
    }

    #[test]
    fn threshold_decimals_are_capped() {
        let toml = evm_config("threshold_decimals = 19");
        assert!(Config::parse_unresolved(&toml).is_err());
    }

    #[test]
    fn feed_ids_are_validated() {
        let toml = format!("{}\n[oracle]\nfeed_ids = [\"0xabc\"]\n", evm_config(""));
        assert!(Config::parse_unresolved(&toml).is_err());

        let toml = format!("{}\n[oracle]\nfeed_ids = []\n", evm_config(""));
        assert!(Config::parse_unresolved(&toml).is_err());
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let toml = format!("{}\n[oracle.http]\ntimeout_ms = 0\n", evm_config(""));
        assert!(Config::parse_unresolved(&toml).is_err());
    }

    #[test]
    fn rendered_config_parses_back() {
        let config = Config::parse_unresolved(&evm_config("")).unwrap();
        let rendered = config.to_toml().unwrap();
        assert!(!rendered.contains("private_key"));
        let reparsed = Config::parse_unresolved(&rendered).unwrap();
        assert_eq!(reparsed.ledger.contract_address, CONTRACT);
    }
}
