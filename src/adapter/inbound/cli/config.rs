//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::{Config, LedgerKind};

/// Default config template with documentation.
pub const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

fn read(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
    Config::parse_unresolved(&content)
}

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    if output::is_json() {
        output::json_output(json!({
            "command": "config.init",
            "path": path.display().to_string(),
        }));
        return Ok(());
    }
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Set WALLET_PRIVATE_KEY or wallet.keystore_path");
    output::note(&format!(
        "3. Run: wagerline --config {} config validate",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let mut config = read(path)?;
    let wallet = config.resolve_wallet();

    if output::is_json() {
        let rendered: toml::Value = toml::from_str(&config.to_toml()?).map_err(ConfigError::Parse)?;
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "config": rendered,
            "wallet_loaded": config.wallet.has_signer(),
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Path", path.display());

    output::section("Ledger");
    output::field("Kind", config.ledger.kind);
    if config.ledger.kind == LedgerKind::Evm {
        output::field("RPC", &config.ledger.rpc_url);
        output::field("Chain ID", config.ledger.chain_id);
        output::field("Contract", &config.ledger.contract_address);
    }
    output::field("Protocol fee", &config.ledger.protocol_fee);
    output::field("Threshold dp", config.ledger.threshold_decimals);
    if config.ledger.explorer_tx_url.is_empty() {
        output::field("Explorer", "(disabled)");
    } else {
        output::field("Explorer", &config.ledger.explorer_tx_url);
    }

    output::section("Oracle");
    output::field("Hermes", &config.oracle.hermes_url);
    for feed in &config.oracle.feed_ids {
        output::field("Feed", feed);
    }
    output::field(
        "Timeout",
        format!(
            "{}ms (connect {}ms)",
            config.oracle.http.timeout_ms, config.oracle.http.connect_timeout_ms
        ),
    );
    output::field("Attempts", config.oracle.http.retry_max_attempts);

    output::section("Wallet");
    match wallet {
        Ok(()) if config.wallet.has_signer() => output::success("Private key loaded"),
        Ok(()) => output::warning("No private key; ledger writes are disabled"),
        Err(e) => output::warning(&format!("Keystore could not be unlocked: {e}")),
    }

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = read(path)?;

    let mut warnings = Vec::new();
    if config.ledger.kind == LedgerKind::Memory {
        warnings.push("ledger.kind is memory; bets are lost when the process exits".to_string());
    }
    if config.ledger.explorer_tx_url.is_empty() {
        warnings.push("ledger.explorer_tx_url is empty; no explorer links".to_string());
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
            "warnings": warnings,
        }));
        return Ok(());
    }

    output::section("Config Validation");
    output::field("Path", path.display());
    output::success("Config file is valid");
    if !warnings.is_empty() {
        output::section("Warnings");
        for warning in &warnings {
            output::warning(warning);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_temp_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp directory")
    }

    #[test]
    fn test_config_template_is_a_valid_config() {
        let config = Config::parse_unresolved(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.ledger.kind, LedgerKind::Memory);
        assert_eq!(config.ledger.chain_id, 2810);
    }

    #[test]
    fn test_execute_init_creates_parent_directories() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        execute_init(&config_path, false).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_init_respects_existing_file() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "existing content").unwrap();

        assert!(execute_init(&config_path, false).is_err());
        assert_eq!(fs::read_to_string(&config_path).unwrap(), "existing content");

        execute_init(&config_path, true).unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), CONFIG_TEMPLATE);
    }

    #[test]
    fn test_execute_validate_reports_invalid_files() {
        let temp_dir = create_temp_dir();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[ledger]\nkind = \"evm\"\n").unwrap();

        assert!(execute_validate(&config_path).is_err());
        assert!(execute_validate(&temp_dir.path().join("missing.toml")).is_err());
    }
}
