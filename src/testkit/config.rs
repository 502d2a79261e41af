//! Canonical test configurations.

/// Contract address used by test configs.
pub const TEST_CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Config for the in-process ledger.
#[must_use]
pub fn memory_toml() -> String {
    r#"
[logging]
level = "warn"

[ledger]
kind = "memory"
explorer_tx_url = "https://explorer.test/tx/"
"#
    .to_string()
}

/// Config for an EVM ledger at `rpc_url`, with the oracle at `hermes_url`.
#[must_use]
pub fn evm_toml(rpc_url: &str, hermes_url: &str) -> String {
    format!(
        r#"
[ledger]
kind = "evm"
rpc_url = "{rpc_url}"
contract_address = "{TEST_CONTRACT}"

[oracle]
hermes_url = "{hermes_url}"
"#
    )
}
