//! Composition root: builds the service graph from a [`Config`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::memory::MemoryLedger;
use crate::adapter::outbound::notifier::LogNotifier;
use crate::adapter::outbound::pyth::HermesClient;
use crate::application::{FlowTracker, WagerService};
use crate::domain::BetLifecycle;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::{Config, LedgerKind};
use crate::port::{LedgerGateway, Notifier, NotifierRegistry, PriceOracle};

/// Build notifier registry: the log notifier plus any caller-supplied sinks.
pub fn build_notifier_registry(extra: Vec<Box<dyn Notifier>>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    for notifier in extra {
        registry.register(notifier);
    }
    registry
}

/// Build the configured ledger gateway.
///
/// # Errors
///
/// Returns an error if the ledger settings or the signing key are invalid.
pub fn build_ledger(config: &Config) -> Result<Arc<dyn LedgerGateway>> {
    let fee = config
        .ledger
        .protocol_fee()
        .map_err(|e| ConfigError::InvalidValue {
            field: "ledger.protocol_fee",
            reason: e.to_string(),
        })?;

    match config.ledger.kind {
        LedgerKind::Memory => {
            info!("Using in-process ledger");
            Ok(Arc::new(MemoryLedger::new(fee)))
        }
        LedgerKind::Evm => build_evm_ledger(config),
    }
}

#[cfg(feature = "evm")]
fn build_evm_ledger(config: &Config) -> Result<Arc<dyn LedgerGateway>> {
    use std::str::FromStr;

    use alloy_signer_local::PrivateKeySigner;

    use crate::adapter::outbound::evm::EvmLedger;

    let signer = config
        .wallet
        .private_key
        .as_deref()
        .map(|key| {
            PrivateKeySigner::from_str(key.trim()).map_err(|e| ConfigError::InvalidValue {
                field: "WALLET_PRIVATE_KEY",
                reason: e.to_string(),
            })
        })
        .transpose()?;
    if signer.is_none() {
        info!("No wallet configured, ledger is read-only");
    }

    Ok(Arc::new(EvmLedger::connect(&config.ledger, signer)?))
}

#[cfg(not(feature = "evm"))]
fn build_evm_ledger(_config: &Config) -> Result<Arc<dyn LedgerGateway>> {
    Err(ConfigError::InvalidValue {
        field: "ledger.kind",
        reason: "the evm ledger requires the evm feature".to_string(),
    }
    .into())
}

/// Build the price oracle client.
#[must_use]
pub fn build_oracle(config: &Config) -> Arc<dyn PriceOracle> {
    Arc::new(HermesClient::from_config(&config.oracle))
}

/// Assemble a [`WagerService`] around the given connections.
///
/// # Errors
///
/// Returns an error if the lifecycle parameters or feed ids are invalid.
pub fn assemble_service(
    config: &Config,
    ledger: Arc<dyn LedgerGateway>,
    oracle: Arc<dyn PriceOracle>,
    notifiers: NotifierRegistry,
) -> Result<WagerService> {
    let invalid = |field: &'static str, e: crate::domain::ValidationError| {
        ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }
    };
    let policy = config
        .ledger
        .policy()
        .map_err(|e| invalid("ledger.protocol_fee", e))?;
    let feeds = config
        .oracle
        .feeds()
        .map_err(|e| invalid("oracle.feed_ids", e))?;
    let tracker =
        FlowTracker::new(Arc::new(notifiers)).with_explorer(config.ledger.explorer_tx_url.clone());

    Ok(WagerService::new(
        BetLifecycle::new(policy),
        ledger,
        oracle,
        tracker,
        feeds,
    ))
}

/// Build the full service from configuration.
///
/// # Errors
///
/// Returns an error if any component cannot be built.
pub fn build_service(config: &Config, extra: Vec<Box<dyn Notifier>>) -> Result<WagerService> {
    let ledger = build_ledger(config)?;
    let oracle = build_oracle(config);
    let service = assemble_service(config, ledger, oracle, build_notifier_registry(extra))?;
    info!(
        ledger = service.ledger_name(),
        feeds = service.feeds().len(),
        "Service ready"
    );
    Ok(service)
}
