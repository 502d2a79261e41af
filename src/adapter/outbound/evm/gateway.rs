//! [`LedgerGateway`] backed by the wager contract.

use std::str::FromStr;

use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::network::{Ethereum, EthereumWallet, ReceiptResponse};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_signer::Signer as _;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, info};

use super::contract::Wager;
use crate::domain::{Amount, Bet, BetId, CreateRequest, EndEpochRequest, StakeRequest, TxRef};
use crate::error::{ConfigError, ConfirmationFailure, Error, Result, SubmissionError};
use crate::infrastructure::config::LedgerConfig;
use crate::port::{LedgerGateway, Receipt, SubmissionHandle};

/// Wager contract reached over JSON-RPC.
///
/// Without a signer the ledger is read-only: `list_bets` works and every
/// write fails with [`SubmissionError::Wallet`].
pub struct EvmLedger {
    provider: DynProvider,
    contract: Address,
    sender: Option<Address>,
}

impl EvmLedger {
    /// Connect to the contract described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC URL or contract address is invalid.
    pub fn connect(config: &LedgerConfig, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let rpc_url: url::Url =
            config
                .rpc_url
                .parse()
                .map_err(|e: url::ParseError| ConfigError::InvalidValue {
                    field: "ledger.rpc_url",
                    reason: e.to_string(),
                })?;
        let contract = parse_address(&config.contract_address)?;

        let (provider, sender) = match signer {
            Some(signer) => {
                let signer = signer.with_chain_id(Some(config.chain_id));
                let sender = signer.address();
                let wallet = EthereumWallet::from(signer);
                let provider = ProviderBuilder::new()
                    .wallet(wallet)
                    .connect_http(rpc_url)
                    .erased();
                (provider, Some(sender))
            }
            None => (ProviderBuilder::new().connect_http(rpc_url).erased(), None),
        };

        info!(
            contract = %contract,
            chain_id = config.chain_id,
            sender = ?sender,
            "Connected to wager contract"
        );
        Ok(Self {
            provider,
            contract,
            sender,
        })
    }

    /// Address writes are sent from, if a wallet is loaded.
    #[must_use]
    pub const fn sender(&self) -> Option<Address> {
        self.sender
    }

    fn require_wallet(&self) -> std::result::Result<(), SubmissionError> {
        if self.sender.is_none() {
            return Err(SubmissionError::Wallet(
                "no private key or keystore configured".into(),
            ));
        }
        Ok(())
    }

    fn contract(&self) -> Wager::WagerInstance<&DynProvider> {
        Wager::new(self.contract, &self.provider)
    }
}

fn parse_address(value: &str) -> Result<Address> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: "ledger.contract_address",
        }
        .into());
    }
    Address::from_str(value.trim()).map_err(|e| {
        ConfigError::InvalidValue {
            field: "ledger.contract_address",
            reason: e.to_string(),
        }
        .into()
    })
}

fn to_u256(amount: Amount) -> U256 {
    U256::from(amount.units())
}

fn to_amount(value: U256, field: &str) -> Result<Amount> {
    u128::try_from(value)
        .map(Amount::from_units)
        .map_err(|_| Error::Ledger(format!("{field} does not fit in 128 bits: {value}")))
}

fn to_bet(info: Wager::BetInfo) -> Result<Bet> {
    let id = u64::try_from(info.id)
        .map_err(|_| Error::Ledger(format!("bet id does not fit in 64 bits: {}", info.id)))?;
    Ok(Bet::new(
        BetId::new(id),
        info.title,
        to_amount(info.threshold, "threshold")?,
        to_amount(info.totalPoolForExceed, "totalPoolForExceed")?,
        to_amount(info.totalPoolForNotExceed, "totalPoolForNotExceed")?,
        info.epochEnded,
    ))
}

fn rejected(action: &str, err: impl std::fmt::Display) -> SubmissionError {
    SubmissionError::Rejected(format!("{action}: {err}"))
}

/// Wrap a sent transaction into a handle that resolves on its receipt.
fn track(pending: PendingTransactionBuilder<Ethereum>) -> SubmissionHandle {
    let reference = TxRef::new(format!("{:?}", pending.tx_hash()));
    let watched = reference.clone();
    debug!(tx = %reference, "Transaction sent");

    SubmissionHandle::new(reference, async move {
        match pending.get_receipt().await {
            Ok(receipt) if receipt.status() => Ok(Receipt {
                reference: watched,
                block_number: receipt.block_number(),
            }),
            Ok(_) => Err(ConfirmationFailure::Reverted { reference: watched }),
            Err(e) => Err(ConfirmationFailure::Dropped {
                reference: watched,
                reason: e.to_string(),
            }),
        }
    })
}

#[async_trait]
impl LedgerGateway for EvmLedger {
    async fn create_bet(
        &self,
        request: &CreateRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        self.require_wallet()?;
        let pending = self
            .contract()
            .createBet(request.title.clone(), to_u256(request.threshold))
            .send()
            .await
            .map_err(|e| rejected("createBet", e))?;
        Ok(track(pending))
    }

    async fn place_stake(
        &self,
        request: &StakeRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        self.require_wallet()?;
        let pending = self
            .contract()
            .placeBet(U256::from(request.bet_id.value()), request.side.as_flag())
            .value(to_u256(request.amount))
            .send()
            .await
            .map_err(|e| rejected("placeBet", e))?;
        Ok(track(pending))
    }

    async fn end_epoch(
        &self,
        request: &EndEpochRequest,
    ) -> std::result::Result<SubmissionHandle, SubmissionError> {
        self.require_wallet()?;
        let updates: Vec<Bytes> = request
            .evidence
            .updates()
            .iter()
            .map(|update| Bytes::copy_from_slice(update))
            .collect();
        let pending = self
            .contract()
            .endEpoch(U256::from(request.bet_id.value()), updates)
            .value(to_u256(request.fee))
            .send()
            .await
            .map_err(|e| rejected("endEpoch", e))?;
        Ok(track(pending))
    }

    async fn list_bets(&self) -> Result<Vec<Bet>> {
        let infos = self
            .contract()
            .getAllBets()
            .call()
            .await
            .map_err(|e| Error::Ledger(format!("getAllBets: {e}")))?;
        infos.into_iter().map(to_bet).collect()
    }

    fn ledger_name(&self) -> &'static str {
        "evm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: u64, ended: bool) -> Wager::BetInfo {
        Wager::BetInfo {
            id: U256::from(id),
            title: "ETH > 5000".to_string(),
            threshold: U256::from(5000u64),
            totalPoolForExceed: U256::from(3u64),
            totalPoolForNotExceed: U256::ZERO,
            epochEnded: ended,
        }
    }

    #[test]
    fn bet_info_maps_to_domain_bet() {
        let bet = to_bet(info(4, true)).unwrap();
        assert_eq!(bet.id(), BetId::new(4));
        assert_eq!(bet.title(), "ETH > 5000");
        assert_eq!(bet.threshold(), Amount::from_units(5000));
        assert_eq!(bet.pool_exceed(), Amount::from_units(3));
        assert!(bet.epoch_ended());
    }

    #[test]
    fn default_threshold_goes_on_the_wire_as_typed() {
        let request = crate::domain::BetLifecycle::default()
            .validate_create("ETH > 5000", "5000")
            .unwrap();
        assert_eq!(to_u256(request.threshold), U256::from(5000u64));
    }

    #[test]
    fn oversized_pool_is_a_ledger_error() {
        let mut oversized = info(1, false);
        oversized.totalPoolForExceed = U256::MAX;
        assert!(matches!(to_bet(oversized), Err(Error::Ledger(_))));
    }

    #[test]
    fn contract_address_is_required() {
        assert!(matches!(
            parse_address("  "),
            Err(Error::Config(ConfigError::MissingField { .. }))
        ));
        assert!(matches!(
            parse_address("0x1234"),
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").is_ok());
    }
}
