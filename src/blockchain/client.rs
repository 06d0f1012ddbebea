//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Query account state (sequence number and balance)
//! - Sign and submit transfers for a session's account
//! - Forward faucet mints
//! - Rebuild the provider set on demand after failures

use std::sync::Arc;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::faucet::FaucetClient;
use crate::blockchain::transaction::build_transfer;
use crate::blockchain::types::{
    AccountState, BlockchainConfig, BlockchainError, BlockchainResult, ChainId, TransferRequest,
};
use crate::blockchain::wallet::Account;
use crate::observability::metrics;

/// The chain operations the wallet front-end relies on.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current sequence number and balance of `address`.
    async fn get_account_state(&self, address: Address) -> BlockchainResult<AccountState>;

    /// Sign `request` with `account` at `sequence_number` and submit it.
    async fn transfer_coins(
        &self,
        account: &Account,
        sequence_number: u64,
        request: &TransferRequest,
    ) -> BlockchainResult<TxHash>;

    /// Credit `receiver` with `amount` base units through the faucet.
    async fn mint_with_faucet(&self, receiver: Address, amount: U256) -> BlockchainResult<()>;

    /// Drop existing connections and start over.
    async fn reconnect(&self) -> BlockchainResult<()>;
}

type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Primary + failover providers; swapped whole on reconnect.
    providers: Arc<ArcSwap<Vec<SharedProvider>>>,
    faucet: FaucetClient,
    config: BlockchainConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Fails only on malformed URLs; an unreachable node is logged and the
    /// client is still returned.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let providers = build_providers(&config)?;
        let faucet = FaucetClient::new(&config.faucet_url, timeout_duration)?;

        let client = Self {
            providers: Arc::new(ArcSwap::from_pointee(providers)),
            faucet,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let providers = self.providers.load_full();
        for (i, provider) in providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the transaction count (sequence number) for an address.
    pub async fn get_sequence_number(&self, address: Address) -> BlockchainResult<u64> {
        let providers = self.providers.load_full();
        for (i, provider) in providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_transaction_count(address)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc(
            "All providers failed to get sequence number".to_string(),
        ))
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        let providers = self.providers.load_full();
        for (i, provider) in providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_balance(address)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get balance".to_string()))
    }
}

#[async_trait]
impl ChainClient for BlockchainClient {
    async fn get_account_state(&self, address: Address) -> BlockchainResult<AccountState> {
        let result = self.fetch_account_state(address).await;
        metrics::record_rpc_call("account_state", result.is_ok());
        result
    }

    async fn transfer_coins(
        &self,
        account: &Account,
        sequence_number: u64,
        request: &TransferRequest,
    ) -> BlockchainResult<TxHash> {
        let result = self.submit_transfer(account, sequence_number, request).await;
        metrics::record_rpc_call("transfer", result.is_ok());
        result
    }

    async fn mint_with_faucet(&self, receiver: Address, amount: U256) -> BlockchainResult<()> {
        let result = self.faucet.mint(receiver, amount).await;
        metrics::record_rpc_call("mint", result.is_ok());
        result
    }

    async fn reconnect(&self) -> BlockchainResult<()> {
        let providers = build_providers(&self.config)?;
        self.providers.store(Arc::new(providers));
        metrics::record_client_reconnect();
        tracing::info!(rpc_url = %self.config.rpc_url, "Blockchain client reinitialized");
        Ok(())
    }
}

impl BlockchainClient {
    async fn fetch_account_state(&self, address: Address) -> BlockchainResult<AccountState> {
        let sequence_number = self.get_sequence_number(address).await?;
        let balance = self.get_balance(address).await?;
        Ok(AccountState {
            address,
            sequence_number,
            balance,
        })
    }

    async fn submit_transfer(
        &self,
        account: &Account,
        sequence_number: u64,
        request: &TransferRequest,
    ) -> BlockchainResult<TxHash> {
        let tx = build_transfer(account, sequence_number, request, self.config.chain_id);

        let url: url::Url = self.config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", self.config.rpc_url, e))
        })?;
        let signing_provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(account.signer().clone()))
            .connect_http(url);

        let pending = match timeout(self.timeout_duration, signing_provider.send_transaction(tx)).await
        {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(BlockchainError::Rpc(format!("Transfer rejected: {}", e))),
            Err(_) => return Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        };
        let tx_hash = *pending.tx_hash();

        tracing::info!(
            tx_hash = %tx_hash,
            from = %account.address(),
            to = %request.to,
            amount = request.amount,
            sequence_number,
            "Transfer submitted"
        );

        if !self.config.wait_for_receipt {
            return Ok(tx_hash);
        }

        let receipt = pending
            .with_timeout(Some(Duration::from_secs(self.config.receipt_timeout_secs)))
            .get_receipt()
            .await
            .map_err(|e| BlockchainError::Unconfirmed {
                tx_hash,
                reason: e.to_string(),
            })?;

        if !receipt.status() {
            return Err(BlockchainError::Reverted(tx_hash.to_string()));
        }

        Ok(tx_hash)
    }
}

fn build_providers(config: &BlockchainConfig) -> BlockchainResult<Vec<SharedProvider>> {
    let mut providers = Vec::new();

    let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
        BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
    })?;
    providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as SharedProvider);

    for url_str in &config.failover_urls {
        if let Ok(url) = url_str.parse() {
            providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as SharedProvider);
        } else {
            tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
        }
    }

    Ok(providers)
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("faucet_url", &self.faucet.url().as_str())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BlockchainConfig {
        BlockchainConfig {
            rpc_url: "http://127.0.0.1:1".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 2,
            faucet_url: "http://127.0.0.1:1/mint".to_string(),
            mint_unit_scale: 1_000_000,
            wait_for_receipt: false,
            receipt_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_client_creation_tolerates_unreachable_node() {
        let result = BlockchainClient::new(test_config()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_rpc_url() {
        let mut config = test_config();
        config.rpc_url = "not a url".to_string();
        let err = BlockchainClient::new(config).await.unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_rpc_failover_exhausted() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());

        let client = BlockchainClient::new(config).await.unwrap();
        let result = client.get_chain_id().await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("All RPC providers failed"));
    }

    #[tokio::test]
    async fn test_reconnect_rebuilds_providers() {
        let mut config = test_config();
        config.failover_urls.push("http://127.0.0.1:2".to_string());
        let client = BlockchainClient::new(config).await.unwrap();

        let before = client.providers.load_full();
        client.reconnect().await.unwrap();
        let after = client.providers.load_full();

        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 2);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn test_account_state_fails_without_node() {
        let client = BlockchainClient::new(test_config()).await.unwrap();
        let result = client.get_account_state(Address::ZERO).await;
        assert!(matches!(result, Err(BlockchainError::Rpc(_))));
    }
}
