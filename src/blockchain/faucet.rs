//! Faucet service client.
//!
//! The faucet credits an address without a real transfer. The request is
//! `POST {faucet_url}?amount={base_units}&address={address}`; any non-2xx
//! status is a failed mint.

use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// HTTP client for a testnet faucet.
#[derive(Debug, Clone)]
pub struct FaucetClient {
    http: reqwest::Client,
    url: url::Url,
}

impl FaucetClient {
    /// Create a faucet client for `faucet_url`.
    pub fn new(faucet_url: &str, timeout: Duration) -> BlockchainResult<Self> {
        let url = faucet_url.parse().map_err(|e| {
            BlockchainError::Faucet(format!("Invalid faucet URL '{}': {}", faucet_url, e))
        })?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BlockchainError::Faucet(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { http, url })
    }

    /// Ask the faucet to credit `amount` base units to `receiver`.
    pub async fn mint(&self, receiver: Address, amount: U256) -> BlockchainResult<()> {
        let response = self
            .http
            .post(self.url.clone())
            .query(&[
                ("amount", amount.to_string()),
                ("address", receiver.to_string()),
            ])
            .send()
            .await
            .map_err(|e| BlockchainError::Faucet(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlockchainError::Faucet(format!(
                "faucet returned {}: {}",
                status,
                body.trim()
            )));
        }

        tracing::info!(receiver = %receiver, amount = %amount, "Faucet mint accepted");
        Ok(())
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        let err = FaucetClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("Invalid faucet URL"));
    }

    #[tokio::test]
    async fn test_unreachable_faucet_is_error() {
        let faucet = FaucetClient::new("http://127.0.0.1:1/mint", Duration::from_secs(1)).unwrap();
        let result = faucet.mint(Address::ZERO, U256::from(1u64)).await;
        assert!(matches!(result, Err(BlockchainError::Faucet(_))));
    }
}
