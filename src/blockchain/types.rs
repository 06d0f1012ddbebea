//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Invalid mnemonic or key derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Faucet service rejected or failed the mint.
    #[error("Faucet error: {0}")]
    Faucet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Transaction was mined but reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Transaction was broadcast but its receipt did not arrive in time.
    #[error("Transaction {tx_hash} submitted but not confirmed: {reason}")]
    Unconfirmed { tx_hash: TxHash, reason: String },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// On-chain state of an account at the time of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub address: Address,
    /// Next transaction sequence number (the account nonce).
    pub sequence_number: u64,
    /// Balance in base units.
    pub balance: U256,
}

/// A validated coin transfer, ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    /// Amount in base units.
    pub amount: u64,
    pub gas_unit_price: u64,
    pub max_gas_amount: u64,
}
