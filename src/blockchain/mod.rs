//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Mnemonic (login form or WALLET_MNEMONIC)
//!     → wallet.rs (derive Account: address + signer)
//!     → client.rs (account state, transfers, reconnect)
//!         → transaction.rs (build transfer with caller's sequence number)
//!         → faucet.rs (testnet mint)
//! ```
//!
//! # Security Constraints
//! - Mnemonics are used for derivation only and never stored
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod client;
pub mod faucet;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, ChainClient};
pub use types::{
    AccountState, BlockchainConfig, BlockchainError, BlockchainResult, ChainId, TransferRequest,
};
pub use wallet::{Account, MnemonicKeyProvider, WalletKeyProvider};
