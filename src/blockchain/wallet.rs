//! Account derivation from mnemonics.
//!
//! # Security
//! - The mnemonic is used once for derivation and then dropped
//! - Signing keys live only inside an [`Account`] and are never logged
//! - Derivation failure is an error for the caller, never a panic

use alloy::primitives::Address;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable holding the operator mnemonic for single-user mode.
pub const MNEMONIC_ENV_VAR: &str = "WALLET_MNEMONIC";

/// A derived account: address plus the signing key that controls it.
///
/// Immutable once built; sessions share it behind an `Arc`.
#[derive(Clone)]
pub struct Account {
    address: Address,
    signer: PrivateKeySigner,
}

impl Account {
    /// Wrap an existing signer.
    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        Self {
            address: signer.address(),
            signer,
        }
    }

    /// The account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Signing key material for transaction signing.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derives accounts from mnemonic phrases.
pub trait WalletKeyProvider: Send + Sync {
    /// Deterministically derive the account for `mnemonic`.
    fn derive_account(&self, mnemonic: &str) -> BlockchainResult<Account>;
}

/// BIP-39 English mnemonics, BIP-44 path `m/44'/60'/0'/0/{index}`.
#[derive(Debug, Clone, Default)]
pub struct MnemonicKeyProvider {
    index: u32,
}

impl MnemonicKeyProvider {
    /// Derive the child at `index` instead of the first account.
    pub fn with_index(index: u32) -> Self {
        Self { index }
    }
}

impl WalletKeyProvider for MnemonicKeyProvider {
    fn derive_account(&self, mnemonic: &str) -> BlockchainResult<Account> {
        let phrase = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");
        if phrase.is_empty() {
            return Err(BlockchainError::Wallet("Mnemonic is empty".to_string()));
        }

        let signer = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .index(self.index)
            .and_then(|builder| builder.build())
            .map_err(|e| BlockchainError::Wallet(format!("Invalid mnemonic: {}", e)))?;

        let account = Account::from_signer(signer);
        tracing::debug!(address = %account.address(), "Account derived");
        Ok(account)
    }
}
