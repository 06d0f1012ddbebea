//! Startup orchestration.
//!
//! Builds the collaborators in dependency order: key provider, account
//! binding (deriving the operator account in single-user mode), chain
//! client, then the HTTP server. Any error here is fatal to startup.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::blockchain::wallet::MNEMONIC_ENV_VAR;
use crate::blockchain::{
    BlockchainClient, BlockchainError, ChainClient, MnemonicKeyProvider, WalletKeyProvider,
};
use crate::config::{BindingMode, SessionConfig, WalletConfig};
use crate::http::HttpServer;
use crate::session::{AccountBinding, CookieSettings, SessionStore, SharedAccount};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("blockchain client: {0}")]
    Blockchain(#[from] BlockchainError),

    #[error("operator account from {var}: {source}")]
    OperatorAccount {
        var: &'static str,
        source: BlockchainError,
    },
}

/// Build the account binding for `config`.
///
/// `operator_mnemonic` seeds the single-user slot; it is ignored in
/// per-session mode.
pub fn build_binding(
    config: &SessionConfig,
    keys: &dyn WalletKeyProvider,
    operator_mnemonic: Option<&str>,
) -> Result<AccountBinding, StartupError> {
    match config.mode {
        BindingMode::PerSession => {
            if operator_mnemonic.is_some() {
                tracing::warn!(
                    var = MNEMONIC_ENV_VAR,
                    "Operator mnemonic ignored in per-session mode"
                );
            }
            Ok(AccountBinding::PerSession {
                store: SessionStore::new(Duration::from_secs(config.ttl_secs)),
                cookie: CookieSettings {
                    name: config.cookie_name.clone(),
                    max_age_secs: config.ttl_secs,
                    secure: config.secure_cookie,
                },
            })
        }
        BindingMode::SingleUser => {
            let initial = match operator_mnemonic {
                Some(mnemonic) => {
                    let account = keys.derive_account(mnemonic).map_err(|source| {
                        StartupError::OperatorAccount {
                            var: MNEMONIC_ENV_VAR,
                            source,
                        }
                    })?;
                    tracing::info!(address = %account.address(), "Operator account bound");
                    Some(Arc::new(account))
                }
                None => None,
            };
            Ok(AccountBinding::SingleUser(SharedAccount::new(initial)))
        }
    }
}

/// Initialize every subsystem and return a server ready to run.
pub async fn bootstrap(config: WalletConfig) -> Result<HttpServer, StartupError> {
    let keys: Arc<dyn WalletKeyProvider> = Arc::new(MnemonicKeyProvider::default());

    let operator_mnemonic = std::env::var(MNEMONIC_ENV_VAR).ok();
    let binding = build_binding(&config.session, keys.as_ref(), operator_mnemonic.as_deref())?;

    let chain: Arc<dyn ChainClient> =
        Arc::new(BlockchainClient::new(config.blockchain.clone()).await?);

    Ok(HttpServer::new(config, chain, keys, binding))
}
