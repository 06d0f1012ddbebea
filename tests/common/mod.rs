//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use tower::ServiceExt;

use web_wallet::blockchain::{
    Account, AccountState, BlockchainError, BlockchainResult, ChainClient, MnemonicKeyProvider,
    TransferRequest,
};
use web_wallet::config::{BindingMode, WalletConfig};
use web_wallet::lifecycle::build_binding;
use web_wallet::HttpServer;

/// Anvil/Hardhat development mnemonic.
pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
/// First address derived from [`TEST_MNEMONIC`].
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// A recorded transfer: sender, sequence number, request.
pub type TransferCall = (Address, u64, TransferRequest);

/// Chain client double that records every call.
#[derive(Default)]
pub struct MockChain {
    pub sequence_number: u64,
    pub balance: U256,
    pub fail_state: AtomicBool,
    pub fail_transfer: AtomicBool,
    pub unconfirmed_transfer: AtomicBool,
    pub fail_mint: AtomicBool,
    pub state_calls: AtomicUsize,
    pub reconnects: AtomicUsize,
    pub transfers: Mutex<Vec<TransferCall>>,
    pub mints: Mutex<Vec<(Address, U256)>>,
}

impl MockChain {
    pub fn new(sequence_number: u64, balance: u64) -> Arc<Self> {
        Arc::new(Self {
            sequence_number,
            balance: U256::from(balance),
            ..Self::default()
        })
    }

    pub fn transfers(&self) -> Vec<TransferCall> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn mints(&self) -> Vec<(Address, U256)> {
        self.mints.lock().unwrap().clone()
    }

    pub fn reconnect_count(&self) -> usize {
        self.reconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_account_state(&self, address: Address) -> BlockchainResult<AccountState> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_state.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("node unreachable".to_string()));
        }
        Ok(AccountState {
            address,
            sequence_number: self.sequence_number,
            balance: self.balance,
        })
    }

    async fn transfer_coins(
        &self,
        account: &Account,
        sequence_number: u64,
        request: &TransferRequest,
    ) -> BlockchainResult<TxHash> {
        self.transfers
            .lock()
            .unwrap()
            .push((account.address(), sequence_number, request.clone()));
        if self.fail_transfer.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("sequence number too old".to_string()));
        }
        if self.unconfirmed_transfer.load(Ordering::SeqCst) {
            return Err(BlockchainError::Unconfirmed {
                tx_hash: TxHash::repeat_byte(0xcd),
                reason: "receipt timed out".to_string(),
            });
        }
        Ok(TxHash::repeat_byte(0xab))
    }

    async fn mint_with_faucet(&self, receiver: Address, amount: U256) -> BlockchainResult<()> {
        self.mints.lock().unwrap().push((receiver, amount));
        if self.fail_mint.load(Ordering::SeqCst) {
            return Err(BlockchainError::Faucet("faucet returned 500".to_string()));
        }
        Ok(())
    }

    async fn reconnect(&self) -> BlockchainResult<()> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Build the full application router around `chain`.
pub fn test_app(mode: BindingMode, chain: Arc<MockChain>) -> Router {
    let mut config = WalletConfig::default();
    config.session.mode = mode;
    test_app_with_config(config, chain)
}

pub fn test_app_with_config(config: WalletConfig, chain: Arc<MockChain>) -> Router {
    let keys = Arc::new(MnemonicKeyProvider::default());
    let binding = build_binding(&config.session, keys.as_ref(), None).unwrap();
    HttpServer::new(config, chain, keys, binding).router()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(path: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// Log in with [`TEST_MNEMONIC`], returning the `name=value` cookie pair if
/// the server set one.
pub async fn login(app: &Router) -> Option<String> {
    login_with(app, None).await
}

/// Like [`login`], presenting `cookie` from an earlier session.
pub async fn login_with(app: &Router, cookie: Option<&str>) -> Option<String> {
    let mnemonic = TEST_MNEMONIC.replace(' ', "+");
    let response = send(app, post_form("/login", cookie, &format!("mnemonic={}", mnemonic))).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), Some("/"));
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location<B>(response: &Response<B>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
