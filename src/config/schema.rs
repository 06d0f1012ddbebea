//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the web wallet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Session and login policy.
    pub session: SessionConfig,

    /// Blockchain node and faucet settings.
    pub blockchain: BlockchainConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,

    /// Directory served under `/css/`, `/js/` and `/images/`.
    pub assets_dir: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            session: SessionConfig::default(),
            blockchain: BlockchainConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
            assets_dir: "assets".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address: "0.0.0.0:8080", "localhost:8080", or ":8080" for
    /// every interface.
    pub bind_address: String,
}

impl ListenerConfig {
    /// The address to hand to the listener, with a bare ":port" widened to
    /// all interfaces.
    pub fn socket_address(&self) -> String {
        if self.bind_address.starts_with(':') {
            format!("0.0.0.0{}", self.bind_address)
        } else {
            self.bind_address.clone()
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// How an authenticated account is bound to incoming requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BindingMode {
    /// Each browser session gets its own account, keyed by the session cookie.
    PerSession,
    /// One account for the whole process, shared by every caller.
    SingleUser,
}

/// Session and login configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: BindingMode,

    /// Redirect unauthenticated callers to `/login`.
    pub login_required: bool,

    /// Name of the cookie carrying the session token.
    pub cookie_name: String,

    /// Session lifetime in seconds.
    pub ttl_secs: u64,

    /// Mark the session cookie `Secure` (HTTPS deployments).
    pub secure_cookie: bool,

    /// Interval between expired-session sweeps in seconds.
    pub purge_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: BindingMode::PerSession,
            login_required: true,
            cookie_name: "libra".to_string(),
            ttl_secs: 24 * 60 * 60,
            secure_cookie: false,
            purge_interval_secs: 300,
        }
    }
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID used when signing transfers.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Faucet service endpoint used by `/mint`.
    pub faucet_url: String,

    /// Base units per coin for faucet mints.
    pub mint_unit_scale: u64,

    /// Block the transfer response until the receipt is available.
    pub wait_for_receipt: bool,

    /// Maximum wait for a transfer receipt in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            faucet_url: "http://localhost:8000/mint".to_string(),
            mint_unit_scale: 1_000_000,
            wait_for_receipt: true,
            receipt_timeout_secs: 30,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Bind address of the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}
