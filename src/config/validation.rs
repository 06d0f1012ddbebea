//! Configuration validation.
//!
//! Serde handles the syntactic checks; this module checks value ranges and
//! formats. Every problem is collected so one run reports all of them.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};

use crate::config::schema::WalletConfig;

/// Upper bound on `session.ttl_secs` (ten years).
pub const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `session.ttl_secs`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let resolves = config
        .listener
        .socket_address()
        .to_socket_addrs()
        .map(|mut addrs| addrs.next().is_some())
        .unwrap_or(false);
    if !resolves {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a bindable address", config.listener.bind_address),
        ));
    }

    if !is_cookie_token(&config.session.cookie_name) {
        errors.push(ValidationError::new(
            "session.cookie_name",
            format!("'{}' is not a valid cookie name", config.session.cookie_name),
        ));
    }
    if config.session.ttl_secs == 0 {
        errors.push(ValidationError::new("session.ttl_secs", "must be greater than 0"));
    } else if config.session.ttl_secs > MAX_SESSION_TTL_SECS {
        errors.push(ValidationError::new(
            "session.ttl_secs",
            format!("must be at most {}", MAX_SESSION_TTL_SECS),
        ));
    }
    if config.session.purge_interval_secs == 0 {
        errors.push(ValidationError::new(
            "session.purge_interval_secs",
            "must be greater than 0",
        ));
    }

    let chain = &config.blockchain;
    if url::Url::parse(&chain.rpc_url).is_err() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}' is not a URL", chain.rpc_url),
        ));
    }
    if chain.failover_urls.iter().any(|u| url::Url::parse(u).is_err()) {
        errors.push(ValidationError::new(
            "blockchain.failover_urls",
            "contains an entry that is not a URL",
        ));
    }
    if url::Url::parse(&chain.faucet_url).is_err() {
        errors.push(ValidationError::new(
            "blockchain.faucet_url",
            format!("'{}' is not a URL", chain.faucet_url),
        ));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.rpc_timeout_secs",
            "must be greater than 0",
        ));
    }
    if chain.mint_unit_scale == 0 {
        errors.push(ValidationError::new(
            "blockchain.mint_unit_scale",
            "must be greater than 0",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// RFC 6265 token: visible ASCII without separators.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&WalletConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = WalletConfig::default();
        config.listener.bind_address = "not-an-addr".to_string();
        config.session.ttl_secs = 0;
        config.blockchain.rpc_url = "::".to_string();
        config.blockchain.mint_unit_scale = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "session.ttl_secs",
                "blockchain.rpc_url",
                "blockchain.mint_unit_scale",
            ]
        );
    }

    #[test]
    fn test_session_ttl_upper_bound() {
        let mut config = WalletConfig::default();
        config.session.ttl_secs = MAX_SESSION_TTL_SECS;
        assert!(validate_config(&config).is_ok());

        config.session.ttl_secs = u64::MAX;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "session.ttl_secs");
    }

    #[test]
    fn test_bind_address_forms() {
        let mut config = WalletConfig::default();
        for accepted in ["127.0.0.1:8080", "[::1]:8080", ":8080", "localhost:8080"] {
            config.listener.bind_address = accepted.to_string();
            assert!(validate_config(&config).is_ok(), "{}", accepted);
        }
        for rejected in ["8080", "127.0.0.1", ""] {
            config.listener.bind_address = rejected.to_string();
            assert!(validate_config(&config).is_err(), "{}", rejected);
        }
    }

    #[test]
    fn test_cookie_name() {
        assert!(is_cookie_token("libra"));
        assert!(!is_cookie_token(""));
        assert!(!is_cookie_token("bad name"));
        assert!(!is_cookie_token("a;b"));
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = WalletConfig::default();
        config.observability.metrics_address = "nope".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
