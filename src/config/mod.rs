//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (main.rs)
//!     → WalletConfig (validated, immutable)
//!     → shared with the HTTP server at startup
//! ```
//!
//! All fields have defaults, so the wallet runs without a config file.
//! Secrets (the operator mnemonic) are never read from the file.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BindingMode, BlockchainConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    SecurityConfig, SessionConfig, TimeoutConfig, WalletConfig,
};
pub use validation::{validate_config, ValidationError};
