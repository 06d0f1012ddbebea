//! Web wallet front-end library.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::schema::WalletConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
