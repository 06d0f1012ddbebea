//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tower-http layers)
//!     → session gate (see crate::session)
//!     → handlers.rs
//!         → forms.rs (parse & validate input)
//!         → ChainClient (balance, transfer, mint)
//!         → views.rs (render HTML)
//!     → Send to client
//! ```

pub mod forms;
pub mod handlers;
pub mod server;
pub mod views;

pub use server::{AppState, HttpServer};
