//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate, handlers, chain client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! Mnemonics and signing keys never appear in either stream.

pub mod logging;
pub mod metrics;
