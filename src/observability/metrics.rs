//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_logins_total` (counter): login attempts by outcome
//! - `wallet_gate_redirects_total` (counter): requests bounced to `/login`
//! - `wallet_rpc_calls_total` (counter): chain calls by operation, outcome
//! - `wallet_client_reconnects_total` (counter): client reinitializations
//! - `wallet_active_sessions` (gauge): live sessions in the store
//!
//! Without an installed recorder every call here is a no-op, so handlers
//! and tests record unconditionally.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!("wallet_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_gate_redirect() {
    ::metrics::counter!("wallet_gate_redirects_total").increment(1);
}

pub fn record_rpc_call(op: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!("wallet_rpc_calls_total", "op" => op, "outcome" => outcome).increment(1);
}

pub fn record_client_reconnect() {
    ::metrics::counter!("wallet_client_reconnects_total").increment(1);
}

pub fn record_active_sessions(count: usize) {
    ::metrics::gauge!("wallet_active_sessions").set(count as f64);
}
