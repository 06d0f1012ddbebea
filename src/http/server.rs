//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (session gate, tracing, limits, request ID, headers)
//! - Serve static assets
//! - Sweep expired sessions in the background
//! - Bind server to listener and shut down gracefully

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::{ChainClient, WalletKeyProvider};
use crate::config::WalletConfig;
use crate::http::handlers;
use crate::session::{session_gate, AccountBinding, SessionGate};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainClient>,
    pub keys: Arc<dyn WalletKeyProvider>,
    pub binding: Arc<AccountBinding>,
    pub mint_unit_scale: u64,
}

/// HTTP server for the wallet.
pub struct HttpServer {
    router: Router,
    config: WalletConfig,
    binding: Arc<AccountBinding>,
}

impl HttpServer {
    /// Create a new HTTP server from its collaborators.
    pub fn new(
        config: WalletConfig,
        chain: Arc<dyn ChainClient>,
        keys: Arc<dyn WalletKeyProvider>,
        binding: AccountBinding,
    ) -> Self {
        let binding = Arc::new(binding);
        let state = AppState {
            chain,
            keys,
            binding: binding.clone(),
            mint_unit_scale: config.blockchain.mint_unit_scale,
        };
        let gate = SessionGate {
            binding: binding.clone(),
            login_required: config.session.login_required,
        };

        let router = Self::build_router(&config, state, gate);
        Self {
            router,
            config,
            binding,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &WalletConfig, state: AppState, gate: SessionGate) -> Router {
        let assets = Path::new(&config.assets_dir);

        let mut router = Router::new()
            .route("/", get(handlers::balance))
            .route("/login", get(handlers::login_form).post(handlers::login_submit))
            .route("/logout", get(handlers::logout))
            .route(
                "/transfer",
                get(handlers::transfer_form).post(handlers::transfer_submit),
            )
            .route("/mint", get(handlers::mint_form).post(handlers::mint_submit))
            .route("/events", get(handlers::events))
            .nest_service("/css", ServeDir::new(assets.join("css")))
            .nest_service("/js", ServeDir::new(assets.join("js")))
            .nest_service("/images", ServeDir::new(assets.join("images")))
            .fallback(handlers::not_found)
            .with_state(state)
            // Gate runs before any handler, fallback included.
            .layer(middleware::from_fn_with_state(gate, session_gate))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        if config.security.enable_headers {
            router = router
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ));
        }

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.session.mode,
            login_required = self.config.session.login_required,
            "HTTP server starting"
        );

        if let Some(store) = self.binding.session_store() {
            let store = store.clone();
            let every = Duration::from_secs(self.config.session.purge_interval_secs);
            let purge_shutdown = shutdown.resubscribe();
            tokio::spawn(async move {
                store.run_purger(every, purge_shutdown).await;
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
