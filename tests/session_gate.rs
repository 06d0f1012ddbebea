//! Session gate behaviour, checked against a counting inner handler.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use axum::{
    http::{HeaderMap, StatusCode},
    middleware,
    routing::any,
    Router,
};

use web_wallet::blockchain::Account;
use web_wallet::config::WalletConfig;
use web_wallet::session::{
    session_gate, AccountBinding, CookieSettings, SessionGate, SessionStore, SharedAccount,
};

mod common;

const EXEMPT: [&str; 5] = [
    "/login",
    "/logout",
    "/css/style.css",
    "/js/app.js",
    "/images/logo.png",
];
const PROTECTED: [&str; 6] = ["/", "/transfer", "/mint", "/events", "/anything/else", "/css"];

fn per_session() -> AccountBinding {
    AccountBinding::PerSession {
        store: SessionStore::new(Duration::from_secs(60)),
        cookie: CookieSettings {
            name: "libra".to_string(),
            max_age_secs: 60,
            secure: false,
        },
    }
}

/// A router whose every path hits a handler that bumps `hits`.
fn gated(binding: Arc<AccountBinding>, login_required: bool, hits: Arc<AtomicUsize>) -> Router {
    let handler = move || {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            "inner"
        }
    };
    Router::new()
        .route("/{*path}", any(handler.clone()))
        .route("/", any(handler))
        .layer(middleware::from_fn_with_state(
            SessionGate {
                binding,
                login_required,
            },
            session_gate,
        ))
}

fn bind_cookie(binding: &AccountBinding) -> String {
    let account = Arc::new(Account::from_signer(PrivateKeySigner::random()));
    let set_cookie = binding.bind(&HeaderMap::new(), account).unwrap().unwrap();
    set_cookie
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_exempt_paths_never_redirect() {
    let binding = Arc::new(per_session());
    let cookie = bind_cookie(&binding);
    let hits = Arc::new(AtomicUsize::new(0));
    let app = gated(binding, true, hits.clone());

    for path in EXEMPT {
        for cookie in [None, Some(cookie.as_str())] {
            let response = common::send(&app, common::get(path, cookie)).await;
            assert_eq!(response.status(), StatusCode::OK, "{} with cookie {:?}", path, cookie);
            assert!(common::location(&response).is_none());
        }
    }
    assert_eq!(hits.load(Ordering::SeqCst), EXEMPT.len() * 2);
}

#[tokio::test]
async fn test_unauthenticated_requests_redirect_without_reaching_handler() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = gated(Arc::new(per_session()), true, hits.clone());

    for path in PROTECTED {
        let response = common::send(&app, common::get(path, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(common::location(&response), Some("/login"));

        let response = common::send(&app, common::post_form(path, None, "a=b")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {}", path);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_or_stale_token_redirects() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = gated(Arc::new(per_session()), true, hits.clone());

    let forged = "libra=00000000000000000000000000000000";
    let response = common::send(&app, common::get("/", Some(forged))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let garbage = "libra=present good satochi coin";
    let response = common::send(&app, common::get("/", Some(garbage))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_authenticated_session_passes_through() {
    let binding = Arc::new(per_session());
    let cookie = bind_cookie(&binding);
    let hits = Arc::new(AtomicUsize::new(0));
    let app = gated(binding, true, hits.clone());

    for path in PROTECTED {
        let response = common::send(&app, common::get(path, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
        assert_eq!(common::body_text(response).await, "inner");
    }
    assert_eq!(hits.load(Ordering::SeqCst), PROTECTED.len());
}

#[tokio::test]
async fn test_single_user_slot_authenticates_everyone() {
    let binding = Arc::new(AccountBinding::SingleUser(SharedAccount::default()));
    let hits = Arc::new(AtomicUsize::new(0));
    let app = gated(binding.clone(), true, hits.clone());

    let response = common::send(&app, common::get("/", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    binding
        .bind(&HeaderMap::new(), Arc::new(Account::from_signer(PrivateKeySigner::random())))
        .unwrap();
    let response = common::send(&app, common::get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_not_required_passes_everything() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = gated(Arc::new(per_session()), false, hits.clone());

    for path in PROTECTED {
        let response = common::send(&app, common::get(path, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{}", path);
    }
    assert_eq!(hits.load(Ordering::SeqCst), PROTECTED.len());
}

#[tokio::test]
async fn test_static_assets_served_without_login() {
    let mut config = WalletConfig::default();
    config.assets_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/assets").to_string();
    let app = common::test_app_with_config(config, common::MockChain::new(0, 0));

    let response = common::send(&app, common::get("/css/style.css", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::location(&response).is_none());
    assert!(common::body_text(response).await.contains(".address"));

    let response = common::send(&app, common::get("/css/missing.css", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(common::location(&response).is_none());
}
