//! Session gate middleware.
//!
//! Runs before routing. Exempt paths always pass; everything else needs an
//! authenticated account or gets a `303 See Other` to `/login`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::blockchain::Account;
use crate::observability::metrics;
use crate::session::binding::AccountBinding;

pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";

/// Path prefixes of static assets.
pub const STATIC_PREFIXES: [&str; 3] = ["/css/", "/js/", "/images/"];

/// Whether `path` bypasses authentication.
pub fn is_exempt(path: &str) -> bool {
    path == LOGIN_PATH
        || path == LOGOUT_PATH
        || STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// State for the session gate.
#[derive(Clone)]
pub struct SessionGate {
    pub binding: Arc<AccountBinding>,
    pub login_required: bool,
}

/// The authenticated account, attached to the request by the gate.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Arc<Account>);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

pub async fn session_gate(
    State(gate): State<SessionGate>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    match gate.binding.resolve(request.headers()) {
        Some(account) => {
            request.extensions_mut().insert(CurrentAccount(account));
            next.run(request).await
        }
        None if !gate.login_required => next.run(request).await,
        None => {
            tracing::debug!(path = %request.uri().path(), "Unauthenticated request, redirecting to login");
            metrics::record_gate_redirect();
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
