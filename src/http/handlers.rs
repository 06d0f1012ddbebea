//! Request handlers.
//!
//! Each handler is a thin call-through to the chain client. Any RPC failure
//! reinitializes the client before the error is shown to the user.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::blockchain::BlockchainError;
use crate::http::forms::{LoginForm, MintForm, TransferForm};
use crate::http::server::AppState;
use crate::http::views;
use crate::observability::metrics;
use crate::session::{CurrentAccount, LOGIN_PATH};

pub async fn balance(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Response {
    match state.chain.get_account_state(account.address()).await {
        Ok(acc) => views::balance_page(
            acc.address,
            acc.sequence_number,
            acc.balance,
            state.mint_unit_scale,
        )
        .into_response(),
        Err(e) => {
            tracing::error!(address = %account.address(), error = %e, "Failed to get account state");
            reconnect(&state).await;
            (
                StatusCode::BAD_GATEWAY,
                views::error_page(&format!("failed to get account state: {}", e)),
            )
                .into_response()
        }
    }
}

pub async fn login_form() -> Response {
    views::login_page(None).into_response()
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    if form.mnemonic.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            views::login_page(Some("mnemonic is required")),
        )
            .into_response();
    }

    // PBKDF2 seed stretching is CPU-bound.
    let keys = state.keys.clone();
    let derived = tokio::task::spawn_blocking(move || keys.derive_account(&form.mnemonic)).await;

    let account = match derived {
        Ok(Ok(account)) => Arc::new(account),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Login rejected");
            metrics::record_login(false);
            return (
                StatusCode::UNAUTHORIZED,
                views::login_page(Some(&format!("login failed: {}", e))),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Key derivation task failed");
            metrics::record_login(false);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                views::login_page(Some("login failed: internal error")),
            )
                .into_response();
        }
    };

    let address = account.address();
    match state.binding.bind(&headers, account) {
        Ok(cookie) => {
            tracing::info!(address = %address, "Login succeeded");
            metrics::record_login(true);
            redirect_with_cookie("/", cookie)
        }
        Err(e) => {
            tracing::error!(address = %address, error = %e, "Failed to start session");
            metrics::record_login(false);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                views::login_page(Some(&format!("login failed: {}", e))),
            )
                .into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie = state.binding.unbind(&headers);
    tracing::info!("Logged out");
    redirect_with_cookie(LOGIN_PATH, cookie)
}

pub async fn transfer_form(CurrentAccount(account): CurrentAccount) -> Response {
    views::transfer_page(account.address()).into_response()
}

pub async fn transfer_submit(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Form(form): Form<TransferForm>,
) -> Response {
    let request = match form.parse() {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected transfer form");
            return transfer_failed(StatusCode::BAD_REQUEST, &e);
        }
    };

    // Sequence number must be fresh for every transfer.
    let sequence_number = match state.chain.get_account_state(account.address()).await {
        Ok(acc) => acc.sequence_number,
        Err(e) => {
            tracing::error!(address = %account.address(), error = %e, "Failed to get sequence number");
            reconnect(&state).await;
            return transfer_failed(StatusCode::BAD_GATEWAY, &e);
        }
    };

    match state
        .chain
        .transfer_coins(&account, sequence_number, &request)
        .await
    {
        Ok(tx_hash) => views::transfer_result_page("transfer succeeded", Some(tx_hash)).into_response(),
        // Already broadcast; a retry would reuse a spent sequence number.
        Err(BlockchainError::Unconfirmed { tx_hash, reason }) => {
            tracing::warn!(tx_hash = %tx_hash, reason = %reason, "Transfer not yet confirmed");
            (
                StatusCode::ACCEPTED,
                views::transfer_result_page("transfer submitted, not yet confirmed", Some(tx_hash)),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(address = %account.address(), error = %e, "Failed to transfer");
            reconnect(&state).await;
            transfer_failed(StatusCode::BAD_GATEWAY, &e)
        }
    }
}

pub async fn mint_form(CurrentAccount(account): CurrentAccount) -> Response {
    views::mint_page(account.address()).into_response()
}

/// Always redirects home; failures are only logged.
pub async fn mint_submit(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Form(form): Form<MintForm>,
) -> Response {
    let mint = match form.parse(account.address(), state.mint_unit_scale) {
        Ok(mint) => mint,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected mint form");
            return Redirect::to("/").into_response();
        }
    };

    if let Err(e) = state.chain.mint_with_faucet(mint.receiver, mint.amount).await {
        tracing::error!(receiver = %mint.receiver, error = %e, "Failed to mint");
        reconnect(&state).await;
    }

    Redirect::to("/").into_response()
}

pub async fn events(CurrentAccount(account): CurrentAccount) -> Response {
    views::events_page(account.address()).into_response()
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, views::error_page("page not found")).into_response()
}

async fn reconnect(state: &AppState) {
    if let Err(e) = state.chain.reconnect().await {
        tracing::error!(error = %e, "Failed to reinitialize blockchain client");
    }
}

fn transfer_failed(status: StatusCode, error: &dyn std::fmt::Display) -> Response {
    (
        status,
        views::transfer_result_page(&format!("transfer failed: {}", error), None),
    )
        .into_response()
}

fn redirect_with_cookie(to: &str, cookie: Option<HeaderValue>) -> Response {
    let mut response = Redirect::to(to).into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
