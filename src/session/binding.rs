//! Account binding: which account a request acts as.
//!
//! Two policies, chosen by configuration:
//! - per-session: the session cookie names a server-side session holding
//!   the account
//! - single-user: one process-wide slot, replaced atomically on login and
//!   cleared on logout
//!
//! Both hand out `Arc<Account>` snapshots, so a request keeps a consistent
//! account even if another request logs in or out meanwhile.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::http::{HeaderMap, HeaderValue};

use crate::blockchain::Account;
use crate::session::cookie::CookieSettings;
use crate::session::store::{SessionError, SessionStore};

/// Process-wide account slot for single-user mode.
#[derive(Debug, Default)]
pub struct SharedAccount {
    slot: ArcSwapOption<Account>,
}

impl SharedAccount {
    pub fn new(initial: Option<Arc<Account>>) -> Self {
        Self {
            slot: ArcSwapOption::new(initial),
        }
    }

    pub fn bind(&self, account: Arc<Account>) {
        self.slot.store(Some(account));
    }

    pub fn clear(&self) {
        self.slot.store(None);
    }

    pub fn current(&self) -> Option<Arc<Account>> {
        self.slot.load_full()
    }
}

/// The configured binding policy.
#[derive(Debug)]
pub enum AccountBinding {
    PerSession {
        store: SessionStore,
        cookie: CookieSettings,
    },
    SingleUser(SharedAccount),
}

impl AccountBinding {
    /// The account the request is authenticated as, if any.
    pub fn resolve(&self, headers: &HeaderMap) -> Option<Arc<Account>> {
        match self {
            AccountBinding::PerSession { store, cookie } => {
                cookie.session_id(headers).and_then(|id| store.get(&id))
            }
            AccountBinding::SingleUser(shared) => shared.current(),
        }
    }

    /// Bind `account` after a successful login.
    ///
    /// Any session the caller already presents is replaced, so its token
    /// stops authenticating. Returns the `Set-Cookie` value to send, when
    /// the policy uses one.
    pub fn bind(
        &self,
        headers: &HeaderMap,
        account: Arc<Account>,
    ) -> Result<Option<HeaderValue>, SessionError> {
        match self {
            AccountBinding::PerSession { store, cookie } => {
                let id = store.create(account)?;
                if let Some(previous) = cookie.session_id(headers) {
                    store.remove(&previous);
                }
                Ok(Some(cookie.issue(&id)))
            }
            AccountBinding::SingleUser(shared) => {
                shared.bind(account);
                Ok(None)
            }
        }
    }

    /// Forget the binding for this caller.
    ///
    /// Returns the `Set-Cookie` value to send, when the policy uses one.
    pub fn unbind(&self, headers: &HeaderMap) -> Option<HeaderValue> {
        match self {
            AccountBinding::PerSession { store, cookie } => {
                if let Some(id) = cookie.session_id(headers) {
                    store.remove(&id);
                }
                Some(cookie.expire())
            }
            AccountBinding::SingleUser(shared) => {
                shared.clear();
                None
            }
        }
    }

    /// Session store backing per-session mode.
    pub fn session_store(&self) -> Option<&SessionStore> {
        match self {
            AccountBinding::PerSession { store, .. } => Some(store),
            AccountBinding::SingleUser(_) => None,
        }
    }
}
