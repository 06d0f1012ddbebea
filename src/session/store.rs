//! Server-side session storage.
//!
//! The browser only ever holds a [`SessionId`]; the account it unlocks
//! stays here. Entries expire after the configured TTL, checked on every
//! lookup and swept periodically by [`SessionStore::purge_expired`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::Instant;
use uuid::Uuid;

use crate::blockchain::Account;
use crate::observability::metrics;

/// Opaque session token carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token from a cookie value. Anything malformed is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::try_parse(value).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

#[derive(Debug)]
struct Session {
    account: Arc<Account>,
    expires_at: Instant,
}

/// Errors raised while managing sessions.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configured lifetime pushes the expiry past what the clock can represent.
    #[error("session lifetime of {0:?} is out of range")]
    TtlOutOfRange(Duration),
}

/// A thread-safe, TTL-bounded session map.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<DashMap<SessionId, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create an empty store whose sessions live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Start a session bound to `account` and return its token.
    pub fn create(&self, account: Arc<Account>) -> Result<SessionId, SessionError> {
        let expires_at = Instant::now()
            .checked_add(self.ttl)
            .ok_or(SessionError::TtlOutOfRange(self.ttl))?;
        let id = SessionId::generate();
        self.inner.insert(id, Session { account, expires_at });
        metrics::record_active_sessions(self.inner.len());
        Ok(id)
    }

    /// The account bound to `id`, if the session exists and has not expired.
    pub fn get(&self, id: &SessionId) -> Option<Arc<Account>> {
        let now = Instant::now();
        match self.inner.get(id) {
            None => return None,
            Some(session) if session.expires_at > now => return Some(session.account.clone()),
            Some(_) => {}
        }

        // Expired. The read guard must be released before removing.
        self.inner.remove_if(id, |_, s| s.expires_at <= now);
        metrics::record_active_sessions(self.inner.len());
        None
    }

    /// End a session. Returns whether it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.inner.remove(id).is_some();
        metrics::record_active_sessions(self.inner.len());
        removed
    }

    /// Drop every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, s| s.expires_at > now);
        let after = self.inner.len();
        metrics::record_active_sessions(after);
        before.saturating_sub(after)
    }

    /// Number of stored sessions, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sweep expired sessions every `every` until `shutdown` fires.
    pub async fn run_purger(self, every: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = self.purge_expired();
                    if purged > 0 {
                        tracing::debug!(purged, remaining = self.len(), "Purged expired sessions");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Session purger stopped");
                    return;
                }
            }
        }
    }
}
