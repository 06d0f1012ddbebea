//! Session cookie encoding.
//!
//! Only the session token ever goes into a cookie.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::session::store::SessionId;

/// Attributes shared by every session cookie the server sets.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub max_age_secs: u64,
    pub secure: bool,
}

impl CookieSettings {
    /// Find the session token in the request's `Cookie` headers.
    pub fn session_id(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| SessionId::parse(value.trim_matches('"')))
    }

    /// `Set-Cookie` value that stores `id` for the session lifetime.
    pub fn issue(&self, id: &SessionId) -> HeaderValue {
        self.render(&id.to_string(), self.max_age_secs)
    }

    /// `Set-Cookie` value that makes the browser drop the session cookie.
    pub fn expire(&self) -> HeaderValue {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age: u64) -> HeaderValue {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        // Name is validated at config load and the value is a hex token.
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::session::store::SessionStore;
    use alloy::signers::local::PrivateKeySigner;
    use std::sync::Arc;

    fn settings() -> CookieSettings {
        CookieSettings {
            name: "libra".to_string(),
            max_age_secs: 86_400,
            secure: false,
        }
    }

    fn new_id() -> SessionId {
        let store = SessionStore::new(Duration::from_secs(60));
        store.create(Arc::new(crate::blockchain::Account::from_signer(
            PrivateKeySigner::random(),
        )))
        .unwrap()
    }

    #[test]
    fn test_issue_attributes() {
        let id = new_id();
        let value = settings().issue(&id);
        let value = value.to_str().unwrap();
        assert!(value.starts_with(&format!("libra={};", id)));
        assert!(value.contains("Max-Age=86400"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn test_secure_flag() {
        let mut s = settings();
        s.secure = true;
        assert!(s.expire().to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_expire() {
        let value = settings().expire();
        assert!(value.to_str().unwrap().starts_with("libra=; Path=/; Max-Age=0"));
    }

    #[test]
    fn test_session_id_from_headers() {
        let id = new_id();
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_str(&format!("other=1; libra={}", id)).unwrap(),
        );
        assert_eq!(settings().session_id(&headers), Some(id));
    }

    #[test]
    fn test_missing_or_garbage_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(settings().session_id(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("libra=garbage"));
        assert_eq!(settings().session_id(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("librarian=x"));
        assert_eq!(settings().session_id(&headers), None);
    }
}
