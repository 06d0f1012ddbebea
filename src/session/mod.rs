//! Session and authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → gate.rs (exempt path? pass : resolve account or 303 /login)
//!         → binding.rs (per-session store or single-user slot)
//!             → cookie.rs (session token from `Cookie`)
//!             → store.rs (token → Arc<Account>, TTL)
//!     → handler extracts CurrentAccount
//! ```
//!
//! The cookie carries only an opaque token; mnemonics never leave the login
//! handler.

pub mod binding;
pub mod cookie;
pub mod gate;
pub mod store;

pub use binding::{AccountBinding, SharedAccount};
pub use cookie::CookieSettings;
pub use gate::{is_exempt, session_gate, CurrentAccount, SessionGate, LOGIN_PATH, LOGOUT_PATH};
pub use store::{SessionError, SessionId, SessionStore};
