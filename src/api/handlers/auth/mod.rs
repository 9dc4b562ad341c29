//! Access control: tiers, lockout, tokens and guards.
//!
//! Three credential tiers (admin, hidden-links, bookmarks) share one token
//! registry and one per-IP lockout tracker.
//!
//! ## Lockout
//!
//! Five failed credential checks from an address lock it out of every
//! login-style endpoint for fifteen minutes. One counter covers all tiers,
//! and a success from the address clears it. Status probes
//! (`/api/check-init`, `/api/bookmarks/check`) never touch the counter.
//!
//! ## Tokens
//!
//! Tokens are opaque random strings namespaced per tier inside the registry
//! (`hidden_`/`bookmark_` storage prefixes, invisible to clients). They are
//! in-memory only and short-lived: a restart or the tier TTL ends them.
//! When the `ip_binding_enabled` flag is set, a session only validates from
//! the address it was issued to.

pub(crate) mod csrf;
pub(crate) mod guard;
pub(crate) mod init;
mod lockout;
pub(crate) mod login;
mod password;
pub(crate) mod passwords;
mod registry;
mod state;
mod tier;
pub(crate) mod types;
pub(crate) mod unlock;
mod utils;

pub use guard::{authorize, AdminSession, BookmarkAccess};
pub use lockout::{LockoutDecision, LockoutTracker};
pub use password::{hash_password, is_strong_password, verify_password, verify_tier};
pub use registry::{TokenError, TokenRegistry};
pub use state::AuthState;
pub use tier::Tier;
pub use utils::{bearer_token, client_ip};
