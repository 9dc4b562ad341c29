//! Shared auth state injected into every request.

use super::lockout::LockoutTracker;
use super::registry::TokenRegistry;

/// Owns the in-memory token registry and the lockout tracker. Built once at
/// startup and shared via `Extension<Arc<AuthState>>`; its lifecycle is the
/// process lifecycle, so a restart drops every session and lockout record.
#[derive(Debug, Default)]
pub struct AuthState {
    attempts: LockoutTracker,
    tokens: TokenRegistry,
}

impl AuthState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attempts(&self) -> &LockoutTracker {
        &self.attempts
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }
}
