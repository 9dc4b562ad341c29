//! The three credential tiers as one configuration table.

use std::time::Duration;

/// An independent credential/token namespace. Each tier carries its own
/// secret key in the config store, its own storage-key prefix in the token
/// registry, and its own session lifetime.
///
/// Clients only ever see bare tokens; the prefix is a server-side storage
/// detail that keeps the namespaces from unlocking each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Full management session.
    Admin,
    /// Short-lived "show hidden links" unlock.
    Hidden,
    /// Private bookmarks page unlock.
    Bookmark,
}

impl Tier {
    /// Config-store key holding this tier's password hash.
    pub const fn secret_key(self) -> &'static str {
        match self {
            Self::Admin => "admin_password",
            Self::Hidden => "hidden_password",
            Self::Bookmark => "bookmark_password",
        }
    }

    /// Storage-key prefix inside the token registry.
    pub const fn token_prefix(self) -> &'static str {
        match self {
            Self::Admin => "",
            Self::Hidden => "hidden_",
            Self::Bookmark => "bookmark_",
        }
    }

    /// Session lifetime. Unlock tokens are deliberately short: they open a
    /// view for the current page load, they are not long-lived sessions.
    pub const fn ttl(self) -> Duration {
        match self {
            Self::Admin => Duration::from_secs(30 * 60),
            Self::Hidden => Duration::from_secs(2 * 60),
            Self::Bookmark => Duration::from_secs(5 * 60),
        }
    }

    /// Lifetime in seconds, as reported to clients in `expires_in`.
    pub const fn expires_in(self) -> u64 {
        self.ttl().as_secs()
    }

    /// Registry key for a bare token presented by a client.
    pub fn storage_key(self, token: &str) -> String {
        format!("{}{token}", self.token_prefix())
    }
}
