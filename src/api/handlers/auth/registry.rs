//! In-memory token registry: issues, validates and expires bearer tokens.
//!
//! Sessions are exclusively owned by the registry; nothing else mutates them.
//! Expired entries are reclaimed lazily on lookup, with an opportunistic
//! sweep on issue to bound growth from abandoned unlock tokens.

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;

use super::tier::Tier;

/// Why a presented token was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// No session under that key (never issued, revoked, or already swept).
    Unknown,
    /// The session existed but its lifetime had elapsed; it is now deleted.
    Expired,
    /// IP binding is enforced and the request came from a different address.
    IpMismatch,
}

#[derive(Clone, Debug)]
struct Session {
    expires_at: Instant,
    bound_ip: Option<String>,
}

#[derive(Debug, Default)]
pub struct TokenRegistry {
    sessions: Mutex<HashMap<String, Session>>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for `tier`, optionally bound to the client IP
    /// observed at issuance. Returns the bare token; the tier prefix stays
    /// server-side.
    pub async fn issue(&self, tier: Tier, bound_ip: Option<String>) -> Result<String> {
        self.issue_at(tier, bound_ip, Instant::now()).await
    }

    pub(crate) async fn issue_at(
        &self,
        tier: Tier,
        bound_ip: Option<String>,
        now: Instant,
    ) -> Result<String> {
        let token = generate_token()?;
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, session| now < session.expires_at);
        sessions.insert(
            tier.storage_key(&token),
            Session {
                expires_at: now + tier.ttl(),
                bound_ip,
            },
        );
        Ok(token)
    }

    /// Validate a bare token against `tier`. `enforce_ip` carries the global
    /// IP-binding flag; the bound address is only checked when it is set and
    /// the session recorded one.
    pub async fn validate(
        &self,
        tier: Tier,
        token: &str,
        client_ip: Option<&str>,
        enforce_ip: bool,
    ) -> Result<(), TokenError> {
        self.validate_at(tier, token, client_ip, enforce_ip, Instant::now())
            .await
    }

    pub(crate) async fn validate_at(
        &self,
        tier: Tier,
        token: &str,
        client_ip: Option<&str>,
        enforce_ip: bool,
        now: Instant,
    ) -> Result<(), TokenError> {
        let key = tier.storage_key(token);
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.get(&key) else {
            return Err(TokenError::Unknown);
        };

        if now >= session.expires_at {
            sessions.remove(&key);
            return Err(TokenError::Expired);
        }

        if enforce_ip {
            if let Some(bound_ip) = &session.bound_ip {
                if client_ip != Some(bound_ip.as_str()) {
                    return Err(TokenError::IpMismatch);
                }
            }
        }

        Ok(())
    }

    /// Explicitly delete a session.
    pub async fn revoke(&self, tier: Tier, token: &str) {
        self.sessions.lock().await.remove(&tier.storage_key(token));
    }
}

/// 32 random bytes, URL-safe base64. Well above the 128-bit entropy floor.
fn generate_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
