//! Password hashing and tier-level credential verification.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a per-password random salt, stored as
//! `pbkdf2-sha256$<rounds>$<salt>$<hash>` (base64, URL-safe, no padding).
//! The round count makes verification deliberately slow, so brute force is
//! expensive even without the lockout in front of it.

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use sqlx::SqlitePool;

use super::tier::Tier;
use crate::api::config_store::get_config;

const SCHEME: &str = "pbkdf2-sha256";
const PBKDF2_ROUNDS: u32 = 600_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Hash a plaintext password for storage in the config store.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .context("failed to generate password salt")?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ROUNDS, &mut hash);

    Ok(format!(
        "{SCHEME}${PBKDF2_ROUNDS}${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(hash)
    ))
}

/// Verify a plaintext password against a stored hash string.
///
/// Malformed stored values verify as `false` rather than erroring; a
/// corrupted hash must never grant access.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(rounds), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (URL_SAFE_NO_PAD.decode(salt), URL_SAFE_NO_PAD.decode(hash))
    else {
        return false;
    };

    let mut derived = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, rounds, &mut derived);
    derived == expected
}

/// At least 8 characters mixing letters and digits.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Verify a plaintext password against `tier`'s stored hash.
///
/// The hidden tier falls back to the admin hash when no dedicated secret is
/// configured. Returns `false` when no hash is configured at all.
pub async fn verify_tier(pool: &SqlitePool, tier: Tier, password: &str) -> Result<bool> {
    let stored = match tier {
        Tier::Hidden => match get_config(pool, Tier::Hidden.secret_key()).await? {
            Some(hash) => Some(hash),
            None => get_config(pool, Tier::Admin.secret_key()).await?,
        },
        _ => get_config(pool, tier.secret_key()).await?,
    };

    Ok(stored.is_some_and(|hash| verify_password(password, &hash)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config_store::{set_config, tests::test_pool};

    #[test]
    fn hash_then_verify_round_trips() {
        let stored = hash_password("abc12345").unwrap();
        assert!(verify_password("abc12345", &stored));
        assert!(!verify_password("abc12346", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("abc12345").unwrap();
        let second = hash_password("abc12345").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn stored_format_is_tagged() {
        let stored = hash_password("abc12345").unwrap();
        assert!(stored.starts_with("pbkdf2-sha256$600000$"));
        assert!(!stored.contains("abc12345"));
    }

    #[test]
    fn malformed_stored_hashes_never_verify() {
        assert!(!verify_password("abc12345", ""));
        assert!(!verify_password("abc12345", "plaintext"));
        assert!(!verify_password("abc12345", "md5$1$AAAA$BBBB"));
        assert!(!verify_password("abc12345", "pbkdf2-sha256$x$AAAA$BBBB"));
        assert!(!verify_password("abc12345", "pbkdf2-sha256$1000$!!$!!"));
        assert!(!verify_password("abc12345", "pbkdf2-sha256$1000$AAAA$BBBB$extra"));
    }

    #[test]
    fn strength_policy_requires_length_letter_and_digit() {
        assert!(is_strong_password("abc12345"));
        assert!(is_strong_password("Pass1234"));
        assert!(!is_strong_password(""));
        assert!(!is_strong_password("abc123"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("12345678"));
    }

    #[tokio::test]
    async fn tier_verify_reads_its_own_secret() {
        let pool = test_pool().await;
        set_config(&pool, "admin_password", &hash_password("admin123").unwrap())
            .await
            .unwrap();

        assert!(verify_tier(&pool, Tier::Admin, "admin123").await.unwrap());
        assert!(!verify_tier(&pool, Tier::Admin, "wrong123").await.unwrap());
    }

    #[tokio::test]
    async fn hidden_tier_falls_back_to_admin_until_configured() {
        let pool = test_pool().await;
        set_config(&pool, "admin_password", &hash_password("admin123").unwrap())
            .await
            .unwrap();

        // No hidden secret yet: the admin password unlocks the tier.
        assert!(verify_tier(&pool, Tier::Hidden, "admin123").await.unwrap());

        set_config(&pool, "hidden_password", &hash_password("peek1234").unwrap())
            .await
            .unwrap();

        // Once set and different, the admin password stops working.
        assert!(verify_tier(&pool, Tier::Hidden, "peek1234").await.unwrap());
        assert!(!verify_tier(&pool, Tier::Hidden, "admin123").await.unwrap());
    }

    #[tokio::test]
    async fn unconfigured_tier_verifies_as_false() {
        let pool = test_pool().await;
        assert!(!verify_tier(&pool, Tier::Bookmark, "whatever1").await.unwrap());
        assert!(!verify_tier(&pool, Tier::Hidden, "whatever1").await.unwrap());
    }
}
