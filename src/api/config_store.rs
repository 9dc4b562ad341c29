//! Key-value config storage, the durable home of secrets and site settings.
//!
//! Password entries hold a salted hash, never plaintext. Flags are stored as
//! `"1"`/`"0"` strings.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Read one config value. `Ok(None)` when the key was never set.
pub async fn get_config(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM config WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to read config key {key}"))?;
    Ok(row.map(|(value,)| value))
}

/// Upsert one config value. Single-key writes only; no partial-write recovery.
pub async fn set_config(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO config (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(pool)
        .await
        .with_context(|| format!("failed to write config key {key}"))?;
    Ok(())
}

/// Read a boolean flag; unset keys and anything but `"1"` read as `false`.
pub async fn get_flag(pool: &SqlitePool, key: &str) -> Result<bool> {
    Ok(get_config(pool, key).await?.as_deref() == Some("1"))
}

pub async fn set_flag(pool: &SqlitePool, key: &str, value: bool) -> Result<()> {
    set_config(pool, key, if value { "1" } else { "0" }).await
}
