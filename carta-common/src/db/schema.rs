//! Deck store schema and versioned upgrades
//!
//! The schema version is tracked in the `schema_version` table. Every upgrade
//! step is idempotent (`IF NOT EXISTS`, `INSERT OR IGNORE`), so running
//! [`ensure_schema`] twice, or from two openers of the same file, is harmless.
//!
//! # Adding an upgrade
//!
//! 1. Never modify an existing `migrate_vN`; existing databases rely on it.
//! 2. Add `migrate_vN+1`, wire it into [`ensure_schema`], bump
//!    [`CURRENT_SCHEMA_VERSION`].

use crate::error::{Result, StorageResultExt, StoreOperation};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Name of the table holding one row per deck
pub const DECKS_TABLE: &str = "decks";

async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name=?
        )
        "#,
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .during(StoreOperation::Schema)
}

/// Whether the `decks` table is present
pub async fn decks_table_exists(pool: &SqlitePool) -> Result<bool> {
    table_exists(pool, DECKS_TABLE).await
}

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    if !table_exists(pool, "schema_version").await? {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await
            .during(StoreOperation::Schema)?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await
        .during(StoreOperation::Schema)?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .during(StoreOperation::Schema)?;

    Ok(())
}

/// Bring the schema up to [`CURRENT_SCHEMA_VERSION`]
///
/// A recorded version with a missing `decks` table (dropped out from under
/// us) is treated as out of date and the table is recreated.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;
    let has_decks = decks_table_exists(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION && has_decks {
        info!("Deck store schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Deck store schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        if has_decks {
            return Ok(());
        }
    }

    if !has_decks && current_version > 0 {
        warn!("Deck store schema v{} recorded but decks table is missing, recreating", current_version);
    }

    info!(
        "Upgrading deck store schema: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    create_schema_version_table(pool).await?;

    if current_version < 1 || !has_decks {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    Ok(())
}

/// Migration v1: decks table keyed by id, plus a lookup index on name
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS decks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            cover_image TEXT,
            cards TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .during(StoreOperation::Schema)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_decks_name ON decks(name)")
        .execute(pool)
        .await
        .during(StoreOperation::Schema)?;

    Ok(())
}
