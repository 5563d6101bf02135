//! Database connection setup
//!
//! Opens the SQLite file backing the deck store, creating it (and its parent
//! folder) on first use.

use crate::error::{Result, StorageResultExt, StoreOperation};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every pooled connection
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open a connection pool on `db_path`, creating the database if it is missing
///
/// Schema creation is not done here; see [`crate::db::schema::ensure_schema`].
pub async fn open_pool(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(sqlx::Error::Io)
            .during(StoreOperation::Open)?;
    }

    // WAL lets readers proceed while a save is being written
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .during(StoreOperation::Open)?;

    if newly_created {
        info!("Initialized new deck database: {}", db_path.display());
    } else {
        info!("Opened existing deck database: {}", db_path.display());
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_missing_file_and_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("carta.db");

        let pool = open_pool(&db_path).await.unwrap();
        assert!(db_path.exists());

        let journal: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(journal.to_lowercase(), "wal");
        pool.close().await;
    }
}
