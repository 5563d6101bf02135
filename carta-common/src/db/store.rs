//! Deck store
//!
//! Durable mapping from deck id to deck definition, one row per deck.
//!
//! The connection pool is an explicit resource held by [`DeckStore`]. Every
//! operation goes through [`DeckStore::initialize`], which reuses the pool
//! while it is healthy and transparently reopens it when it has been closed
//! or its schema has gone missing. The check-and-open runs under an async
//! mutex, so concurrent first callers wait for one opener and share its pool.
//! Record reads and writes themselves run concurrently on the pool.

use crate::db::{init, schema};
use crate::deck::{Card, Deck};
use crate::error::{Error, Result, StorageResultExt, StoreOperation};
use serde_json::Value;
use sqlx::SqlitePool;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type DeckRow = (String, String, Option<String>, String);

/// Durable deck storage backed by a single SQLite file
#[derive(Debug)]
pub struct DeckStore {
    db_path: PathBuf,
    pool: Mutex<Option<SqlitePool>>,
}

impl DeckStore {
    /// Create a store for `db_path`; nothing is opened until first use
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            pool: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Return a live connection pool, opening or reopening it as needed
    ///
    /// Idempotent. A stale pool is closed and replaced without surfacing an
    /// error to the caller.
    pub async fn initialize(&self) -> Result<SqlitePool> {
        let mut slot = self.pool.lock().await;

        if let Some(pool) = slot.as_ref() {
            if is_healthy(pool).await {
                return Ok(pool.clone());
            }
            warn!("Deck store connection is stale or schema is missing, reinitializing...");
            if let Some(stale) = slot.take() {
                stale.close().await;
            }
        }

        let pool = init::open_pool(&self.db_path).await?;
        schema::ensure_schema(&pool).await?;
        *slot = Some(pool.clone());
        Ok(pool)
    }

    /// Close the connection; the next operation reopens it
    pub async fn close(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
            debug!("Deck store connection closed");
        }
    }

    /// All stored decks in primary-key order
    pub async fn get_all(&self) -> Result<Vec<Deck>> {
        let pool = self.initialize().await?;
        let rows: Vec<DeckRow> =
            sqlx::query_as("SELECT id, name, cover_image, cards FROM decks ORDER BY id")
                .fetch_all(&pool)
                .await
                .during(StoreOperation::GetAll)?;

        rows.into_iter().map(deck_from_row).collect()
    }

    /// Look up one deck; a missing id is `Ok(None)`
    pub async fn get(&self, id: &str) -> Result<Option<Deck>> {
        let pool = self.initialize().await?;
        let row: Option<DeckRow> =
            sqlx::query_as("SELECT id, name, cover_image, cards FROM decks WHERE id = ?")
                .bind(id)
                .fetch_optional(&pool)
                .await
                .during(StoreOperation::Get)?;

        row.map(deck_from_row).transpose()
    }

    /// Insert or overwrite a deck by id (last writer wins)
    pub async fn save(&self, deck: &Deck) -> Result<()> {
        let cards = serde_json::to_string(deck.cards())?;
        let pool = self.initialize().await?;

        sqlx::query(
            r#"
            INSERT INTO decks (id, name, cover_image, cards)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                cover_image = excluded.cover_image,
                cards = excluded.cards
            "#,
        )
        .bind(deck.id())
        .bind(deck.name())
        .bind(deck.cover_image())
        .bind(cards)
        .execute(&pool)
        .await
        .during(StoreOperation::Save)?;

        debug!(deck = deck.id(), cards = deck.total_cards(), "Saved deck");
        Ok(())
    }

    /// Remove a deck; deleting an unknown id succeeds
    pub async fn delete(&self, id: &str) -> Result<()> {
        let pool = self.initialize().await?;
        let result = sqlx::query("DELETE FROM decks WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .during(StoreOperation::Delete)?;

        if result.rows_affected() == 0 {
            debug!(deck = id, "Delete of unknown deck ignored");
        } else {
            info!(deck = id, "Deleted deck");
        }
        Ok(())
    }

    /// Validate a raw payload, assign an id if needed, and store it
    ///
    /// Returns the stored deck. Invalid payloads fail with
    /// [`Error::Validation`] and never reach the database.
    pub async fn import_deck(&self, config: &Value) -> Result<Deck> {
        let deck = Deck::from_config(config)?;
        self.save(&deck).await?;
        info!(deck = deck.id(), name = deck.name(), cards = deck.total_cards(), "Imported deck");
        Ok(deck)
    }

    /// [`Self::import_deck`] for JSON text
    pub async fn import_json(&self, text: &str) -> Result<Deck> {
        let config: Value = serde_json::from_str(text)?;
        self.import_deck(&config).await
    }

    pub async fn count(&self) -> Result<usize> {
        let pool = self.initialize().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM decks")
            .fetch_one(&pool)
            .await
            .during(StoreOperation::Count)?;
        Ok(count as usize)
    }

    /// Whether any deck is stored; gates first-run seeding
    pub async fn has_any(&self) -> Result<bool> {
        Ok(self.count().await? > 0)
    }

    /// Remove every deck, keeping the schema
    pub async fn clear_all(&self) -> Result<()> {
        let pool = self.initialize().await?;
        let result = sqlx::query("DELETE FROM decks")
            .execute(&pool)
            .await
            .during(StoreOperation::Clear)?;
        info!("Cleared {} decks", result.rows_affected());
        Ok(())
    }

    /// Close the connection and delete the database file entirely
    ///
    /// The next operation starts from an empty, freshly created store.
    pub async fn reset_store(&self) -> Result<()> {
        let mut slot = self.pool.lock().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
        }

        for path in database_files(&self.db_path) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::storage(StoreOperation::Reset, sqlx::Error::Io(e))),
            }
        }

        info!("Deck database deleted: {}", self.db_path.display());
        Ok(())
    }
}

async fn is_healthy(pool: &SqlitePool) -> bool {
    if pool.is_closed() {
        return false;
    }
    matches!(schema::decks_table_exists(pool).await, Ok(true))
}

/// The database file plus its WAL companions
fn database_files(db_path: &Path) -> Vec<PathBuf> {
    let mut files = vec![db_path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_os_string();
        name.push(suffix);
        files.push(PathBuf::from(name));
    }
    files
}

fn deck_from_row((id, name, cover_image, cards): DeckRow) -> Result<Deck> {
    let cards: Vec<Card> = match serde_json::from_str(&cards) {
        Ok(cards) => cards,
        Err(source) => return Err(Error::CorruptRecord { id, source }),
    };
    Ok(Deck::from_parts(id, name, cover_image, cards))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_files_include_wal_companions() {
        let files = database_files(Path::new("/tmp/carta.db"));
        assert_eq!(
            files,
            vec![
                PathBuf::from("/tmp/carta.db"),
                PathBuf::from("/tmp/carta.db-wal"),
                PathBuf::from("/tmp/carta.db-shm"),
            ]
        );
    }

    #[test]
    fn test_corrupt_card_json_is_reported() {
        let row = ("d".to_string(), "N".to_string(), None, "{not json".to_string());
        assert!(matches!(deck_from_row(row), Err(Error::CorruptRecord { ref id, .. }) if id == "d"));
    }

    #[tokio::test]
    async fn test_new_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = DeckStore::new(dir.path().join("lazy.db"));
        assert!(!store.path().exists());
        store.initialize().await.unwrap();
        assert!(store.path().exists());
    }
}
