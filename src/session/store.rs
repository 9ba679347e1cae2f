use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::RwLock;
use tracing::{debug, info};

use crate::models::{FinderError, Result};

/// Key under which the last selected world is stored.
pub const SELECTION_KEY: &str = "tibia_party_finder_world";

/// Remembers the last selected world between runs.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn load(&self) -> Result<Option<String>>;

    async fn save(&self, world: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}

/// Process-local store, used when persistence is disabled.
#[derive(Debug, Default)]
pub struct MemorySelectionStore {
    value: RwLock<Option<String>>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SelectionStore for MemorySelectionStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.value.read().ok().and_then(|v| v.clone()))
    }

    async fn save(&self, world: &str) -> Result<()> {
        if let Ok(mut value) = self.value.write() {
            *value = Some(world.to_string());
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if let Ok(mut value) = self.value.write() {
            *value = None;
        }
        Ok(())
    }
}

/// Key-value table in a sqlite database.
pub struct SqliteSelectionStore {
    pool: SqlitePool,
}

impl SqliteSelectionStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        if let Some(parent) = database_path(database_url).and_then(|p| p.parent().map(|p| p.to_path_buf())) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(&parent).map_err(|e| {
                    FinderError::ConfigError(format!(
                        "Cannot create storage directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // A single connection keeps `sqlite::memory:` databases alive across calls.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS selection (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)",
        )
        .execute(&pool)
        .await?;

        info!("Opened selection store at {}", database_url);
        Ok(Self { pool })
    }
}

fn database_path(database_url: &str) -> Option<std::path::PathBuf> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(std::path::PathBuf::from(path))
}

#[async_trait]
impl SelectionStore for SqliteSelectionStore {
    async fn load(&self) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM selection WHERE key = ?")
            .bind(SELECTION_KEY)
            .fetch_optional(&self.pool)
            .await?;
        debug!("Loaded saved world: {:?}", value);
        Ok(value)
    }

    async fn save(&self, world: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO selection (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(SELECTION_KEY)
        .bind(world)
        .execute(&self.pool)
        .await?;
        debug!("Saved world: {}", world);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM selection WHERE key = ?")
            .bind(SELECTION_KEY)
            .execute(&self.pool)
            .await?;
        debug!("Cleared saved world");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn SelectionStore) {
        assert_eq!(store.load().await.unwrap(), None);

        store.save("antica").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("antica".to_string()));

        store.save("zuna").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("zuna".to_string()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store() {
        exercise(&MemorySelectionStore::new()).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_in_memory() {
        let store = SqliteSelectionStore::connect("sqlite::memory:").await.unwrap();
        exercise(&store).await;
    }

    #[tokio::test]
    async fn test_sqlite_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("party-finder-store-{}", std::process::id()));
        let url = format!("sqlite://{}", dir.join("selection.db").display());

        {
            let store = SqliteSelectionStore::connect(&url).await.unwrap();
            store.save("bona").await.unwrap();
        }

        let reopened = SqliteSelectionStore::connect(&url).await.unwrap();
        assert_eq!(reopened.load().await.unwrap(), Some("bona".to_string()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_database_path() {
        assert_eq!(database_path("sqlite::memory:"), None);
        assert_eq!(
            database_path("sqlite:///tmp/pf/selection.db"),
            Some(std::path::PathBuf::from("/tmp/pf/selection.db"))
        );
        assert_eq!(
            database_path("sqlite://data.db?mode=rwc"),
            Some(std::path::PathBuf::from("data.db"))
        );
    }
}
