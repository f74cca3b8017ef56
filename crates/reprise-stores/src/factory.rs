//! Factory for creating review store backends.

use std::sync::Arc;

use reprise_core::config::{StoreConfig, StoreProvider};
use reprise_core::error::RepriseResult;
use reprise_core::traits::ReviewStore;

use crate::memory::MemoryReviewStore;
use crate::sqlite::SqliteReviewStore;

/// Factory for creating review store backends.
pub struct ReviewStoreFactory;

impl ReviewStoreFactory {
    /// Create a review store from the given configuration.
    ///
    /// For the SQLite provider, a missing `path` selects an in-memory
    /// database; a file path gets its parent directory created on demand.
    pub fn create(config: &StoreConfig) -> RepriseResult<Arc<dyn ReviewStore>> {
        match config.provider {
            StoreProvider::Memory => Ok(Arc::new(MemoryReviewStore::new())),

            StoreProvider::Sqlite => match &config.path {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() {
                            std::fs::create_dir_all(parent)?;
                        }
                    }
                    let store = SqliteReviewStore::new(path)?;
                    Ok(Arc::new(store))
                }
                None => {
                    let store = SqliteReviewStore::in_memory()?;
                    Ok(Arc::new(store))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reprise_core::types::{ContentType, ReviewKey};

    #[tokio::test]
    async fn test_create_memory_store() {
        let store = ReviewStoreFactory::create(&StoreConfig::default()).unwrap();
        let key = ReviewKey::new("u1", "c1", ContentType::Flashcard);
        assert!(store.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_sqlite_store_with_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reviews.db");

        let store = ReviewStoreFactory::create(&StoreConfig::sqlite(&path)).unwrap();
        let tally = store
            .count_by_status("u1", None, Utc::now(), 4)
            .await
            .unwrap();

        assert_eq!(tally.total(), 0);
        assert!(path.exists());
    }
}
