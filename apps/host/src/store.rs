//! # Snapshot Stores
//!
//! The load/save contract the session persists through.
//!
//! ```text
//! WardrobeSession<S: WardrobeStore>
//!        │
//!        ├── Database     sqlx SQLite, the real app
//!        └── MemoryStore  in-process, tests and previews
//! ```

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Mutex;
use wardrobe_core::Wardrobe;
use wardrobe_db::{Database, DbError, DbResult, StoredSnapshot};

/// Where the wardrobe snapshot lives between launches.
pub trait WardrobeStore: Send + Sync {
    /// Reads every slice. Missing slices are `None` on first run.
    fn load(&self) -> impl Future<Output = DbResult<StoredSnapshot>> + Send;

    /// Writes every slice.
    fn save(&self, wardrobe: &Wardrobe) -> impl Future<Output = DbResult<()>> + Send;
}

impl WardrobeStore for Database {
    async fn load(&self) -> DbResult<StoredSnapshot> {
        self.snapshots().load().await
    }

    async fn save(&self, wardrobe: &Wardrobe) -> DbResult<()> {
        self.snapshots().save(wardrobe).await
    }
}

/// In-memory store.
///
/// Can be told to fail every save, which is how the best-effort save path
/// is exercised.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<StoredSnapshot>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store (first run).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: StoredSnapshot) -> Self {
        MemoryStore {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    /// Makes every following save fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The stored state as a wardrobe.
    pub async fn stored(&self) -> Wardrobe {
        self.snapshot.lock().await.clone().into_wardrobe()
    }
}

impl WardrobeStore for MemoryStore {
    async fn load(&self) -> DbResult<StoredSnapshot> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save(&self, wardrobe: &Wardrobe) -> DbResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DbError::Internal("memory store is read-only".to_string()));
        }

        *self.snapshot.lock().await = StoredSnapshot {
            categories: Some(wardrobe.categories.clone()),
            batches: Some(wardrobe.batches.clone()),
            laundry_history: Some(wardrobe.laundry_history.clone()),
            bag: Some(wardrobe.bag.clone()),
            corrupt_slices: Vec::new(),
        };
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wardrobe_db::DbConfig;

    fn sample() -> Wardrobe {
        let (w, _) = Wardrobe::default().add_category("Towels", "🛁", 4, Utc::now());
        w
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_first_run());

        store.save(&sample()).await.unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().await.unwrap().into_wardrobe(), store.stored().await);
        assert_eq!(store.stored().await.categories[0].name, "Towels");
    }

    #[tokio::test]
    async fn test_memory_store_failing_saves() {
        let store = MemoryStore::new();
        store.fail_saves(true);
        assert!(store.save(&sample()).await.is_err());
        assert_eq!(store.save_count(), 0);
        assert!(store.load().await.unwrap().is_first_run());
    }

    #[tokio::test]
    async fn test_database_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let wardrobe = sample();

        WardrobeStore::save(&db, &wardrobe).await.unwrap();
        let loaded = WardrobeStore::load(&db).await.unwrap();
        assert_eq!(loaded.into_wardrobe(), wardrobe);
    }
}
