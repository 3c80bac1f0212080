//! # Snapshot Repository
//!
//! Loads and saves the wardrobe as four JSON slices in `kv_store`.
//!
//! ## Corruption Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load()                                                                 │
//! │                                                                         │
//! │  categories      ──► per record ──► 1 bad ──► warn!, record skipped   │
//! │  batches         ──► not an array     ──► warn!, None (empty)         │
//! │  laundryHistory  ──► missing          ──► None (first run)            │
//! │  bagContents     ──► decode ──► ok    ──► Some(Bag)                   │
//! │                                                                         │
//! │  One unreadable slice never prevents the others from loading.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The three list slices are decoded record by record. A slice only counts
//! as corrupt when its top level is not a JSON array.
//!
//! The repository stores whatever it is given. Consistency repair is the
//! caller's job (`Wardrobe::repaired`) after `load`.

use chrono::Utc;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use wardrobe_core::{Bag, Batch, Category, LaundryHistoryEntry, Wardrobe};

/// Storage key of the category list.
pub const CATEGORIES_KEY: &str = "categories";
/// Storage key of the batch list.
pub const BATCHES_KEY: &str = "batches";
/// Storage key of the completed-batch history.
pub const LAUNDRY_HISTORY_KEY: &str = "laundryHistory";
/// Storage key of the staged bag.
pub const BAG_CONTENTS_KEY: &str = "bagContents";

const UPSERT_SQL: &str = r#"
    INSERT INTO kv_store (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

/// The four slices as found in storage.
///
/// A slice is `None` when it was never written or could not be decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredSnapshot {
    pub categories: Option<Vec<Category>>,
    pub batches: Option<Vec<Batch>>,
    pub laundry_history: Option<Vec<LaundryHistoryEntry>>,
    pub bag: Option<Bag>,
    /// Keys whose stored value failed to decode as a whole.
    pub corrupt_slices: Vec<String>,
}

impl StoredSnapshot {
    /// Nothing has ever been saved.
    pub fn is_first_run(&self) -> bool {
        self.categories.is_none()
            && self.batches.is_none()
            && self.laundry_history.is_none()
            && self.bag.is_none()
            && self.corrupt_slices.is_empty()
    }

    /// Fills missing slices with their empty defaults.
    ///
    /// The result is NOT repaired yet.
    pub fn into_wardrobe(self) -> Wardrobe {
        Wardrobe {
            categories: self.categories.unwrap_or_default(),
            batches: self.batches.unwrap_or_default(),
            laundry_history: self.laundry_history.unwrap_or_default(),
            bag: self.bag.unwrap_or_default(),
        }
    }
}

/// Repository for the wardrobe snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Reads all four slices, decoding each independently.
    ///
    /// ## Errors
    /// Only when the database itself fails. Unreadable records are logged and
    /// skipped; unreadable slices are reported in
    /// [`StoredSnapshot::corrupt_slices`].
    pub async fn load(&self) -> DbResult<StoredSnapshot> {
        let mut corrupt = Vec::new();

        let categories = decode_records(CATEGORIES_KEY, self.get_raw(CATEGORIES_KEY).await?, &mut corrupt);
        let batches = decode_records(BATCHES_KEY, self.get_raw(BATCHES_KEY).await?, &mut corrupt);
        let laundry_history =
            decode_records(LAUNDRY_HISTORY_KEY, self.get_raw(LAUNDRY_HISTORY_KEY).await?, &mut corrupt);
        let bag = decode_slice(BAG_CONTENTS_KEY, self.get_raw(BAG_CONTENTS_KEY).await?, &mut corrupt);

        let snapshot = StoredSnapshot {
            categories,
            batches,
            laundry_history,
            bag,
            corrupt_slices: corrupt,
        };

        debug!(
            categories = snapshot.categories.as_ref().map_or(0, Vec::len),
            batches = snapshot.batches.as_ref().map_or(0, Vec::len),
            corrupt = snapshot.corrupt_slices.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Writes all four slices in one transaction.
    ///
    /// Everything is encoded before the transaction opens, so an encoding
    /// failure writes nothing.
    pub async fn save(&self, wardrobe: &Wardrobe) -> DbResult<()> {
        let slices = [
            (CATEGORIES_KEY, serde_json::to_string(&wardrobe.categories)?),
            (BATCHES_KEY, serde_json::to_string(&wardrobe.batches)?),
            (LAUNDRY_HISTORY_KEY, serde_json::to_string(&wardrobe.laundry_history)?),
            (BAG_CONTENTS_KEY, serde_json::to_string(&wardrobe.bag)?),
        ];
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        for (key, value) in &slices {
            sqlx::query(UPSERT_SQL)
            .bind(*key)
            .bind(value.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        debug!(
            categories = wardrobe.categories.len(),
            batches = wardrobe.batches.len(),
            staged = wardrobe.bag.total(),
            "Snapshot saved"
        );
        Ok(())
    }

    /// Deletes every stored slice. Returns the number of rows removed.
    pub async fn clear(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM kv_store").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Raw stored text for `key`.
    pub async fn get_raw(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Overwrites the raw stored text for `key`.
    pub async fn put_raw(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(UPSERT_SQL)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Decodes a list slice one record at a time, dropping the records that
/// do not decode.
fn decode_records<T: DeserializeOwned>(key: &str, raw: Option<String>, corrupt: &mut Vec<String>) -> Option<Vec<T>> {
    let values: Vec<serde_json::Value> = decode_slice(key, raw, corrupt)?;
    let records = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(key, index, error = %e, "Stored record is unreadable, skipping it");
                None
            }
        })
        .collect();
    Some(records)
}

fn decode_slice<T: DeserializeOwned>(key: &str, raw: Option<String>, corrupt: &mut Vec<String>) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Stored slice is unreadable, falling back to empty");
            corrupt.push(key.to_string());
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
