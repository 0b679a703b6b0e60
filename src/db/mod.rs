//! The selection audit log, a single append-only SQLite table.
//!
//! The store keeps `past_views`, one row per saved filter selection. There is
//! no update and no single-row delete, only append, list-all and delete-all;
//! the schema is fixed and never migrated.

use crate::model::FilterSelection;
use crate::Result;
use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS past_views (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    start_date TEXT,
    end_date TEXT,
    selected_regions TEXT,
    selected_products TEXT
)";

/// A persisted filter selection as read back from the audit log.
///
/// The region and product sets are stored as JSON arrays so that names
/// containing separator characters survive the round trip.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SavedView {
    pub id: i64,
    pub start_date: String,
    pub end_date: String,
    pub regions: Vec<String>,
    pub products: Vec<String>,
}

/// Manages the audit log's SQLite file.
///
/// A single-writer, single-process deployment is assumed; concurrent saves
/// are serialized by SQLite itself and nothing more.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    /// Opens (creating if absent) the SQLite file at `path` and ensures the
    /// `past_views` table exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .with_context(|| format!("Bad SQLite path '{}'", path.display()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Unable to open SQLite file at '{}'", path.display()))?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .context("Failed to create the past_views table")?;

        debug!("Opened audit store at {}", path.display());
        Ok(Self { pool })
    }

    /// Appends one record for `selection` and returns its assigned id.
    pub async fn save(&self, selection: &FilterSelection) -> Result<i64> {
        let regions = serde_json::to_string(&selection.regions)
            .context("Failed to serialize the region set")?;
        let products = serde_json::to_string(&selection.products)
            .context("Failed to serialize the product set")?;

        let result = sqlx::query(
            "INSERT INTO past_views (start_date, end_date, selected_regions, selected_products) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(selection.start.to_string())
        .bind(selection.end.to_string())
        .bind(regions)
        .bind(products)
        .execute(&self.pool)
        .await
        .context("Failed to append to past_views")?;

        Ok(result.last_insert_rowid())
    }

    /// Returns every saved view in insertion order.
    pub async fn list_all(&self) -> Result<Vec<SavedView>> {
        let rows: Vec<(i64, String, String, String, String)> = sqlx::query_as(
            "SELECT id, start_date, end_date, selected_regions, selected_products \
             FROM past_views ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to read past_views")?;

        rows.into_iter()
            .map(|(id, start_date, end_date, regions, products)| {
                Ok(SavedView {
                    id,
                    start_date,
                    end_date,
                    regions: serde_json::from_str(&regions)
                        .with_context(|| format!("Bad region set in past_views row {id}"))?,
                    products: serde_json::from_str(&products)
                        .with_context(|| format!("Bad product set in past_views row {id}"))?,
                })
            })
            .collect()
    }

    /// Removes every record. Returns the number of rows deleted.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM past_views")
            .execute(&self.pool)
            .await
            .context("Failed to clear past_views")?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn open_store() -> (TempDir, HistoryStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::open(temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_save_then_list_round_trips() {
        let (_temp_dir, store) = open_store().await;
        let selection = FilterSelection::new(date("2020-01-01"), date("2020-06-30"))
            .with_regions(["West", "Mid, West"])
            .with_products(["Men's Street Footwear"]);

        store.save(&selection).await.unwrap();
        let views = store.list_all().await.unwrap();
        assert_eq!(views.len(), 1);

        let last = views.last().unwrap();
        assert_eq!(last.start_date, "2020-01-01");
        assert_eq!(last.end_date, "2020-06-30");
        // Separator characters inside names survive the JSON round trip.
        assert_eq!(last.regions, vec!["West", "Mid, West"]);
        assert_eq!(last.products, vec!["Men's Street Footwear"]);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_in_insertion_order() {
        let (_temp_dir, store) = open_store().await;
        for month in 1..=3 {
            let sel = FilterSelection::new(
                NaiveDate::from_ymd_opt(2020, month, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, month, 28).unwrap(),
            );
            store.save(&sel).await.unwrap();
        }
        let views = store.list_all().await.unwrap();
        assert_eq!(views.len(), 3);
        assert!(views.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(views[0].start_date, "2020-01-01");
    }

    #[tokio::test]
    async fn test_delete_all_empties_the_log() {
        let (_temp_dir, store) = open_store().await;
        let sel = FilterSelection::new(date("2020-01-01"), date("2020-01-31"));
        store.save(&sel).await.unwrap();
        store.save(&sel).await.unwrap();

        let deleted = store.delete_all().await.unwrap();
        assert_eq!(deleted, 2);
        assert!(store.list_all().await.unwrap().is_empty());

        // Deleting an already-empty log is fine.
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reopen_preserves_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.sqlite");
        {
            let store = HistoryStore::open(&path).await.unwrap();
            let sel = FilterSelection::new(date("2020-01-01"), date("2020-01-31"));
            store.save(&sel).await.unwrap();
        }
        let store = HistoryStore::open(&path).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
