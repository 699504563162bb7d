use chrono::{DateTime, SecondsFormat, Utc};
use rw_core::{ArticleRecord, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool};
use sqlx::Row;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        headline TEXT PRIMARY KEY,
        type TEXT NOT NULL,
        countries TEXT NOT NULL,
        category TEXT NOT NULL,
        date TEXT NOT NULL,
        body TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

/// The durable archive of all classified, relevant articles.
///
/// Keyed by headline with insert-if-absent merge semantics: a headline is
/// written at most once and never updated or deleted by the pipeline. Dates
/// are stored as `YYYY-MM-DDTHH:MM:SSZ` strings so lexicographic order matches
/// chronological order; equal dates tie-break on insertion order (rowid).
pub struct ArchiveStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl ArchiveStore {
    /// Open the archive at `path`, creating the file and running migrations
    /// if needed. Safe to call on every run.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Rollback journal, not WAL: the archive travels as a single file
        // blob, so nothing may live outside it when the pool closes.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to open archive: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("failed to run migration {}: {}", i, e)))?;
        }

        debug!("Archive opened at {}", path.display());
        Ok(Self {
            pool,
            db_path: path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Insert each record whose headline is not already present. Returns the
    /// count actually inserted. Atomic per record, not per batch: a failure
    /// mid-batch leaves earlier inserts in place, and a retry skips them.
    pub async fn merge(&self, records: &[ArticleRecord]) -> Result<usize> {
        let mut inserted = 0;
        for record in records {
            let countries = serde_json::to_string(&record.countries)?;
            let article_type = serde_json::to_value(record.article_type)?;
            let category = serde_json::to_value(record.category)?;

            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO articles (headline, type, countries, category, date, body)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.headline)
            .bind(article_type.as_str())
            .bind(countries)
            .bind(category.as_str())
            .bind(store_date(&record.date))
            .bind(&record.body)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to merge '{}': {}", record.headline, e)))?;

            if result.rows_affected() > 0 {
                inserted += 1;
            } else {
                debug!("Skipping duplicate headline: {}", record.headline);
            }
        }

        info!("💾 Merged {} new records ({} candidates)", inserted, records.len());
        Ok(inserted)
    }

    /// Every stored record, newest first; equal dates keep insertion order.
    pub async fn all_records(&self) -> Result<Vec<ArticleRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT headline, type, countries, category, date, body
            FROM articles
            ORDER BY date DESC, rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to read archive: {}", e)))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(record_from_row(&row)?);
        }
        Ok(records)
    }

    pub async fn len(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("failed to count archive: {}", e)))?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Close the pool so the database file can be read back as a blob.
    pub async fn close(self) -> PathBuf {
        self.pool.close().await;
        self.db_path
    }
}

fn store_date(date: &DateTime<Utc>) -> String {
    // Fixed-width, second precision: lexicographic sort == chronological sort.
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ArticleRecord> {
    let countries: String = row.get("countries");
    let article_type: String = row.get("type");
    let category: String = row.get("category");
    let date: String = row.get("date");

    Ok(ArticleRecord {
        headline: row.get("headline"),
        article_type: serde_json::from_value(serde_json::Value::String(article_type))?,
        countries: serde_json::from_str(&countries)?,
        category: serde_json::from_value(serde_json::Value::String(category))?,
        date: DateTime::parse_from_rfc3339(&date)
            .map_err(|e| Error::Storage(format!("corrupt date in archive: {}", e)))?
            .with_timezone(&Utc),
        body: row.get("body"),
    })
}
