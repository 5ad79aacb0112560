use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use vg_core::{ArticleRecord, ContentStore, Error, ImagePayload, ImageRecord, Result, SummaryRecord};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        url TEXT PRIMARY KEY,
        main_content TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS summaries (
        article_content TEXT PRIMARY KEY,
        summary TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS images (
        provider TEXT NOT NULL,
        prompt TEXT NOT NULL,
        image TEXT NOT NULL,
        created_at TEXT NOT NULL,
        PRIMARY KEY (provider, prompt)
    )
    "#,
];

pub const DEFAULT_DB_PATH: &str = "vignette.db";

/// SQLite-backed store.
///
/// The pool is built once; every operation checks out its own connection and
/// hands it back when the call returns, whether it succeeded or not.
pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }

        tracing::debug!("SQLite store ready at {}", db_path.display());

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    async fn connection(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| Error::Storage(format!("Failed to acquire connection: {}", e)))
    }
}

fn parse_timestamp(row: &SqliteRow) -> Result<DateTime<Utc>> {
    let raw: String = row
        .try_get("created_at")
        .map_err(|e| Error::Storage(format!("Failed to read created_at: {}", e)))?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse date: {}", e)))
}

fn column(row: &SqliteRow, name: &str) -> Result<String> {
    row.try_get(name)
        .map_err(|e| Error::Storage(format!("Failed to read {}: {}", name, e)))
}

#[async_trait]
impl ContentStore for SQLiteStorage {
    async fn get_article(&self, url: &str) -> Result<Option<ArticleRecord>> {
        let mut conn = self.connection().await?;
        let row = sqlx::query("SELECT url, main_content, created_at FROM articles WHERE url = ?")
            .bind(url)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| Error::Storage(format!("Failed to load article: {}", e)))?;

        row.map(|row| -> Result<ArticleRecord> {
            Ok(ArticleRecord {
                url: column(&row, "url")?,
                main_content: column(&row, "main_content")?,
                created_at: parse_timestamp(&row)?,
            })
        })
        .transpose()
    }

    async fn insert_article(&self, record: &ArticleRecord) -> Result<()> {
        let mut conn = self.connection().await?;
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO articles (url, main_content, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.url)
        .bind(&record.main_content)
        .bind(record.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::Storage(format!("Failed to store article: {}", e)))?;

        Ok(())
    }

    async fn get_summary(&self, article_content: &str) -> Result<Option<SummaryRecord>> {
        let mut conn = self.connection().await?;
        let row = sqlx::query(
            "SELECT article_content, summary, created_at FROM summaries WHERE article_content = ?",
        )
        .bind(article_content)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| Error::Storage(format!("Failed to load summary: {}", e)))?;

        row.map(|row| -> Result<SummaryRecord> {
            let summary: Vec<String> = serde_json::from_str(&column(&row, "summary")?)?;
            Ok(SummaryRecord {
                article_content: column(&row, "article_content")?,
                summary,
                created_at: parse_timestamp(&row)?,
            })
        })
        .transpose()
    }

    async fn upsert_summary(&self, record: &SummaryRecord) -> Result<()> {
        let summary = serde_json::to_string(&record.summary)?;

        let mut conn = self.connection().await?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO summaries (article_content, summary, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.article_content)
        .bind(summary)
        .bind(record.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::Storage(format!("Failed to store summary: {}", e)))?;

        Ok(())
    }

    async fn get_image(&self, provider: &str, prompt: &str) -> Result<Option<ImageRecord>> {
        let mut conn = self.connection().await?;
        let row = sqlx::query(
            "SELECT provider, prompt, image, created_at FROM images WHERE provider = ? AND prompt = ?",
        )
        .bind(provider)
        .bind(prompt)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| Error::Storage(format!("Failed to load image: {}", e)))?;

        row.map(|row| -> Result<ImageRecord> {
            Ok(ImageRecord {
                provider: column(&row, "provider")?,
                prompt: column(&row, "prompt")?,
                image: ImagePayload::from(column(&row, "image")?),
                created_at: parse_timestamp(&row)?,
            })
        })
        .transpose()
    }

    async fn upsert_image(&self, record: &ImageRecord) -> Result<()> {
        let mut conn = self.connection().await?;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO images (provider, prompt, image, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.provider)
        .bind(&record.prompt)
        .bind(record.image.as_str())
        .bind(record.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::Storage(format!("Failed to store image: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert_eq!(storage.get_db_path(), db_path.as_path());

        let article = ArticleRecord::new("https://example.com/a", "desc A");
        storage.insert_article(&article).await.unwrap();
        storage
            .insert_article(&ArticleRecord::new("https://example.com/a", "changed"))
            .await
            .unwrap();

        let stored = storage.get_article("https://example.com/a").await.unwrap().unwrap();
        assert_eq!(stored.main_content, "desc A");
        assert!(storage.get_article("https://example.com/b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summaries_round_trip_as_arrays() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("test.db"))
            .await
            .unwrap();

        storage
            .upsert_summary(&SummaryRecord::new("desc A", vec!["first".to_string()]))
            .await
            .unwrap();
        storage
            .upsert_summary(&SummaryRecord::new("desc A", vec!["A catchy phrase".to_string()]))
            .await
            .unwrap();

        let stored = storage.get_summary("desc A").await.unwrap().unwrap();
        assert_eq!(stored.summary, vec!["A catchy phrase".to_string()]);
    }

    #[tokio::test]
    async fn test_images_keep_payload_shape() {
        let temp_dir = tempdir().unwrap();
        let storage = SQLiteStorage::new_with_path(&temp_dir.path().join("test.db"))
            .await
            .unwrap();

        storage
            .upsert_image(&ImageRecord::new("local", "a cat", ImagePayload::png_base64("AAAA")))
            .await
            .unwrap();

        let stored = storage.get_image("local", "a cat").await.unwrap().unwrap();
        assert!(stored.image.is_inline());
        assert!(storage.get_image("hosted", "a cat").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        {
            let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
            storage
                .insert_article(&ArticleRecord::new("https://example.com/a", "desc A"))
                .await
                .unwrap();
        }

        let storage = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        assert!(storage.get_article("https://example.com/a").await.unwrap().is_some());
    }
}
