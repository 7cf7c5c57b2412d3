//! SQLite cache store implementation
//!
//! One table, one connection per operation. Every mutation runs in its own
//! transaction and is committed with `synchronous = FULL` before returning.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{ConnectOptions, Connection, Row, SqliteConnection};
use tracing::{debug, warn};

use crate::domain::semantic_cache::{CacheRecord, CacheStore};
use crate::domain::DomainError;

const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

/// How long to wait on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS cache (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        prompt TEXT NOT NULL,
        response TEXT NOT NULL,
        embedding BLOB NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// SQLite-backed cache store
///
/// The parent directory of `path` must exist; the file itself is created on
/// first use.
#[derive(Debug, Clone)]
pub struct SqliteCacheStore {
    path: PathBuf,
}

impl SqliteCacheStore {
    /// Create a store for the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the cache file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, DomainError> {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(BUSY_TIMEOUT)
            .connect()
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to open cache database {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }

    async fn close(conn: SqliteConnection) -> Result<(), DomainError> {
        conn.close()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to close cache database: {}", e)))
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn initialize(&self) -> Result<(), DomainError> {
        let mut conn = self.connect().await?;

        sqlx::query(CREATE_TABLE)
            .execute(&mut conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create cache table: {}", e)))?;

        Self::close(conn).await?;

        debug!(path = %self.path.display(), "Cache database initialized");

        Ok(())
    }

    async fn insert(
        &self,
        prompt: &str,
        response: &str,
        embedding: &[f32],
    ) -> Result<i64, DomainError> {
        let mut conn = self.connect().await?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let result = sqlx::query("INSERT INTO cache (prompt, response, embedding) VALUES (?, ?, ?)")
            .bind(prompt)
            .bind(response)
            .bind(encode_embedding(embedding))
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert cache record: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit cache record: {}", e)))?;

        Ok(after_commit(result.last_insert_rowid(), Self::close(conn).await))
    }

    async fn scan_all(&self) -> Result<Vec<CacheRecord>, DomainError> {
        let mut conn = self.connect().await?;

        let rows = sqlx::query(
            "SELECT id, prompt, response, embedding, created_at FROM cache ORDER BY id",
        )
        .fetch_all(&mut conn)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to scan cache records: {}", e)))?;

        Self::close(conn).await?;

        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let blob: Vec<u8> = row.try_get("embedding").map_err(decode_error)?;
            let created_at: Option<chrono::NaiveDateTime> =
                row.try_get("created_at").map_err(decode_error)?;

            records.push(CacheRecord::new(
                row.try_get("id").map_err(decode_error)?,
                row.try_get::<String, _>("prompt").map_err(decode_error)?,
                row.try_get::<String, _>("response").map_err(decode_error)?,
                decode_embedding(&blob)?,
                created_at.unwrap_or_default(),
            ));
        }

        Ok(records)
    }

    async fn clear_all(&self) -> Result<(), DomainError> {
        let mut conn = self.connect().await?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let result = sqlx::query("DELETE FROM cache")
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear cache: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit cache clear: {}", e)))?;

        after_commit((), Self::close(conn).await);

        debug!(deleted = result.rows_affected(), "Cache cleared");

        Ok(())
    }
}

/// The transaction is durable once committed; a failed close only gets logged.
fn after_commit<T>(value: T, closed: Result<(), DomainError>) -> T {
    if let Err(e) = closed {
        warn!("Ignoring close failure after commit: {}", e);
    }
    value
}

fn decode_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Failed to decode cache record: {}", e))
}

/// Encode a vector as raw little-endian f32 bytes
fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * FLOAT_BYTES);
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode raw little-endian f32 bytes back into a vector
fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>, DomainError> {
    if blob.len() % FLOAT_BYTES != 0 {
        return Err(DomainError::storage(format!(
            "Invalid embedding byte length {}: not a multiple of {}",
            blob.len(),
            FLOAT_BYTES
        )));
    }

    Ok(blob
        .chunks_exact(FLOAT_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
