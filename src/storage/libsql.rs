//! LibSQL storage backend implementation
//!
//! Provides durable storage for feedback records using libSQL, with a
//! monotonic insertion sequence used as the tie-breaker for reverse-
//! chronological listing and as one half of the keyset pagination cursor.

use crate::error::{FeedbackError, Result};
use crate::storage::{Cursor, FeedbackPage, StorageBackend};
use crate::types::{FeedbackId, FeedbackRecord, Sentiment};
use async_trait::async_trait;
use libsql::params::IntoParams;
use libsql::{params, Builder, Connection, Database, Row};
use tracing::{debug, info};

/// Embedded schema, applied idempotently at startup
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS feedback (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        feedback_id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        message TEXT NOT NULL,
        rating INTEGER NOT NULL,
        sentiment TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_feedback_recency
        ON feedback (created_at DESC, seq DESC)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_sentiment
        ON feedback (sentiment)",
];

/// Database connection mode
#[derive(Debug, Clone)]
pub enum ConnectionMode {
    /// Local file-based database
    Local(String),
    /// In-memory database (for testing)
    InMemory,
}

/// LibSQL storage backend
///
/// Holds a single shared connection; writes from concurrent submitters are
/// serialized on it instead of contending for the file lock.
pub struct LibsqlStorage {
    _db: Database,
    conn: Connection,
}

impl LibsqlStorage {
    /// Create a new LibSQL storage backend and apply the schema
    ///
    /// # Example
    /// ```ignore
    /// let storage = LibsqlStorage::new(ConnectionMode::Local("feedback.db".into())).await?;
    /// ```
    pub async fn new(mode: ConnectionMode) -> Result<Self> {
        info!("Connecting to libSQL database: {:?}", mode);

        let db = match mode {
            ConnectionMode::Local(ref path) => {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            FeedbackError::Storage(format!(
                                "Failed to create database directory {}: {}",
                                parent.display(),
                                e
                            ))
                        })?;
                    }
                }

                Builder::new_local(path).build().await.map_err(|e| {
                    FeedbackError::Storage(format!("Failed to open local database: {}", e))
                })?
            }
            ConnectionMode::InMemory => Builder::new_local(":memory:")
                .build()
                .await
                .map_err(|e| {
                    FeedbackError::Storage(format!("Failed to create in-memory database: {}", e))
                })?,
        };

        let conn = db
            .connect()
            .map_err(|e| FeedbackError::Storage(format!("Failed to get connection: {}", e)))?;
        conn.query("PRAGMA busy_timeout = 5000", params![])
            .await
            .map_err(|e| FeedbackError::Storage(format!("Failed to set busy timeout: {}", e)))?;

        let storage = Self { _db: db, conn };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Create from a string path (":memory:" selects the in-memory mode)
    pub async fn from_path(path: &str) -> Result<Self> {
        let mode = if path == ":memory:" {
            ConnectionMode::InMemory
        } else {
            ConnectionMode::Local(path.to_string())
        };
        Self::new(mode).await
    }

    /// Apply the embedded schema
    async fn run_migrations(&self) -> Result<()> {
        let conn = self.get_conn()?;
        for statement in SCHEMA {
            conn.execute(statement, params![]).await.map_err(|e| {
                FeedbackError::Storage(format!("Failed to apply schema: {}", e))
            })?;
        }
        debug!("Schema applied");
        Ok(())
    }

    /// Get the shared connection
    fn get_conn(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    /// Convert a database row (in table column order, seq first) to a record
    fn row_to_record(row: &Row) -> Result<FeedbackRecord> {
        let id_str = row
            .get::<String>(1)
            .map_err(|e| FeedbackError::Storage(format!("Failed to read feedback_id: {}", e)))?;
        let feedback_id = FeedbackId::from_string(&id_str)
            .map_err(|e| FeedbackError::Storage(format!("Corrupt feedback_id '{}': {}", id_str, e)))?;

        let sentiment_str = row
            .get::<String>(6)
            .map_err(|e| FeedbackError::Storage(format!("Failed to read sentiment: {}", e)))?;
        let sentiment = Sentiment::parse(&sentiment_str).ok_or_else(|| {
            FeedbackError::Storage(format!("Corrupt sentiment label '{}'", sentiment_str))
        })?;

        Ok(FeedbackRecord {
            feedback_id,
            name: row
                .get::<String>(2)
                .map_err(|e| FeedbackError::Storage(format!("Failed to read name: {}", e)))?,
            email: row
                .get::<String>(3)
                .map_err(|e| FeedbackError::Storage(format!("Failed to read email: {}", e)))?,
            message: row
                .get::<String>(4)
                .map_err(|e| FeedbackError::Storage(format!("Failed to read message: {}", e)))?,
            rating: row
                .get::<i64>(5)
                .map_err(|e| FeedbackError::Storage(format!("Failed to read rating: {}", e)))?,
            sentiment,
            created_at: row
                .get::<i64>(7)
                .map_err(|e| FeedbackError::Storage(format!("Failed to read created_at: {}", e)))?,
        })
    }

    /// Run a scalar aggregate query
    async fn query_scalar(&self, sql: &str, params: impl IntoParams) -> Result<i64> {
        let conn = self.get_conn()?;
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| FeedbackError::Storage(format!("Aggregate query failed: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| FeedbackError::Storage(format!("Aggregate query failed: {}", e)))?
        {
            Some(row) => row
                .get::<i64>(0)
                .map_err(|e| FeedbackError::Storage(format!("Failed to read aggregate: {}", e))),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl StorageBackend for LibsqlStorage {
    async fn insert_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        debug!("Storing feedback: {}", record.feedback_id);

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO feedback (feedback_id, name, email, message, rating, sentiment, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                record.feedback_id.to_string(),
                record.name.as_str(),
                record.email.as_str(),
                record.message.as_str(),
                record.rating,
                record.sentiment.as_str(),
                record.created_at,
            ],
        )
        .await
        .map_err(|e| FeedbackError::Storage(format!("Failed to store feedback: {}", e)))?;

        debug!("Feedback stored: {}", record.feedback_id);
        Ok(())
    }

    async fn list_feedback(&self, limit: usize, cursor: Option<Cursor>) -> Result<FeedbackPage> {
        debug!("Listing feedback (limit: {}, cursor: {:?})", limit, cursor);

        let conn = self.get_conn()?;
        let mut rows = match cursor {
            Some(c) => conn
                .query(
                    "SELECT seq, feedback_id, name, email, message, rating, sentiment, created_at
                     FROM feedback
                     WHERE created_at < ? OR (created_at = ? AND seq < ?)
                     ORDER BY created_at DESC, seq DESC
                     LIMIT ?",
                    params![c.created_at, c.created_at, c.seq, limit as i64],
                )
                .await,
            None => conn
                .query(
                    "SELECT seq, feedback_id, name, email, message, rating, sentiment, created_at
                     FROM feedback
                     ORDER BY created_at DESC, seq DESC
                     LIMIT ?",
                    params![limit as i64],
                )
                .await,
        }
        .map_err(|e| FeedbackError::Storage(format!("List query failed: {}", e)))?;

        let mut records = Vec::new();
        let mut last_position = None;

        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| FeedbackError::Storage(format!("List query failed: {}", e)))?
        {
            let seq = row
                .get::<i64>(0)
                .map_err(|e| FeedbackError::Storage(format!("Failed to read seq: {}", e)))?;
            let record = Self::row_to_record(&row)?;
            last_position = Some(Cursor {
                created_at: record.created_at,
                seq,
            });
            records.push(record);
        }

        // A full page may have more behind it; a short page is the end.
        let next_cursor = if records.len() == limit {
            last_position.map(|c| c.encode())
        } else {
            None
        };

        Ok(FeedbackPage {
            records,
            next_cursor,
        })
    }

    async fn count_feedback(&self) -> Result<u64> {
        let count = self
            .query_scalar("SELECT COUNT(*) FROM feedback", params![])
            .await?;
        Ok(count as u64)
    }

    async fn sum_ratings(&self) -> Result<u64> {
        let sum = self
            .query_scalar("SELECT COALESCE(SUM(rating), 0) FROM feedback", params![])
            .await?;
        Ok(sum as u64)
    }

    async fn count_by_sentiment(&self, sentiment: Sentiment) -> Result<u64> {
        let count = self
            .query_scalar(
                "SELECT COUNT(*) FROM feedback WHERE sentiment = ?",
                params![sentiment.as_str()],
            )
            .await?;
        Ok(count as u64)
    }
}
