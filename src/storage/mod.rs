//! Storage layer for the feedback engine
//!
//! Provides the storage abstraction and the libSQL-backed implementation for
//! durable, append-only persistence of feedback records.

pub mod libsql;

use crate::error::{FeedbackError, Result};
use crate::types::{FeedbackRecord, Sentiment};
use async_trait::async_trait;

/// Opaque keyset cursor for paginated listing
///
/// Encodes the (created_at, insertion sequence) position of the last record
/// on the previous page. The wire form is `"{created_at}:{seq}"`; callers
/// treat it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: i64,
    pub seq: i64,
}

impl Cursor {
    /// Parse a cursor from its wire form
    pub fn parse(s: &str) -> Result<Self> {
        let (created_at, seq) = s
            .split_once(':')
            .ok_or_else(|| FeedbackError::Validation(format!("invalid cursor: {}", s)))?;
        let created_at = created_at
            .parse::<i64>()
            .map_err(|_| FeedbackError::Validation(format!("invalid cursor: {}", s)))?;
        let seq = seq
            .parse::<i64>()
            .map_err(|_| FeedbackError::Validation(format!("invalid cursor: {}", s)))?;
        Ok(Self { created_at, seq })
    }

    /// Encode the cursor into its wire form
    pub fn encode(&self) -> String {
        format!("{}:{}", self.created_at, self.seq)
    }
}

/// One page of feedback records, most recent first
#[derive(Debug, Clone)]
pub struct FeedbackPage {
    pub records: Vec<FeedbackRecord>,
    /// Cursor for the next page; `None` when the listing is exhausted
    pub next_cursor: Option<String>,
}

/// Storage backend trait defining all required operations
///
/// Records are append-only: there is no update or delete operation. The
/// aggregate primitives exist so the analytics counters can be rebuilt from
/// the authoritative record set after a restart.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persist a new feedback record atomically
    ///
    /// Fails with `FeedbackError::Storage` on durability failure; callers
    /// must not assume partial persistence.
    async fn insert_feedback(&self, record: &FeedbackRecord) -> Result<()>;

    /// List records ordered by `created_at` descending, ties broken by
    /// insertion sequence descending
    ///
    /// Repeated calls with the same cursor are idempotent absent concurrent
    /// writes: no record is skipped or duplicated.
    async fn list_feedback(&self, limit: usize, cursor: Option<Cursor>) -> Result<FeedbackPage>;

    /// Total number of records ever inserted
    async fn count_feedback(&self) -> Result<u64>;

    /// Exact sum of all ratings
    async fn sum_ratings(&self) -> Result<u64>;

    /// Number of records carrying the given sentiment
    async fn count_by_sentiment(&self, sentiment: Sentiment) -> Result<u64>;
}
