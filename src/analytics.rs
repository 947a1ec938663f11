//! Aggregate maintenance for feedback analytics
//!
//! Keeps the running totals (count, rating sum, per-sentiment counts) that
//! back `GET /analytics`. Counters are updated incrementally as records are
//! inserted and can be rebuilt wholesale from the store, which is the
//! recovery path after a restart.

use crate::error::Result;
use crate::storage::StorageBackend;
use crate::types::{AnalyticsSnapshot, FeedbackRecord, Sentiment};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Raw running counters; sums and counts are authoritative, the average is
/// derived at snapshot time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    total: u64,
    rating_sum: u64,
    positive: u64,
    neutral: u64,
    negative: u64,
}

impl Counters {
    fn apply(&mut self, record: &FeedbackRecord) {
        self.total += 1;
        self.rating_sum += record.rating as u64;
        match record.sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    fn snapshot(&self) -> AnalyticsSnapshot {
        let avg_rating = if self.total == 0 {
            0.0
        } else {
            self.rating_sum as f64 / self.total as f64
        };
        AnalyticsSnapshot {
            total_feedbacks: self.total,
            avg_rating,
            positive_count: self.positive,
            neutral_count: self.neutral,
            negative_count: self.negative,
        }
    }
}

/// Maintains the running analytics aggregate
///
/// The write lock serializes the read-modify-write of all four counters, so
/// concurrent submissions cannot lose updates and readers never observe a
/// half-applied record.
pub struct AggregateMaintainer {
    counters: RwLock<Counters>,
}

impl AggregateMaintainer {
    /// Create a maintainer with zeroed counters
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(Counters::default()),
        }
    }

    /// Fold one newly persisted record into the aggregate
    ///
    /// Must be called exactly once per inserted record, after the record is
    /// durable. All counters move as one atomic unit under the write guard.
    pub async fn apply(&self, record: &FeedbackRecord) {
        let mut counters = self.counters.write().await;
        counters.apply(record);
        debug!(
            total = counters.total,
            sentiment = %record.sentiment,
            "Aggregate updated"
        );
    }

    /// Consistent view of the aggregate
    pub async fn snapshot(&self) -> AnalyticsSnapshot {
        self.counters.read().await.snapshot()
    }

    /// Replace the counters from the store's authoritative record set
    ///
    /// Run at startup so incremental state lost between persist and apply
    /// (e.g. to a crash) is recovered. The result always equals what a full
    /// recomputation over the store produces.
    pub async fn rebuild(&self, store: &dyn StorageBackend) -> Result<()> {
        let rebuilt = Counters {
            total: store.count_feedback().await?,
            rating_sum: store.sum_ratings().await?,
            positive: store.count_by_sentiment(Sentiment::Positive).await?,
            neutral: store.count_by_sentiment(Sentiment::Neutral).await?,
            negative: store.count_by_sentiment(Sentiment::Negative).await?,
        };

        let mut counters = self.counters.write().await;
        *counters = rebuilt;
        info!(total = counters.total, "Aggregate rebuilt from store");
        Ok(())
    }
}

impl Default for AggregateMaintainer {
    fn default() -> Self {
        Self::new()
    }
}
