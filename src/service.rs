//! Feedback service orchestration
//!
//! The single write path (validate, classify, persist, aggregate) and the two
//! read paths (reverse-chronological listing, analytics snapshot). This is
//! the externally visible contract; the HTTP layer is a thin shell over it.

use crate::analytics::AggregateMaintainer;
use crate::error::{FeedbackError, Result};
use crate::sentiment::{classify, SentimentPolicy};
use crate::storage::{Cursor, FeedbackPage, StorageBackend};
use crate::types::{AnalyticsSnapshot, FeedbackId, FeedbackRecord, NewFeedback, ANONYMOUS};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Default page size for listing, matching the original service
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Hard cap on a single listing page
pub const MAX_LIST_LIMIT: usize = 500;

/// Orchestrates submissions and the two read paths
pub struct FeedbackService {
    store: Arc<dyn StorageBackend>,
    aggregates: AggregateMaintainer,
    policy: SentimentPolicy,
}

impl FeedbackService {
    /// Create a service over the given store, rebuilding the aggregate from
    /// the authoritative record set (recovery path after restart)
    pub async fn new(store: Arc<dyn StorageBackend>, policy: SentimentPolicy) -> Result<Self> {
        let aggregates = AggregateMaintainer::new();
        aggregates.rebuild(store.as_ref()).await?;
        Ok(Self {
            store,
            aggregates,
            policy,
        })
    }

    /// Submit one feedback item
    ///
    /// Validation failures abort before persistence; neither the store nor
    /// the aggregate is touched. On success the record is durable and the
    /// aggregate reflects it before the id is returned.
    pub async fn submit(&self, submission: NewFeedback) -> Result<FeedbackId> {
        let message = submission.message.trim();
        if message.is_empty() {
            return Err(FeedbackError::Validation("message required".to_string()));
        }
        if !(1..=5).contains(&submission.rating) {
            return Err(FeedbackError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                submission.rating
            )));
        }

        let sentiment = classify(self.policy, submission.rating, message);
        let record = FeedbackRecord {
            feedback_id: FeedbackId::new(),
            name: sentinel_or(submission.name),
            email: sentinel_or(submission.email),
            message: message.to_string(),
            rating: submission.rating,
            sentiment,
            created_at: Utc::now().timestamp(),
        };

        self.store.insert_feedback(&record).await?;
        self.aggregates.apply(&record).await;

        info!(id = %record.feedback_id, sentiment = %sentiment, "Feedback accepted");
        Ok(record.feedback_id)
    }

    /// List feedback, most recent first
    ///
    /// `limit` of zero falls back to the default; values above the cap are
    /// clamped. The cursor is the opaque token from a previous page.
    pub async fn list_feedback(&self, limit: usize, cursor: Option<&str>) -> Result<FeedbackPage> {
        let limit = if limit == 0 {
            DEFAULT_LIST_LIMIT
        } else {
            limit.min(MAX_LIST_LIMIT)
        };
        let cursor = cursor.map(Cursor::parse).transpose()?;

        debug!(limit, ?cursor, "Listing feedback");
        self.store.list_feedback(limit, cursor).await
    }

    /// Consistent analytics snapshot
    pub async fn analytics(&self) -> AnalyticsSnapshot {
        self.aggregates.snapshot().await
    }
}

/// Substitute the anonymous sentinel for absent or blank optional fields
fn sentinel_or(value: Option<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => ANONYMOUS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::libsql::{ConnectionMode, LibsqlStorage};
    use crate::types::Sentiment;

    async fn service() -> FeedbackService {
        let store = Arc::new(LibsqlStorage::new(ConnectionMode::InMemory).await.unwrap());
        FeedbackService::new(store, SentimentPolicy::RatingThreshold)
            .await
            .unwrap()
    }

    fn submission(message: &str, rating: i64) -> NewFeedback {
        NewFeedback {
            name: None,
            email: None,
            message: message.to_string(),
            rating,
        }
    }

    #[tokio::test]
    async fn test_submit_then_list_head() {
        let service = service().await;
        service.submit(submission("first", 3)).await.unwrap();
        let id = service.submit(submission("second", 4)).await.unwrap();

        let page = service.list_feedback(10, None).await.unwrap();
        assert_eq!(page.records[0].feedback_id, id);
        assert_eq!(page.records[0].message, "second");
    }

    #[tokio::test]
    async fn test_empty_message_rejected_without_side_effects() {
        let service = service().await;

        let err = service.submit(submission("   ", 4)).await.unwrap_err();
        assert!(matches!(err, FeedbackError::Validation(_)));

        let page = service.list_feedback(10, None).await.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(service.analytics().await, AnalyticsSnapshot::empty());
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected() {
        let service = service().await;
        for rating in [0, 6, -1, 100] {
            let err = service.submit(submission("fine", rating)).await.unwrap_err();
            assert!(matches!(err, FeedbackError::Validation(_)));
        }
        assert_eq!(service.analytics().await.total_feedbacks, 0);
    }

    #[tokio::test]
    async fn test_anonymous_sentinel_applied() {
        let service = service().await;
        service
            .submit(NewFeedback {
                name: Some("  ".to_string()),
                email: None,
                message: "hello".to_string(),
                rating: 3,
            })
            .await
            .unwrap();

        let page = service.list_feedback(1, None).await.unwrap();
        assert_eq!(page.records[0].name, ANONYMOUS);
        assert_eq!(page.records[0].email, ANONYMOUS);
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let service = service().await;
        service
            .submit(NewFeedback {
                name: Some("Ann".to_string()),
                email: None,
                message: "Great!".to_string(),
                rating: 5,
            })
            .await
            .unwrap();

        let page = service.list_feedback(10, None).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].sentiment, Sentiment::Positive);
        assert_eq!(page.records[0].name, "Ann");

        let analytics = service.analytics().await;
        assert_eq!(analytics.total_feedbacks, 1);
        assert_eq!(analytics.avg_rating, 5.0);
        assert_eq!(analytics.positive_count, 1);
        assert_eq!(analytics.neutral_count, 0);
        assert_eq!(analytics.negative_count, 0);
    }

    #[tokio::test]
    async fn test_aggregate_rebuilt_on_restart() {
        let store = Arc::new(LibsqlStorage::new(ConnectionMode::InMemory).await.unwrap());
        let service = FeedbackService::new(store.clone(), SentimentPolicy::RatingThreshold)
            .await
            .unwrap();
        service.submit(submission("kept", 5)).await.unwrap();
        service.submit(submission("also kept", 2)).await.unwrap();
        drop(service);

        // Fresh service over the same store loses the in-memory counters and
        // must recover them by recomputation
        let revived = FeedbackService::new(store, SentimentPolicy::RatingThreshold)
            .await
            .unwrap();
        let analytics = revived.analytics().await;
        assert_eq!(analytics.total_feedbacks, 2);
        assert_eq!(analytics.avg_rating, 3.5);
        assert_eq!(analytics.positive_count, 1);
        assert_eq!(analytics.negative_count, 1);
    }

    #[tokio::test]
    async fn test_invalid_cursor_is_validation_error() {
        let service = service().await;
        let err = service.list_feedback(10, Some("bogus")).await.unwrap_err();
        assert!(matches!(err, FeedbackError::Validation(_)));
    }
}
