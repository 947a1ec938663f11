//! Feedback Engine - Feedback Aggregation Service
//!
//! A small Rust service that collects customer feedback, classifies each
//! item's sentiment at creation time, and maintains a running analytics
//! aggregate that always agrees with the stored records:
//! - Append-only feedback storage with reverse-chronological listing
//! - Deterministic sentiment classification (rating threshold or lexical)
//! - Incrementally maintained aggregate with rebuild-on-restart recovery
//! - HTTP API matching the browser client contract
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (FeedbackRecord, Sentiment, etc.)
//! - **Storage**: libSQL-backed durable record store
//! - **Analytics**: Running aggregate maintainer
//! - **Service**: Submission and read-path orchestration
//! - **Api**: axum HTTP server
//!
//! # Example
//!
//! ```ignore
//! use feedback_core::{FeedbackService, NewFeedback, SentimentPolicy};
//! use feedback_core::storage::libsql::{ConnectionMode, LibsqlStorage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(LibsqlStorage::new(ConnectionMode::Local("feedback.db".into())).await?);
//!     let service = FeedbackService::new(store, SentimentPolicy::RatingThreshold).await?;
//!
//!     let id = service
//!         .submit(NewFeedback {
//!             name: Some("Ann".to_string()),
//!             email: None,
//!             message: "Great!".to_string(),
//!             rating: 5,
//!         })
//!         .await?;
//!
//!     let analytics = service.analytics().await;
//!     println!("stored {} ({} total)", id, analytics.total_feedbacks);
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod sentiment;
pub mod service;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use analytics::AggregateMaintainer;
pub use config::Settings;
pub use error::{FeedbackError, Result};
pub use sentiment::{classify, SentimentPolicy};
pub use service::FeedbackService;
pub use storage::{Cursor, FeedbackPage, StorageBackend};
pub use types::{AnalyticsSnapshot, FeedbackId, FeedbackItem, FeedbackRecord, NewFeedback, Sentiment};
