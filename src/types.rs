//! Core data types for the feedback engine
//!
//! This module defines the fundamental data structures used throughout the
//! engine: feedback records, sentiment labels, submissions, and the analytics
//! aggregate exposed to readers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel stored for absent or blank name/email fields
pub const ANONYMOUS: &str = "anonymous";

/// Unique identifier for feedback records
///
/// Wraps a UUID to provide type safety and prevent mixing feedback IDs
/// with other UUID-based identifiers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub Uuid);

impl FeedbackId {
    /// Create a new random feedback ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a feedback ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for FeedbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sentiment label assigned to a feedback record at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All sentiment labels, in aggregate-reporting order
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Label as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// Parse a stored sentiment label
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw submission as received from the client, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFeedback {
    /// Submitter name; defaults to the anonymous sentinel
    #[serde(default)]
    pub name: Option<String>,
    /// Submitter email; defaults to the anonymous sentinel
    #[serde(default)]
    pub email: Option<String>,
    /// Feedback text; required non-empty
    #[serde(default)]
    pub message: String,
    /// Star rating; must be in [1,5]
    #[serde(default)]
    pub rating: i64,
}

/// A fully-constructed, immutable feedback record
///
/// Created exactly once by a submission; never updated or deleted.
/// The sentiment reflects the classifier output at creation time and is
/// never recomputed, even if classifier policy changes later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub feedback_id: FeedbackId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub rating: i64,
    pub sentiment: Sentiment,
    /// Seconds since epoch; sole sort key (descending) for listing
    pub created_at: i64,
}

/// Wire shape of a single feedback item in the list response
///
/// Matches the client contract: no email field is exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub feedback_id: FeedbackId,
    pub name: String,
    pub message: String,
    pub rating: i64,
    pub sentiment: Sentiment,
    pub created_at: i64,
}

impl From<FeedbackRecord> for FeedbackItem {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            feedback_id: record.feedback_id,
            name: record.name,
            message: record.message,
            rating: record.rating,
            sentiment: record.sentiment,
            created_at: record.created_at,
        }
    }
}

/// Consistent view of the running analytics aggregate
///
/// Raw sums and counts are authoritative; any rounding for display belongs
/// to the presentation boundary, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_feedbacks: u64,
    pub avg_rating: f64,
    pub positive_count: u64,
    pub neutral_count: u64,
    pub negative_count: u64,
}

impl AnalyticsSnapshot {
    /// Snapshot of an empty store: all zeroes, no division performed
    pub fn empty() -> Self {
        Self {
            total_feedbacks: 0,
            avg_rating: 0.0,
            positive_count: 0,
            neutral_count: 0,
            negative_count: 0,
        }
    }
}
