//! Sentiment classification
//!
//! Pure, deterministic mapping from a submission's rating and message text to
//! a sentiment label. Classification happens exactly once, at record creation;
//! stored records are never reclassified.

use crate::types::Sentiment;
use serde::{Deserialize, Serialize};

/// Positive-signal words for the lexical policy
const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "awesome",
    "excellent",
    "love",
    "nice",
    "fantastic",
    "best",
    "happy",
    "satisfied",
];

/// Negative-signal words for the lexical policy
const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "worst",
    "disappointed",
    "poor",
    "sad",
    "angry",
    "unsatisfied",
];

/// Classification policy
///
/// Both policies are total over the legal input domain, so classification
/// never fails a submission. Any future non-total classifier must fall back
/// to `Neutral` instead of erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentPolicy {
    /// Reference mapping: rating >= 4 positive, == 3 neutral, <= 2 negative.
    /// Ignores message content entirely.
    #[default]
    RatingThreshold,
    /// Word-list scoring over the lowercased message; the rating is ignored.
    /// Ties and empty messages are neutral.
    Lexical,
}

/// Classify a submission under the given policy
///
/// Deterministic and side-effect free. `rating` is expected to already be
/// validated into [1,5]; `message` may be arbitrary text.
pub fn classify(policy: SentimentPolicy, rating: i64, message: &str) -> Sentiment {
    match policy {
        SentimentPolicy::RatingThreshold => classify_by_rating(rating),
        SentimentPolicy::Lexical => classify_by_lexicon(message),
    }
}

fn classify_by_rating(rating: i64) -> Sentiment {
    if rating >= 4 {
        Sentiment::Positive
    } else if rating == 3 {
        Sentiment::Neutral
    } else {
        Sentiment::Negative
    }
}

fn classify_by_lexicon(message: &str) -> Sentiment {
    if message.is_empty() {
        return Sentiment::Neutral;
    }

    let text = message.to_lowercase();
    let positive = POSITIVE_WORDS.iter().filter(|w| text.contains(*w)).count();
    let negative = NEGATIVE_WORDS.iter().filter(|w| text.contains(*w)).count();

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_threshold_mapping() {
        let policy = SentimentPolicy::RatingThreshold;
        assert_eq!(classify(policy, 5, ""), Sentiment::Positive);
        assert_eq!(classify(policy, 4, ""), Sentiment::Positive);
        assert_eq!(classify(policy, 3, ""), Sentiment::Neutral);
        assert_eq!(classify(policy, 2, ""), Sentiment::Negative);
        assert_eq!(classify(policy, 1, ""), Sentiment::Negative);
    }

    #[test]
    fn test_rating_policy_ignores_message() {
        let policy = SentimentPolicy::RatingThreshold;
        let messages = ["", "terrible awful worst", "love it", "中文反馈"];
        for msg in messages {
            assert_eq!(classify(policy, 5, msg), Sentiment::Positive);
            assert_eq!(classify(policy, 3, msg), Sentiment::Neutral);
            assert_eq!(classify(policy, 1, msg), Sentiment::Negative);
        }
    }

    #[test]
    fn test_lexical_positive() {
        let policy = SentimentPolicy::Lexical;
        assert_eq!(
            classify(policy, 1, "Great service, love the new menu"),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_lexical_negative() {
        let policy = SentimentPolicy::Lexical;
        assert_eq!(
            classify(policy, 5, "Terrible experience, very disappointed"),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_lexical_tie_and_empty_are_neutral() {
        let policy = SentimentPolicy::Lexical;
        assert_eq!(classify(policy, 3, ""), Sentiment::Neutral);
        assert_eq!(classify(policy, 3, "no opinion"), Sentiment::Neutral);
        // One positive and one negative hit cancel out
        assert_eq!(classify(policy, 3, "good but bad"), Sentiment::Neutral);
    }

    #[test]
    fn test_lexical_case_insensitive() {
        let policy = SentimentPolicy::Lexical;
        assert_eq!(classify(policy, 3, "AWESOME"), Sentiment::Positive);
    }

    #[test]
    fn test_determinism() {
        for policy in [SentimentPolicy::RatingThreshold, SentimentPolicy::Lexical] {
            for rating in 1..=5 {
                let first = classify(policy, rating, "pretty good overall");
                for _ in 0..10 {
                    assert_eq!(classify(policy, rating, "pretty good overall"), first);
                }
            }
        }
    }
}
