//! Configuration for the feedback engine
//!
//! Settings are layered: built-in defaults, then an optional `feedback.toml`
//! file, then `FEEDBACK_*` environment variables. CLI flags override the
//! loaded settings at the binary boundary.

use crate::error::Result;
use crate::sentiment::SentimentPolicy;
use config::{Config, Environment, File};
use serde::Deserialize;

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Bind address, e.g. "127.0.0.1:8080"
    pub addr: String,
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the libSQL database file; ":memory:" for an in-memory store
    pub path: String,
}

/// Classifier settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    /// Sentiment policy: "rating_threshold" (default) or "lexical"
    pub policy: SentimentPolicy,
}

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http: HttpSettings,
    pub database: DatabaseSettings,
    pub classifier: ClassifierSettings,
}

impl Settings {
    /// Load settings from defaults, optional `feedback.toml`, and the
    /// `FEEDBACK_*` environment (e.g. `FEEDBACK_HTTP__ADDR=0.0.0.0:9000`)
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("http.addr", "127.0.0.1:8080")?
            .set_default("database.path", "feedback.db")?
            .set_default("classifier.policy", "rating_threshold")?
            .add_source(File::with_name("feedback").required(false))
            .add_source(Environment::with_prefix("FEEDBACK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::load().unwrap();
        assert_eq!(settings.http.addr, "127.0.0.1:8080");
        assert_eq!(settings.database.path, "feedback.db");
        assert_eq!(settings.classifier.policy, SentimentPolicy::RatingThreshold);
    }

    #[test]
    fn test_policy_deserializes_from_snake_case() {
        let settings = Config::builder()
            .set_default("http.addr", "127.0.0.1:8080")
            .unwrap()
            .set_default("database.path", ":memory:")
            .unwrap()
            .set_default("classifier.policy", "lexical")
            .unwrap()
            .build()
            .unwrap();
        let settings: Settings = settings.try_deserialize().unwrap();
        assert_eq!(settings.classifier.policy, SentimentPolicy::Lexical);
    }
}
