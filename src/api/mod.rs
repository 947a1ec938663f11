//! HTTP API for the feedback engine
//!
//! Provides:
//! - Feedback submission (POST /feedback)
//! - Reverse-chronological listing (GET /feedback)
//! - Analytics snapshot (GET /analytics)
//! - Health check (GET /health)

pub mod server;

pub use server::{ApiServer, ApiServerConfig};
