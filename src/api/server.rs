//! HTTP API server for the feedback engine

use crate::error::FeedbackError;
use crate::service::FeedbackService;
use crate::types::{AnalyticsSnapshot, FeedbackId, FeedbackItem, NewFeedback};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server address
    pub addr: SocketAddr,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 8080).into(),
        }
    }
}

/// API server state
#[derive(Clone)]
struct AppState {
    service: Arc<FeedbackService>,
}

/// API server
pub struct ApiServer {
    config: ApiServerConfig,
    service: Arc<FeedbackService>,
}

impl ApiServer {
    /// Create new API server over a feedback service
    pub fn new(config: ApiServerConfig, service: Arc<FeedbackService>) -> Self {
        Self { config, service }
    }

    /// Build router
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(
                "/feedback",
                post(submit_feedback_handler).get(list_feedback_handler),
            )
            .route("/analytics", get(analytics_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            // The original service answered with Access-Control-Allow-Origin: *
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until shutdown
    pub async fn serve(self) -> anyhow::Result<()> {
        let state = AppState {
            service: self.service.clone(),
        };
        let router = Self::build_router(state);

        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;
        info!("Feedback API listening on http://{}", self.config.addr);
        axum::serve(listener, router).await?;
        Ok(())
    }
}

/// Error payload for non-2xx responses
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FeedbackError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Submission response, echoing the created id
#[derive(Debug, Serialize, Deserialize)]
struct SubmitResponse {
    ok: bool,
    feedback_id: FeedbackId,
}

async fn submit_feedback_handler(
    State(state): State<AppState>,
    Json(submission): Json<NewFeedback>,
) -> Result<(StatusCode, Json<SubmitResponse>), FeedbackError> {
    let feedback_id = state.service.submit(submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            ok: true,
            feedback_id,
        }),
    ))
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
struct ListParams {
    limit: Option<usize>,
    cursor: Option<String>,
}

/// Listing response
#[derive(Debug, Serialize, Deserialize)]
struct ListResponse {
    items: Vec<FeedbackItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

async fn list_feedback_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, FeedbackError> {
    let page = state
        .service
        .list_feedback(params.limit.unwrap_or(0), params.cursor.as_deref())
        .await?;

    Ok(Json(ListResponse {
        items: page.records.into_iter().map(FeedbackItem::from).collect(),
        next_cursor: page.next_cursor,
    }))
}

async fn analytics_handler(State(state): State<AppState>) -> Json<AnalyticsSnapshot> {
    Json(state.service.analytics().await)
}

/// Health check handler
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentPolicy;
    use crate::storage::libsql::{ConnectionMode, LibsqlStorage};
    use crate::types::Sentiment;

    async fn app_state() -> AppState {
        let store = Arc::new(LibsqlStorage::new(ConnectionMode::InMemory).await.unwrap());
        let service = FeedbackService::new(store, SentimentPolicy::RatingThreshold)
            .await
            .unwrap();
        AppState {
            service: Arc::new(service),
        }
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
    async fn test_submit_returns_created() {
        let state = app_state().await;
        let (status, body) = submit_feedback_handler(State(state), Json(submission("Great!", 5)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.0.ok);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_message() {
        let state = app_state().await;
        let err = submit_feedback_handler(State(state), Json(submission("", 5)))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_shape() {
        let state = app_state().await;
        submit_feedback_handler(State(state.clone()), Json(submission("Great!", 5)))
            .await
            .unwrap();

        let body = list_feedback_handler(State(state), Query(ListParams::default()))
            .await
            .unwrap();
        assert_eq!(body.0.items.len(), 1);
        assert_eq!(body.0.items[0].sentiment, Sentiment::Positive);
        assert!(body.0.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_analytics_empty_store() {
        let state = app_state().await;
        let body = analytics_handler(State(state)).await;
        assert_eq!(body.0, AnalyticsSnapshot::empty());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = health_handler().await;
        assert_eq!(response.0.status, "ok");
    }
}
