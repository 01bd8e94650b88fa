//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::{
    handlers,
    models::{ApiResponse, DiagnoseRequest, IdeasRequest},
};
use crate::analysis::Analyzer;
use crate::error::AnalysisError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

/// Build the router with all routes and middleware
pub fn router(analyzer: Arc<Analyzer>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/keywords/:keyword", get(keyword_handler))
        .route("/api/videos/diagnose", post(diagnose_handler))
        .route("/api/ideas", post(ideas_handler))
        .route("/api/trends", get(trends_handler))
        .with_state(AppState { analyzer })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(analyzer: Arc<Analyzer>, host: &str, port: u16) -> Result<()> {
    let app = router(analyzer);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("🌐 API server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn error_status(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::InvalidUrl(_) | AnalysisError::EmptyKeyword => StatusCode::BAD_REQUEST,
        AnalysisError::VideoNotFound(_) => StatusCode::NOT_FOUND,
    }
}

fn respond<T: Serialize>(result: crate::error::Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            warn!("Request rejected: {}", e);
            (error_status(&e), Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check()))
}

async fn keyword_handler(State(state): State<AppState>, Path(keyword): Path<String>) -> Response {
    respond(handlers::keyword_report(&state.analyzer, &keyword).await)
}

async fn diagnose_handler(
    State(state): State<AppState>,
    Json(payload): Json<DiagnoseRequest>,
) -> Response {
    respond(handlers::diagnose_video(&state.analyzer, &payload).await)
}

async fn ideas_handler(State(state): State<AppState>, Json(payload): Json<IdeasRequest>) -> Response {
    respond(handlers::video_ideas(&state.analyzer, &payload).await)
}

async fn trends_handler(State(state): State<AppState>) -> Response {
    let items = handlers::trending(&state.analyzer).await;
    (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(error_status(&AnalysisError::EmptyKeyword), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_status(&AnalysisError::InvalidUrl("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&AnalysisError::VideoNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }
}
