use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;

use crate::error::{Result, AppError};
use crate::api::models::{ExtractRequest, ExtractResponse};
use crate::extract::{ExtractOptions, ExtractedFields};
use crate::AppState;

pub const SERVICE_NAME: &str = "Raindrop AI - Extract Service";

const NOT_RETRIEVED: &str = "Could not retrieve the article content. The site may require a login, \
need JavaScript to render the page, or be blocking automated access.";

const NOT_AN_ARTICLE: &str = "Extraction failed - content may not be an article";

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/extract", post(extract_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "extract": "/extract (POST)"
        }
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "extract" }))
}

async fn extract_handler(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>> {
    tracing::info!("Received request for URL: {}", req.url);
    let start_time = Instant::now();

    let result = process_extract_request(&state, &req).await;

    match &result {
        Ok(response) => {
            tracing::info!(
                "Extracted {} chars ({}) from {} in {:?}",
                response.length,
                response.language,
                req.url,
                start_time.elapsed()
            );
        }
        Err(err @ (AppError::NotFound(_) | AppError::Unprocessable(_))) => {
            tracing::warn!("Request for {} failed: {}", req.url, err);
        }
        Err(AppError::Internal(source)) => {
            tracing::error!("Exception for URL {}: {:?}", req.url, source);
        }
        Err(err) => {
            tracing::error!("Exception for URL {}: {}", req.url, err);
        }
    }

    result.map(Json)
}

async fn process_extract_request(state: &AppState, req: &ExtractRequest) -> Result<ExtractResponse> {
    let url = req.url.as_str();

    let downloaded = match state.primary.fetch(url).await {
        Ok(html) => Some(html),
        Err(e) => {
            tracing::warn!("HTTP request failed for URL: {}, error: {}", url, e);
            match state.fallback.fetch(url).await {
                Ok(html) => Some(html),
                Err(e) => {
                    tracing::warn!("Fallback download failed for URL: {}, error: {}", url, e);
                    None
                }
            }
        }
    };

    let html = downloaded
        .filter(|html| !html.is_empty())
        .ok_or_else(|| AppError::NotFound(NOT_RETRIEVED.to_string()))?;
    tracing::debug!("Downloaded {} bytes from {}", html.len(), url);

    let extractor = Arc::clone(&state.extractor);
    let source = url.to_string();
    let options = ExtractOptions {
        include_comments: false,
        include_tables: false,
    };
    let record = tokio::task::spawn_blocking(move || extractor.extract(&html, &source, options))
        .await??
        .ok_or_else(|| AppError::Unprocessable(NOT_AN_ARTICLE.to_string()))?;

    let fields = ExtractedFields::parse(&record)?;
    Ok(ExtractResponse::from(fields))
}
