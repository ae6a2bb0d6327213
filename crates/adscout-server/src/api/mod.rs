mod establishment;
mod market;

use std::sync::Arc;

use adscout_core::Lexicon;
use adscout_scraper::{AdSource, ResolveOptions, SourceProvider};
use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub sources: Arc<dyn SourceProvider>,
    pub lexicon: Arc<Lexicon>,
    pub options: ResolveOptions,
    /// Cancelled on shutdown; every resolution runs on a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    fn open_session(&self, req_id: &RequestId) -> Result<Box<dyn AdSource>, ApiError> {
        self.sources.open_session().map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "failed to open ad source session");
            ApiError::internal(e.to_string())
        })
    }
}

/// Error response rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

/// Returns the field value unless it is absent or empty. Whitespace-only
/// values pass through; the resolver reports them as not found.
fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{field} is required")))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn lookup_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/check-establishment",
            post(establishment::check_establishment),
        )
        .route("/api/has-ads", post(establishment::has_ads))
        .route("/api/search-ads", post(market::search_ads))
        .route(
            "/api/analyze-competition",
            post(market::analyze_competition),
        )
        .route("/api/check-advertiser", post(market::check_advertiser))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(lookup_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "healthy",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
