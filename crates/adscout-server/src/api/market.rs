use adscout_core::{AdvertiserSummary, CompetitionAnalysis};
use adscout_scraper::{
    advertiser_summary, clamp_max_results, competition_for, search_by_location, LocationSearch,
    ScraperError,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use super::{required, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct LocationRequest {
    location: Option<String>,
    business_type: Option<String>,
    max_results: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AdvertiserRequest {
    advertiser_name: Option<String>,
}

fn lookup_failed(req_id: &RequestId, route: &str, error: &ScraperError) -> ApiError {
    tracing::error!(request_id = %req_id.0, route, error = %error, "ad lookup failed");
    ApiError::internal(error.to_string())
}

pub(super) async fn search_ads(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<LocationSearch>, ApiError> {
    let Json(body) = payload?;
    let location = required(body.location, "location")?;
    let business_type = required(body.business_type, "business_type")?;
    let max_results = clamp_max_results(body.max_results);

    let session = state.open_session(&req_id)?;
    let found = search_by_location(
        session.as_ref(),
        &location,
        &business_type,
        max_results,
        state.options.fetch_deadline,
    )
    .await
    .map_err(|e| lookup_failed(&req_id, "search-ads", &e))?;

    Ok(Json(found))
}

pub(super) async fn analyze_competition(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<CompetitionAnalysis>, ApiError> {
    let Json(body) = payload?;
    let location = required(body.location, "location")?;
    let business_type = required(body.business_type, "business_type")?;

    let session = state.open_session(&req_id)?;
    let analysis = competition_for(
        session.as_ref(),
        &location,
        &business_type,
        state.options.fetch_deadline,
    )
    .await
    .map_err(|e| lookup_failed(&req_id, "analyze-competition", &e))?;

    Ok(Json(analysis))
}

pub(super) async fn check_advertiser(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AdvertiserRequest>, JsonRejection>,
) -> Result<Json<AdvertiserSummary>, ApiError> {
    let Json(body) = payload?;
    let advertiser_name = required(body.advertiser_name, "advertiser_name")?;

    let session = state.open_session(&req_id)?;
    let summary = advertiser_summary(
        session.as_ref(),
        &advertiser_name,
        &state.lexicon,
        state.options.fetch_deadline,
    )
    .await
    .map_err(|e| lookup_failed(&req_id, "check-advertiser", &e))?;

    Ok(Json(summary))
}
