use adscout_core::ResolutionResult;
use adscout_scraper::{AdSource, EstablishmentResolver};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::{required, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AddressRequest {
    maps_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct HasAdsResponse {
    has_ads: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn resolve(state: &AppState, session: &dyn AdSource, address: &str) -> ResolutionResult {
    let cancel = state.shutdown.child_token();
    EstablishmentResolver::new(session, &state.lexicon, state.options)
        .resolve(address, &cancel)
        .await
}

pub(super) async fn check_establishment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AddressRequest>, JsonRejection>,
) -> Result<Json<ResolutionResult>, ApiError> {
    let Json(body) = payload?;
    let maps_address = required(body.maps_address, "maps_address")?;

    let session = state.open_session(&req_id)?;
    let result = resolve(&state, session.as_ref(), &maps_address).await;

    tracing::info!(
        request_id = %req_id.0,
        has_ads = result.has_ads,
        matches = result.total_matching_ads,
        searched = result.total_ads_searched,
        "establishment check complete"
    );
    Ok(Json(result))
}

/// Boolean-only variant of [`check_establishment`]. Internal failures still
/// answer 200 with `has_ads: false`.
pub(super) async fn has_ads(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AddressRequest>, JsonRejection>,
) -> (StatusCode, Json<HasAdsResponse>) {
    let maps_address = match payload
        .map_err(ApiError::from)
        .and_then(|Json(body)| required(body.maps_address, "maps_address"))
    {
        Ok(address) => address,
        Err(e) => return has_ads_failure(e.status, e.message),
    };

    let session = match state.open_session(&req_id) {
        Ok(session) => session,
        Err(e) => return has_ads_failure(StatusCode::OK, e.message),
    };
    let result = resolve(&state, session.as_ref(), &maps_address).await;

    (
        StatusCode::OK,
        Json(HasAdsResponse {
            has_ads: result.has_ads,
            error: None,
        }),
    )
}

fn has_ads_failure(status: StatusCode, message: String) -> (StatusCode, Json<HasAdsResponse>) {
    (
        status,
        Json(HasAdsResponse {
            has_ads: false,
            error: Some(message),
        }),
    )
}
