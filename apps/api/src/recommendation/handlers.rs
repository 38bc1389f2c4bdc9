//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::preferences::PreferenceRequest;
use crate::recommendation::advisor::recommend_build;
use crate::recommendation::models::RecommendationResponse;
use crate::state::AppState;

/// POST /api/get-build-recommendation
///
/// Full pipeline: validate preferences → compile prompt → one completion call → validate.
/// Returns the validated build, or an error body the front-end can show as-is.
pub async fn handle_build_recommendation(
    State(state): State<AppState>,
    payload: Result<Json<PreferenceRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();

    let response = recommend_build(state.llm.as_ref(), request, &state.advisor)
        .instrument(tracing::info_span!("recommendation", %request_id))
        .await?;

    Ok(Json(response))
}
