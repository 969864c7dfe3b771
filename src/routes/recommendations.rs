use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::info!(
            request_id = %request_id,
            error = %rejection.body_text(),
            "Rejected recommendation request"
        );
        AppError::InvalidInput(rejection.body_text())
    })?;

    tracing::info!(
        request_id = %request_id,
        category_id = ?request.category_id,
        subcategory_id = ?request.subcategory_id,
        "Processing recommendation request"
    );

    let response = recommendations::get_recommendations(
        state.catalog.as_ref(),
        &state.energy_data,
        state.catalog_timeout,
        request,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(response))
}
