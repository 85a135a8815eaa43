//! JSON prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use uuid::Uuid;

use crate::models::{current_year, PredictRequest, PredictResponse};
use crate::{AppError, AppResult, AppState};

/// Run one accident context through the pipeline
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload?;
    let request_id = Uuid::new_v4();

    req.check(current_year()).map_err(AppError::Validation)?;
    let ctx = req.into_context();

    let result = state.predictor.predict(&ctx).map_err(|e| {
        tracing::warn!(%request_id, error = %e, "Prediction rejected");
        AppError::from(e)
    })?;

    tracing::info!(
        %request_id,
        label = result.label,
        severity = %result.severity,
        confidence = ?result.confidence.map(|c| c.percent()),
        "Prediction served"
    );

    Ok(Json(PredictResponse::new(request_id, &ctx, result)))
}
