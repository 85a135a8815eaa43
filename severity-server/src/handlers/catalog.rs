//! Vocabulary and model description handlers

use axum::{extract::State, Json};

use crate::models::{current_year, ModelResponse, VocabularyResponse};
use crate::AppState;

/// Allowed categorical values and numeric domains
pub async fn vocabulary(State(state): State<AppState>) -> Json<VocabularyResponse> {
    Json(VocabularyResponse::new(&state.predictor, current_year()))
}

/// Loaded model, scaler and feature layout
pub async fn model(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse::new(&state.predictor))
}
