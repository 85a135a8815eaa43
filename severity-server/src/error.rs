//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use severity_core::PipelineError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input outside its field domain
    #[error("{0}")]
    Validation(String),

    /// Categorical value not in the loaded vocabulary
    #[error("{0}")]
    UnknownCategory(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnknownCategory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::UnknownCategory(msg) => msg.clone(),
            AppError::Internal(_) => "Prediction failed due to an internal error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            other => tracing::warn!("Rejected request: {}", other),
        }

        let body = Json(json!({
            "error": self.public_message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::UnknownCategory(e) => AppError::UnknownCategory(e.to_string()),
            e @ (PipelineError::FeatureShapeMismatch(_) | PipelineError::NonFiniteFeature { .. }) => {
                AppError::Validation(e.to_string())
            }
            PipelineError::Inference(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use severity_core::logic::encoder::UnknownCategory;
    use severity_core::{CategoricalFeature, InferenceError, ShapeError};

    #[test]
    fn test_pipeline_error_mapping() {
        let unknown = PipelineError::from(UnknownCategory {
            feature: CategoricalFeature::Vehicle,
            value: "Hovercraft".to_string(),
        });
        let err = AppError::from(unknown);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.public_message().contains("Hovercraft"));

        let shape = PipelineError::from(ShapeError::Length { expected: 9, actual: 8 });
        assert_eq!(AppError::from(shape).status(), StatusCode::UNPROCESSABLE_ENTITY);

        let overflow = AppError::from(PipelineError::NonFiniteFeature { feature: "latitude" });
        assert_eq!(overflow.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(overflow.public_message().contains("latitude"));

        let runtime = PipelineError::from(InferenceError::Runtime("boom".to_string()));
        let err = AppError::from(runtime);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("boom"));
    }
}
