//! Pipeline Module - Request assembler
//!
//! encode → assemble → scale → infer → interpret, as one linear pass.
//! The predictor holds only the immutable artifacts; nothing from one
//! request survives into the next.

pub mod verdict;

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::logic::encoder::{CategoryEncoder, UnknownCategory};
use crate::logic::features::layout::feature_name;
use crate::logic::features::{AccidentContext, FeatureVector, ShapeError, FEATURE_COUNT};
use crate::logic::model::{InferenceEngine, InferenceError, ModelInfo};
use crate::logic::scaler::{FeatureScaler, ScaledVector};

pub use verdict::{Confidence, PredictionResult, Severity, HIGH_SEVERITY_LABEL};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Request-scoped failures; each aborts only the current request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    #[error("feature shape mismatch: {0}")]
    FeatureShapeMismatch(#[from] ShapeError),

    #[error("feature {feature} is not finite after scaling")]
    NonFiniteFeature { feature: &'static str },

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

// ============================================================================
// PREDICTOR
// ============================================================================

/// Loaded artifacts plus the request pipeline over them
pub struct SeverityPredictor {
    encoder: CategoryEncoder,
    scaler: FeatureScaler,
    model: Box<dyn InferenceEngine>,
}

impl std::fmt::Debug for SeverityPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeverityPredictor")
            .field("encoder", &self.encoder)
            .field("scaler", &self.scaler.kind())
            .field("model", &self.model.name())
            .finish()
    }
}

impl SeverityPredictor {
    /// Model width must equal the feature layout
    pub fn new(
        encoder: CategoryEncoder,
        scaler: FeatureScaler,
        model: Box<dyn InferenceEngine>,
    ) -> Result<Self, InferenceError> {
        if model.n_features() != FEATURE_COUNT {
            return Err(InferenceError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: model.n_features(),
            });
        }
        Ok(Self { encoder, scaler, model })
    }

    pub fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn model_info(&self) -> ModelInfo {
        self.model.info()
    }

    /// Step 1-2: encode categoricals and assemble the layout-ordered record
    pub fn encode(&self, ctx: &AccidentContext) -> Result<FeatureVector, PipelineError> {
        let codes = self.encoder.encode_context(ctx)?;
        Ok(ctx.to_feature_vector(&codes))
    }

    /// Step 1-2 plus scaling; overflow to inf/NaN is rejected before inference
    pub fn prepare(&self, ctx: &AccidentContext) -> Result<ScaledVector, PipelineError> {
        let record = self.encode(ctx)?;
        log::trace!("Encoded record: {}", record.to_log_entry());
        let scaled = self.scaler.scale(&record)?;

        if let Some(index) = scaled.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::NonFiniteFeature {
                feature: feature_name(index).unwrap_or("unknown"),
            });
        }
        Ok(scaled)
    }

    /// Full pass for one request
    pub fn predict(&self, ctx: &AccidentContext) -> Result<PredictionResult, PipelineError> {
        let scaled = self.prepare(ctx)?;
        let inference = self.model.infer(&scaled)?;

        let result = PredictionResult::new(inference.label, inference.probabilities.as_deref());

        log::debug!(
            "Prediction: label={} severity={} confidence={:?}",
            result.label,
            result.severity,
            result.confidence.map(Confidence::percent)
        );

        Ok(result)
    }
}
