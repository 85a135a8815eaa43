//! Inference Engine - model contract
//!
//! A model takes one scaled vector and returns a class label, plus a class
//! probability distribution when the model type supports it.
//! Separate from the pipeline so the artifact format can change freely.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::forest::RandomForest;
use super::linear::{LinearSvc, LogisticRegression};
use crate::logic::scaler::ScaledVector;

/// Slack allowed on probabilities coming out of float math
const PROBABILITY_TOLERANCE: f64 = 1e-9;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Raw model output for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    pub label: i64,
    /// Class probabilities in class order, if the model can estimate them
    pub probabilities: Option<Vec<f64>>,
}

/// Model description for status endpoints and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub supports_probabilities: bool,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("invalid probability output: {0}")]
    InvalidProbabilities(String),

    #[error("inference failed: {0}")]
    Runtime(String),
}

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// Trait for inference engines (linear, tree ensemble, ONNX, ...)
///
/// Implementations are immutable after load and shared across requests.
pub trait InferenceEngine: Send + Sync {
    /// Model type name
    fn name(&self) -> &str;

    /// Number of input columns the model was trained on
    fn n_features(&self) -> usize;

    /// Class labels in probability order
    fn classes(&self) -> &[i64];

    /// Whether `infer` returns probabilities
    fn supports_probabilities(&self) -> bool;

    /// Single deterministic forward pass
    fn infer(&self, input: &ScaledVector) -> Result<Inference, InferenceError>;

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.name().to_string(),
            n_features: self.n_features(),
            classes: self.classes().to_vec(),
            supports_probabilities: self.supports_probabilities(),
        }
    }
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// Model artifact (`model.json`), tagged by model type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    LinearSvc(LinearSvc),
    RandomForest(RandomForest),
}

impl ModelArtifact {
    /// Validate and box the engine
    pub fn into_engine(self) -> Result<Box<dyn InferenceEngine>, InferenceError> {
        let engine: Box<dyn InferenceEngine> = match self {
            ModelArtifact::LogisticRegression(model) => {
                model.validate()?;
                Box::new(model)
            }
            ModelArtifact::LinearSvc(model) => {
                model.validate()?;
                Box::new(model)
            }
            ModelArtifact::RandomForest(model) => {
                model.validate()?;
                Box::new(model)
            }
        };
        Ok(engine)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Reject inputs whose width differs from the model's
pub fn check_width(expected: usize, input: &[f64]) -> Result<(), InferenceError> {
    if input.len() != expected {
        return Err(InferenceError::FeatureCount {
            expected,
            actual: input.len(),
        });
    }
    Ok(())
}

/// Probabilities must be finite and inside [0, 1]
pub fn check_probabilities(probabilities: &[f64]) -> Result<(), InferenceError> {
    if probabilities.is_empty() {
        return Err(InferenceError::InvalidProbabilities("empty distribution".to_string()));
    }
    for (i, &p) in probabilities.iter().enumerate() {
        if !p.is_finite() || p < -PROBABILITY_TOLERANCE || p > 1.0 + PROBABILITY_TOLERANCE {
            return Err(InferenceError::InvalidProbabilities(format!(
                "class {} has probability {}",
                i, p
            )));
        }
    }
    Ok(())
}

/// Index of the largest value; first one wins on ties
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[0.9, 0.1]), Some(0));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_check_probabilities() {
        assert!(check_probabilities(&[0.3, 0.7]).is_ok());
        assert!(check_probabilities(&[0.0, 1.0]).is_ok());
        assert!(check_probabilities(&[]).is_err());
        assert!(check_probabilities(&[1.2, -0.2]).is_err());
        assert!(check_probabilities(&[f64::NAN, 0.5]).is_err());
    }

    #[test]
    fn test_check_width() {
        assert!(check_width(9, &[0.0; 9]).is_ok());
        assert_eq!(
            check_width(9, &[0.0; 4]),
            Err(InferenceError::FeatureCount { expected: 9, actual: 4 })
        );
    }

    #[test]
    fn test_artifact_kind_tag() {
        let json = serde_json::json!({
            "kind": "linear_svc",
            "classes": [0, 1],
            "coefficients": [vec![0.0; 9]],
            "intercept": [1.0],
        });
        let artifact: ModelArtifact = serde_json::from_value(json).unwrap();
        let engine = artifact.into_engine().unwrap();
        assert_eq!(engine.name(), "linear_svc");
        assert!(!engine.supports_probabilities());
        assert_eq!(engine.info().classes, vec![0, 1]);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = serde_json::json!({ "kind": "gradient_boosting" });
        assert!(serde_json::from_value::<ModelArtifact>(json).is_err());
    }
}
