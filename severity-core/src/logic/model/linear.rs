//! Linear classifiers
//!
//! `coefficients` has one row for binary problems (positive class is
//! `classes[1]`) and one row per class otherwise.

use serde::{Deserialize, Serialize};

use super::inference::{
    argmax, check_probabilities, check_width, Inference, InferenceEngine, InferenceError,
};
use crate::logic::scaler::ScaledVector;

// ============================================================================
// SHARED LINEAR DECISION
// ============================================================================

fn validate_linear(
    classes: &[i64],
    coefficients: &[Vec<f64>],
    intercept: &[f64],
) -> Result<(), InferenceError> {
    let invalid = |msg: String| Err(InferenceError::InvalidModel(msg));

    if classes.len() < 2 {
        return invalid(format!("need at least 2 classes, got {}", classes.len()));
    }
    let rows = if classes.len() == 2 { 1 } else { classes.len() };
    if coefficients.len() != rows || intercept.len() != rows {
        return invalid(format!(
            "expected {} coefficient rows and intercepts for {} classes, got {} and {}",
            rows,
            classes.len(),
            coefficients.len(),
            intercept.len()
        ));
    }

    let width = coefficients[0].len();
    if width == 0 || coefficients.iter().any(|row| row.len() != width) {
        return invalid("coefficient rows must be non-empty and equally long".to_string());
    }
    let finite = coefficients.iter().flatten().chain(intercept).all(|v| v.is_finite());
    if !finite {
        return invalid("non-finite coefficient".to_string());
    }
    Ok(())
}

fn decision_function(coefficients: &[Vec<f64>], intercept: &[f64], x: &[f64]) -> Vec<f64> {
    coefficients
        .iter()
        .zip(intercept)
        .map(|(row, b)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b)
        .collect()
}

/// Label for a decision vector: sign for binary, argmax otherwise
fn decide(classes: &[i64], scores: &[f64]) -> Result<i64, InferenceError> {
    let index = if scores.len() == 1 {
        usize::from(scores[0] > 0.0)
    } else {
        argmax(scores).ok_or_else(|| InferenceError::Runtime("empty decision".to_string()))?
    };
    classes
        .get(index)
        .copied()
        .ok_or_else(|| InferenceError::Runtime(format!("class index {} out of range", index)))
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

/// Logistic regression; probabilities via sigmoid (binary) or softmax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LogisticRegression {
    /// Binary model over classes `[0, 1]`
    pub fn binary(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            classes: vec![0, 1],
            coefficients: vec![coefficients],
            intercept: vec![intercept],
        }
    }

    pub fn validate(&self) -> Result<(), InferenceError> {
        validate_linear(&self.classes, &self.coefficients, &self.intercept)
    }

    fn predict_proba(&self, scores: &[f64]) -> Vec<f64> {
        if scores.len() == 1 {
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            softmax(scores)
        }
    }
}

impl InferenceEngine for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn supports_probabilities(&self) -> bool {
        true
    }

    fn infer(&self, input: &ScaledVector) -> Result<Inference, InferenceError> {
        check_width(self.n_features(), input.as_slice())?;

        let scores = decision_function(&self.coefficients, &self.intercept, input.as_slice());
        let label = decide(&self.classes, &scores)?;
        let probabilities = self.predict_proba(&scores);
        check_probabilities(&probabilities)?;

        Ok(Inference {
            label,
            probabilities: Some(probabilities),
        })
    }
}

// ============================================================================
// LINEAR SVC
// ============================================================================

/// Linear support vector classifier; no probability estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvc {
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearSvc {
    pub fn binary(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            classes: vec![0, 1],
            coefficients: vec![coefficients],
            intercept: vec![intercept],
        }
    }

    pub fn validate(&self) -> Result<(), InferenceError> {
        validate_linear(&self.classes, &self.coefficients, &self.intercept)
    }
}

impl InferenceEngine for LinearSvc {
    fn name(&self) -> &str {
        "linear_svc"
    }

    fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn supports_probabilities(&self) -> bool {
        false
    }

    fn infer(&self, input: &ScaledVector) -> Result<Inference, InferenceError> {
        check_width(self.n_features(), input.as_slice())?;

        let scores = decision_function(&self.coefficients, &self.intercept, input.as_slice());
        Ok(Inference {
            label: decide(&self.classes, &scores)?,
            probabilities: None,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
