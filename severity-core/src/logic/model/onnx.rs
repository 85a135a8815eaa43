//! ONNX Runtime classifier
//!
//! Expects a converted classifier graph with one float input of shape
//! `[1, FEATURE_COUNT]`, an int64 label output and, optionally, a float
//! probability output `[1, n_classes]` (export without ZipMap).

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::inference::{check_probabilities, Inference, InferenceEngine, InferenceError};
use crate::logic::features::FEATURE_COUNT;
use crate::logic::scaler::ScaledVector;

/// ONNX session behind a mutex: running a session needs exclusive access
pub struct OnnxClassifier {
    session: Mutex<Session>,
    label_output: String,
    proba_output: Option<String>,
    classes: Vec<i64>,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(model_path: &Path, classes: Vec<i64>) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError::InvalidModel(format!(
                "model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError::InvalidModel(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::InvalidModel(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::InvalidModel(format!("Failed to load model: {}", e)))?;

        let mut outputs = session.outputs.iter().map(|o| o.name.clone());
        let label_output = outputs
            .next()
            .ok_or_else(|| InferenceError::InvalidModel("No output defined".to_string()))?;
        let proba_output = outputs.next();

        log::info!(
            "ONNX model loaded (label output '{}', probabilities: {})",
            label_output,
            proba_output.as_deref().unwrap_or("none")
        );

        Ok(Self {
            session: Mutex::new(session),
            label_output,
            proba_output,
            classes,
        })
    }
}

impl InferenceEngine for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn supports_probabilities(&self) -> bool {
        self.proba_output.is_some()
    }

    fn infer(&self, input: &ScaledVector) -> Result<Inference, InferenceError> {
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input.to_f32_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let label_value = outputs
            .get(&self.label_output)
            .ok_or_else(|| InferenceError::Runtime("No label output".to_string()))?;
        let (_, labels) = label_value
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;
        let label = labels
            .first()
            .copied()
            .ok_or_else(|| InferenceError::Runtime("Empty label output".to_string()))?;

        let probabilities = match &self.proba_output {
            Some(name) => {
                let value = outputs
                    .get(name)
                    .ok_or_else(|| InferenceError::Runtime("No probability output".to_string()))?;
                let (_, data) = value
                    .try_extract_tensor::<f32>()
                    .map_err(|e| InferenceError::Runtime(format!("Extract error: {}", e)))?;
                let proba: Vec<f64> = data.iter().map(|&p| f64::from(p)).collect();
                check_probabilities(&proba)?;
                Some(proba)
            }
            None => None,
        };

        Ok(Inference { label, probabilities })
    }
}
