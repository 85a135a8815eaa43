//! Feature Scaler - fixed per-feature affine transform
//!
//! Parameters come from the scaler fitted at training time. Each column is
//! transformed independently and out-of-range inputs are NOT clamped: a
//! value outside the training range extrapolates along the same formula.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::layout::{validate_names, FEATURE_COUNT};
use crate::logic::features::{FeatureVector, ShapeError};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Scaler parameters as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerParams {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

/// Scaler artifact (`scaler.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    /// Column names seen at fit time, if the exporter recorded them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub params: ScalerParams,
}

/// Scaled model input, one per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaledVector([f64; FEATURE_COUNT]);

impl ScaledVector {
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Single-precision copy for runtimes that take f32 tensors
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.0.iter().map(|&v| v as f32).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalerError {
    #[error("scaler parameters do not match the feature layout: {0}")]
    Shape(#[from] ShapeError),

    #[error("non-finite scaler parameter at column {index}")]
    NonFinite { index: usize },

    #[error("zero scale at column {index}")]
    ZeroScale { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transform {
    Standard,
    MinMax,
}

/// Fitted scaler, immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler {
    transform: Transform,
    offset: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

fn to_array(values: Vec<f64>) -> Result<[f64; FEATURE_COUNT], ShapeError> {
    let actual = values.len();
    values.try_into().map_err(|_| ShapeError::Length {
        expected: FEATURE_COUNT,
        actual,
    })
}

impl FeatureScaler {
    /// Standardization: `(x - mean) / scale`
    pub fn standard(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalerError> {
        Self::build(Transform::Standard, mean, scale)
    }

    /// Min-max: `x * scale + min`
    pub fn min_max(min: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalerError> {
        Self::build(Transform::MinMax, min, scale)
    }

    /// Build from artifact, checking recorded column names against the layout
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self, ScalerError> {
        if let Some(names) = &artifact.feature_names {
            validate_names(names.as_slice())?;
        }

        match artifact.params {
            ScalerParams::Standard { mean, scale } => Self::standard(mean, scale),
            ScalerParams::MinMax { min, scale } => Self::min_max(min, scale),
        }
    }

    fn build(transform: Transform, offset: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalerError> {
        let offset = to_array(offset)?;
        let scale = to_array(scale)?;

        for index in 0..FEATURE_COUNT {
            if !offset[index].is_finite() || !scale[index].is_finite() {
                return Err(ScalerError::NonFinite { index });
            }
            if transform == Transform::Standard && scale[index] == 0.0 {
                return Err(ScalerError::ZeroScale { index });
            }
        }

        Ok(Self { transform, offset, scale })
    }

    pub fn kind(&self) -> &'static str {
        match self.transform {
            Transform::Standard => "standard",
            Transform::MinMax => "min_max",
        }
    }

    // ========================================================================
    // TRANSFORM
    // ========================================================================

    /// Scale an encoded record; a record built against another layout is rejected
    pub fn scale(&self, record: &FeatureVector) -> Result<ScaledVector, ShapeError> {
        record.validate()?;
        self.scale_slice(record.as_slice())
    }

    /// Scale a raw numeric slice in layout order; never pads or truncates
    pub fn scale_slice(&self, values: &[f64]) -> Result<ScaledVector, ShapeError> {
        let array: &[f64; FEATURE_COUNT] = values.try_into().map_err(|_| ShapeError::Length {
            expected: FEATURE_COUNT,
            actual: values.len(),
        })?;
        Ok(self.apply(array))
    }

    fn apply(&self, values: &[f64; FEATURE_COUNT]) -> ScaledVector {
        let mut out = [0.0f64; FEATURE_COUNT];
        for (i, &x) in values.iter().enumerate() {
            out[i] = match self.transform {
                Transform::Standard => (x - self.offset[i]) / self.scale[i],
                Transform::MinMax => x * self.scale[i] + self.offset[i],
            };
        }
        ScaledVector(out)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_LAYOUT;

    fn standard() -> FeatureScaler {
        FeatureScaler::standard(
            vec![2020.0, 80.7, 7.5, 1.5, 1.5, 0.5, 3.0, 12.0, 6.5],
            vec![3.0, 0.5, 1.2, 1.1, 1.1, 0.5, 2.0, 6.0, 3.4],
        )
        .unwrap()
    }

    #[test]
    fn test_standard_formula() {
        let scaler = standard();
        let record = FeatureVector::from_values([2023.0, 80.7, 8.7, 1.5, 0.4, 1.0, 5.0, 0.0, 12.0]);
        let scaled = scaler.scale(&record).unwrap();

        assert_eq!(scaled.as_slice()[0], (2023.0 - 2020.0) / 3.0);
        assert_eq!(scaled.as_slice()[1], 0.0);
        assert_eq!(scaled.as_slice()[7], -2.0);
        assert_eq!(scaled.as_slice().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_min_max_formula() {
        let scaler = FeatureScaler::min_max(vec![-1.0; FEATURE_COUNT], vec![0.5; FEATURE_COUNT]).unwrap();
        let scaled = scaler.scale_slice(&[4.0; FEATURE_COUNT]).unwrap();
        assert!(scaled.as_slice().iter().all(|&v| v == 1.0));
        assert_eq!(scaler.kind(), "min_max");
    }

    #[test]
    fn test_scale_is_deterministic() {
        let scaler = standard();
        let record = FeatureVector::from_values([2031.0, 81.1, 6.1, 2.0, 3.0, 0.0, 1.0, 23.0, 1.0]);
        let a = scaler.scale(&record).unwrap();
        let b = scaler.scale(&record).unwrap();
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_no_clamping() {
        let scaler = FeatureScaler::min_max(vec![0.0; FEATURE_COUNT], vec![0.1; FEATURE_COUNT]).unwrap();
        let scaled = scaler.scale_slice(&[100.0; FEATURE_COUNT]).unwrap();
        // Far outside [0, 1]; extrapolated, not clipped
        assert!(scaled.as_slice().iter().all(|&v| v > 9.9));
    }

    #[test]
    fn test_shape_mismatch() {
        let scaler = standard();
        assert_eq!(
            scaler.scale_slice(&[0.0; 8]),
            Err(ShapeError::Length { expected: 9, actual: 8 })
        );

        let mut record = FeatureVector::from_values([0.0; FEATURE_COUNT]);
        record.layout_hash ^= 1;
        assert!(matches!(scaler.scale(&record), Err(ShapeError::Layout { .. })));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            FeatureScaler::standard(vec![0.0; 9], vec![1.0; 8]),
            Err(ScalerError::Shape(ShapeError::Length { .. }))
        ));

        let mut scale = vec![1.0; 9];
        scale[4] = 0.0;
        assert_eq!(
            FeatureScaler::standard(vec![0.0; 9], scale),
            Err(ScalerError::ZeroScale { index: 4 })
        );

        let mut mean = vec![0.0; 9];
        mean[2] = f64::NAN;
        assert_eq!(
            FeatureScaler::standard(mean, vec![1.0; 9]),
            Err(ScalerError::NonFinite { index: 2 })
        );
    }

    #[test]
    fn test_artifact_parsing() {
        let json = serde_json::json!({
            "kind": "standard",
            "feature_names": FEATURE_LAYOUT,
            "mean": vec![0.0; 9],
            "scale": vec![1.0; 9],
        });
        let artifact: ScalerArtifact = serde_json::from_value(json).unwrap();
        let scaler = FeatureScaler::from_artifact(artifact).unwrap();
        assert_eq!(scaler.kind(), "standard");
    }

    #[test]
    fn test_artifact_with_wrong_column_order() {
        let mut names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        names.swap(7, 8);
        let artifact = ScalerArtifact {
            feature_names: Some(names),
            params: ScalerParams::MinMax { min: vec![0.0; 9], scale: vec![1.0; 9] },
        };
        assert!(matches!(
            FeatureScaler::from_artifact(artifact),
            Err(ScalerError::Shape(ShapeError::Layout { .. }))
        ));
    }
}
