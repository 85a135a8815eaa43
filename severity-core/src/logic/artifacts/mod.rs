//! Artifacts Module - one-time loading of the trained artifacts
//!
//! Loads label encoders, scaler and classifier from disk, verifies the
//! optional manifest, and hands back a ready `SeverityPredictor`. Every
//! failure here is fatal at startup; nothing is reloaded afterwards.

pub mod manifest;


use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::constants;
use crate::logic::encoder::{CategoryEncoder, Vocabulary};
use crate::logic::model::{InferenceEngine, ModelArtifact};
use crate::logic::pipeline::SeverityPredictor;
use crate::logic::scaler::{FeatureScaler, ScalerArtifact};

pub use manifest::{compute_file_hash, ArtifactManifest};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact} artifact: {reason}")]
    Invalid { artifact: &'static str, reason: String },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    Checksum {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl ArtifactError {
    fn invalid(artifact: &'static str, reason: impl ToString) -> Self {
        ArtifactError::Invalid {
            artifact,
            reason: reason.to_string(),
        }
    }
}

// ============================================================================
// PATHS
// ============================================================================

/// Where each artifact lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub encoders: PathBuf,
    pub manifest: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Standard file names inside one directory
    ///
    /// Prefers `model.json`; falls back to `model.onnx` when only that exists.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let json_model = dir.join(constants::MODEL_FILE);
        let onnx_model = dir.join(constants::ONNX_MODEL_FILE);
        let model = if !json_model.exists() && onnx_model.exists() {
            onnx_model
        } else {
            json_model
        };

        let manifest = dir.join(constants::MANIFEST_FILE);

        Self {
            model,
            scaler: dir.join(constants::SCALER_FILE),
            encoders: dir.join(constants::ENCODERS_FILE),
            manifest: manifest.exists().then_some(manifest),
        }
    }

    /// Directory from env, with per-file env overrides
    pub fn from_env() -> Self {
        let mut paths = Self::in_dir(constants::get_artifact_dir());
        if let Some(model) = constants::get_model_path() {
            paths.model = model;
        }
        if let Some(scaler) = constants::get_scaler_path() {
            paths.scaler = scaler;
        }
        if let Some(encoders) = constants::get_encoders_path() {
            paths.encoders = encoders;
        }
        if !constants::is_checksum_enabled() {
            paths.manifest = None;
        }
        paths
    }

    fn is_onnx(&self) -> bool {
        self.model
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("onnx"))
    }
}

// ============================================================================
// LOADING
// ============================================================================

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `label_encoders.json`: column name → classes in code order
pub fn load_encoder(path: &Path) -> Result<CategoryEncoder, ArtifactError> {
    let tables: HashMap<String, Vocabulary> = read_json(path)?;
    CategoryEncoder::from_tables(tables).map_err(|e| ArtifactError::invalid("encoder", e))
}

pub fn load_scaler(path: &Path) -> Result<FeatureScaler, ArtifactError> {
    let artifact: ScalerArtifact = read_json(path)?;
    FeatureScaler::from_artifact(artifact).map_err(|e| ArtifactError::invalid("scaler", e))
}

/// JSON model artifact
pub fn load_model(path: &Path) -> Result<Box<dyn InferenceEngine>, ArtifactError> {
    let artifact: ModelArtifact = read_json(path)?;
    artifact
        .into_engine()
        .map_err(|e| ArtifactError::invalid("model", e))
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path, classes: Vec<i64>) -> Result<Box<dyn InferenceEngine>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    let model = crate::logic::model::OnnxClassifier::load(path, classes)
        .map_err(|e| ArtifactError::invalid("model", e))?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path, _classes: Vec<i64>) -> Result<Box<dyn InferenceEngine>, ArtifactError> {
    Err(ArtifactError::invalid(
        "model",
        format!("{} needs the `onnx` feature", path.display()),
    ))
}

impl SeverityPredictor {
    /// Load, verify and assemble all artifacts
    pub fn from_artifacts(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        log::info!(
            "Loading artifacts: model={} scaler={} encoders={}",
            paths.model.display(),
            paths.scaler.display(),
            paths.encoders.display()
        );

        let manifest = match &paths.manifest {
            Some(path) => {
                let manifest = ArtifactManifest::load(path)?;
                manifest.verify(&paths.model, &paths.scaler, &paths.encoders)?;
                log::info!("Artifact checksums verified against {}", path.display());
                manifest
            }
            None => ArtifactManifest::default(),
        };

        let encoder = load_encoder(&paths.encoders)?;
        let scaler = load_scaler(&paths.scaler)?;
        let model = if paths.is_onnx() {
            load_onnx(&paths.model, manifest.classes.unwrap_or_else(|| vec![0, 1]))?
        } else {
            load_model(&paths.model)?
        };

        let predictor =
            SeverityPredictor::new(encoder, scaler, model).map_err(|e| ArtifactError::invalid("model", e))?;

        let info = predictor.model_info();
        log::info!(
            "Predictor ready: model={} classes={:?} probabilities={} scaler={}",
            info.name,
            info.classes,
            info.supports_probabilities,
            predictor.scaler().kind()
        );

        Ok(predictor)
    }

    /// Load from the configured directory and env overrides
    pub fn from_env() -> Result<Self, ArtifactError> {
        Self::from_artifacts(&ArtifactPaths::from_env())
    }
}
