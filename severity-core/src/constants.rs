//! Central Configuration Constants
//!
//! Single source of truth for artifact locations and form defaults.
//! To change where artifacts are read from, only edit this file (or set env).

use std::path::PathBuf;

/// Default directory holding the trained artifacts
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// Artifact file names inside the artifact directory
pub const MODEL_FILE: &str = "model.json";
pub const ONNX_MODEL_FILE: &str = "model.onnx";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Form defaults (Sri Lanka, central province)
pub const DEFAULT_LONGITUDE: f64 = 80.62;
pub const DEFAULT_LATITUDE: f64 = 8.78;

/// How many years ahead the form accepts
pub const YEAR_WINDOW: i32 = 10;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Road Accident Severity Prediction";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get artifact directory from environment or use default
pub fn get_artifact_dir() -> PathBuf {
    std::env::var("SEVERITY_ARTIFACT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACT_DIR))
}

/// Explicit model path override
pub fn get_model_path() -> Option<PathBuf> {
    std::env::var("SEVERITY_MODEL_PATH").ok().map(PathBuf::from)
}

/// Explicit scaler path override
pub fn get_scaler_path() -> Option<PathBuf> {
    std::env::var("SEVERITY_SCALER_PATH").ok().map(PathBuf::from)
}

/// Explicit label encoders path override
pub fn get_encoders_path() -> Option<PathBuf> {
    std::env::var("SEVERITY_ENCODERS_PATH").ok().map(PathBuf::from)
}

/// Whether manifest checksums are enforced when a manifest exists
pub fn is_checksum_enabled() -> bool {
    std::env::var("SEVERITY_VERIFY_CHECKSUMS")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}
