//! Artifact manifest and SHA-256 verification

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ArtifactError;

/// `manifest.json`: expected digests of the trained artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoders: Option<String>,
    /// Class labels for models that do not carry them (ONNX)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<i64>>,
}

impl ArtifactManifest {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        super::read_json(path)
    }

    /// Check every listed digest against its file
    pub fn verify(&self, model: &Path, scaler: &Path, encoders: &Path) -> Result<(), ArtifactError> {
        for (expected, path) in [
            (&self.model, model),
            (&self.scaler, scaler),
            (&self.encoders, encoders),
        ] {
            if let Some(expected) = expected {
                verify_file(path, expected)?;
            }
        }
        Ok(())
    }
}

/// Lowercase hex SHA-256 of a file
pub fn compute_file_hash(path: &Path) -> Result<String, ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(io_err)?;
    Ok(hex::encode(hasher.finalize()))
}

fn verify_file(path: &Path, expected: &str) -> Result<(), ArtifactError> {
    let actual = compute_file_hash(path)?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ArtifactError::Checksum {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    log::debug!("Checksum OK: {}", path.display());
    Ok(())
}
