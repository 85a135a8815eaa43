//! Model Module - Inference engines
//!
//! The pipeline only sees the `InferenceEngine` trait; the artifact format
//! decides which implementation sits behind it.

pub mod inference;
pub mod linear;
pub mod forest;
#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use inference::{Inference, InferenceEngine, InferenceError, ModelArtifact, ModelInfo};
pub use linear::{LinearSvc, LogisticRegression};
pub use forest::{DecisionTree, RandomForest, TreeNode};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
