//! Logic Module - Prediction pipeline
//!
//! - `features/` - Input record, feature layout, encoded feature vector
//! - `encoder/` - Categorical vocabularies (label encoding)
//! - `scaler` - Affine feature scaling
//! - `model/` - Inference engines (linear, forest, ONNX)
//! - `artifacts/` - Startup artifact loading and checksum verification
//! - `pipeline/` - Request assembler and verdict interpretation

pub mod features;
pub mod encoder;
pub mod scaler;
pub mod model;
pub mod artifacts;
pub mod pipeline;
