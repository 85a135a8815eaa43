//! Road Accident Severity - Prediction Core
//!
//! Turns an accident context (time, location, road/weather/driver/vehicle
//! categories) into a binary severity verdict using pre-trained artifacts.
//!
//! ```text
//! AccidentContext ──► CategoryEncoder ──► FeatureVector ──► FeatureScaler
//!                                                               │
//!   PredictionResult ◄── Severity/Confidence ◄── InferenceEngine ◄┘
//! ```
//!
//! All artifacts are loaded once by [`logic::artifacts`] and shared read-only.

pub mod constants;
pub mod logic;

pub use logic::artifacts::{ArtifactError, ArtifactPaths};
pub use logic::encoder::{CategoricalFeature, CategoryEncoder, Vocabulary};
pub use logic::features::{AccidentContext, FeatureVector, ShapeError, FEATURE_COUNT, FEATURE_LAYOUT};
pub use logic::model::{Inference, InferenceEngine, InferenceError};
pub use logic::pipeline::{Confidence, PipelineError, PredictionResult, Severity, SeverityPredictor};
pub use logic::scaler::{FeatureScaler, ScaledVector};
