//! Features Module - Input record and feature layout
//!
//! Separates the raw user input from the numeric record the model sees.
//! The layout is the single source of truth for column order.

pub mod layout;
pub mod context;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LayoutInfo, ShapeError};
pub use context::{AccidentContext, allowed_years, HOUR_RANGE, MONTH_RANGE};
pub use vector::FeatureVector;
