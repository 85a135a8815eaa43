//! Data models

pub mod catalog;
pub mod prediction;

pub use catalog::*;
pub use prediction::*;
