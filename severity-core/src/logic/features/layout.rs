//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the column order the scaler and model were
//! fitted on.** A record assembled in any other order is scored silently
//! wrong, so every vector carries the layout version and hash.
//!
//! ## Rules (NEVER break these):
//! 1. Add column → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove column → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Training column names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "Year",       // 0: Calendar year
    "longitude",  // 1: Longitude (degrees)
    "latitude",   // 2: Latitude (degrees)
    "Road Type",  // 3: Encoded road type
    "Weather",    // 4: Encoded weather
    "Gender",     // 5: Encoded driver gender
    "Vehicle",    // 6: Encoded vehicle type
    "Hour",       // 7: Hour of day (0-23)
    "Month",      // 8: Month (1-12)
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 9;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 hash of the compiled-in layout
pub fn layout_hash() -> u32 {
    hash_names(FEATURE_VERSION, FEATURE_LAYOUT.iter().copied())
}

/// Hash an arbitrary ordered list of column names (e.g. from a scaler artifact)
pub fn hash_names<'a>(version: u8, names: impl IntoIterator<Item = &'a str>) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Shape or order mismatch between a numeric record and the layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected {expected} features, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error(
        "feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
         got v{actual_version} (hash: {actual_hash:08x})"
    )]
    Layout {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), ShapeError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(ShapeError::Layout {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// Validate an explicit column list against the layout (length first, then order)
pub fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<(), ShapeError> {
    if names.len() != FEATURE_COUNT {
        return Err(ShapeError::Length {
            expected: FEATURE_COUNT,
            actual: names.len(),
        });
    }
    validate_layout(
        FEATURE_VERSION,
        hash_names(FEATURE_VERSION, names.iter().map(|n| n.as_ref())),
    )
}

// ============================================================================
// FEATURE NAME LOOKUP
// ============================================================================

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
