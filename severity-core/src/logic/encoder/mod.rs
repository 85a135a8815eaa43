//! Encoder Module - Categorical label encoding
//!
//! One closed vocabulary per categorical column. Lookups are pure; an
//! unknown value is rejected, never mapped to a fallback code.

pub mod vocabulary;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::AccidentContext;

pub use vocabulary::{Vocabulary, VocabularyError};

// ============================================================================
// CATEGORICAL FEATURES
// ============================================================================

/// Categorical columns of the training data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalFeature {
    #[serde(rename = "Road Type")]
    RoadType,
    Weather,
    Gender,
    Vehicle,
}

impl CategoricalFeature {
    /// Encoding order; also the order in which errors are reported
    pub const ALL: [CategoricalFeature; 4] = [
        CategoricalFeature::RoadType,
        CategoricalFeature::Weather,
        CategoricalFeature::Gender,
        CategoricalFeature::Vehicle,
    ];

    /// Column name used by the training data and the encoder artifact
    pub fn column(self) -> &'static str {
        match self {
            CategoricalFeature::RoadType => "Road Type",
            CategoricalFeature::Weather => "Weather",
            CategoricalFeature::Gender => "Gender",
            CategoricalFeature::Vehicle => "Vehicle",
        }
    }
}

impl fmt::Display for CategoricalFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Value outside the loaded vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category {value:?} for feature '{feature}'")]
pub struct UnknownCategory {
    pub feature: CategoricalFeature,
    pub value: String,
}

/// Encoder table set is incomplete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no vocabulary for feature '{0}'")]
pub struct MissingVocabulary(pub CategoricalFeature);

// ============================================================================
// ENCODER
// ============================================================================

/// Integer codes for the four categorical fields of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCodes {
    pub road_type: u32,
    pub weather: u32,
    pub gender: u32,
    pub vehicle: u32,
}

/// Label encoder over all categorical columns
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEncoder {
    road_type: Vocabulary,
    weather: Vocabulary,
    gender: Vocabulary,
    vehicle: Vocabulary,
}

impl CategoryEncoder {
    pub fn new(road_type: Vocabulary, weather: Vocabulary, gender: Vocabulary, vehicle: Vocabulary) -> Self {
        Self { road_type, weather, gender, vehicle }
    }

    /// Build from column name → vocabulary tables (label encoder artifact)
    ///
    /// Columns that are not categorical model inputs are ignored.
    pub fn from_tables(mut tables: HashMap<String, Vocabulary>) -> Result<Self, MissingVocabulary> {
        let mut take = |feature: CategoricalFeature| {
            tables.remove(feature.column()).ok_or(MissingVocabulary(feature))
        };

        let encoder = Self {
            road_type: take(CategoricalFeature::RoadType)?,
            weather: take(CategoricalFeature::Weather)?,
            gender: take(CategoricalFeature::Gender)?,
            vehicle: take(CategoricalFeature::Vehicle)?,
        };

        for column in tables.keys() {
            log::debug!("Ignoring encoder table for non-input column '{}'", column);
        }

        Ok(encoder)
    }

    pub fn vocabulary(&self, feature: CategoricalFeature) -> &Vocabulary {
        match feature {
            CategoricalFeature::RoadType => &self.road_type,
            CategoricalFeature::Weather => &self.weather,
            CategoricalFeature::Gender => &self.gender,
            CategoricalFeature::Vehicle => &self.vehicle,
        }
    }

    /// Encode a single value
    pub fn encode(&self, feature: CategoricalFeature, value: &str) -> Result<u32, UnknownCategory> {
        self.vocabulary(feature).code(value).ok_or_else(|| UnknownCategory {
            feature,
            value: value.to_string(),
        })
    }

    /// Encode every categorical field of a context, stopping at the first unknown value
    pub fn encode_context(&self, ctx: &AccidentContext) -> Result<CategoryCodes, UnknownCategory> {
        Ok(CategoryCodes {
            road_type: self.encode(CategoricalFeature::RoadType, &ctx.road_type)?,
            weather: self.encode(CategoricalFeature::Weather, &ctx.weather)?,
            gender: self.encode(CategoricalFeature::Gender, &ctx.gender)?,
            vehicle: self.encode(CategoricalFeature::Vehicle, &ctx.vehicle)?,
        })
    }

    /// Column name → classes, in encoding order
    pub fn tables(&self) -> Vec<(&'static str, &[String])> {
        CategoricalFeature::ALL
            .into_iter()
            .map(|f| (f.column(), self.vocabulary(f).classes()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(values: &[&str]) -> Vocabulary {
        Vocabulary::new(values.iter().copied()).unwrap()
    }

    fn encoder() -> CategoryEncoder {
        CategoryEncoder::new(
            vocab(&["Expressway", "Highway", "Minor Road"]),
            vocab(&["Clear", "Rainy"]),
            vocab(&["Female", "Male"]),
            vocab(&["Bus", "Car", "Motorcycle"]),
        )
    }

    #[test]
    fn test_encode_known_values() {
        let encoder = encoder();
        assert_eq!(encoder.encode(CategoricalFeature::RoadType, "Highway"), Ok(1));
        assert_eq!(encoder.encode(CategoricalFeature::Gender, "Male"), Ok(1));
        assert_eq!(encoder.encode(CategoricalFeature::Vehicle, "Motorcycle"), Ok(2));
    }

    #[test]
    fn test_encode_is_stable() {
        let encoder = encoder();
        let first = encoder.encode(CategoricalFeature::Weather, "Rainy");
        for _ in 0..10 {
            assert_eq!(encoder.encode(CategoricalFeature::Weather, "Rainy"), first);
        }
    }

    #[test]
    fn test_unknown_category() {
        let err = encoder()
            .encode(CategoricalFeature::RoadType, "Unpaved Goat Trail")
            .unwrap_err();
        assert_eq!(err.feature, CategoricalFeature::RoadType);
        assert_eq!(err.value, "Unpaved Goat Trail");
        assert!(err.to_string().contains("Road Type"));
    }

    #[test]
    fn test_value_valid_for_other_feature_is_rejected() {
        // "Car" is a vehicle, not a road type
        assert!(encoder().encode(CategoricalFeature::RoadType, "Car").is_err());
    }

    #[test]
    fn test_from_tables() {
        let mut tables = HashMap::new();
        tables.insert("Road Type".to_string(), vocab(&["Highway"]));
        tables.insert("Weather".to_string(), vocab(&["Clear"]));
        tables.insert("Gender".to_string(), vocab(&["Male"]));
        tables.insert("Vehicle".to_string(), vocab(&["Car"]));
        tables.insert("Severity".to_string(), vocab(&["Fatal", "Minor"]));

        let encoder = CategoryEncoder::from_tables(tables.clone()).unwrap();
        assert_eq!(encoder.vocabulary(CategoricalFeature::Vehicle).len(), 1);

        tables.remove("Gender");
        assert_eq!(
            CategoryEncoder::from_tables(tables),
            Err(MissingVocabulary(CategoricalFeature::Gender))
        );
    }

    #[test]
    fn test_feature_column_names() {
        for feature in CategoricalFeature::ALL {
            assert_eq!(feature.to_string(), feature.column());
        }
        assert_eq!(
            serde_json::to_string(&CategoricalFeature::RoadType).unwrap(),
            r#""Road Type""#
        );
    }
}
