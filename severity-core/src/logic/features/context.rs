//! Accident Context - raw input record
//!
//! One record per prediction request, exactly as the user entered it.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;
use crate::constants::YEAR_WINDOW;
use crate::logic::encoder::{CategoricalFeature, CategoryCodes};

/// Valid months
pub const MONTH_RANGE: RangeInclusive<u32> = 1..=12;

/// Valid hours of day
pub const HOUR_RANGE: RangeInclusive<u32> = 0..=23;

/// Years the form accepts, relative to the current year
pub fn allowed_years(current_year: i32) -> RangeInclusive<i32> {
    current_year..=current_year + YEAR_WINDOW
}

/// Accident attributes collected from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentContext {
    pub year: i32,
    pub month: u32,
    pub hour: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub road_type: String,
    pub weather: String,
    pub gender: String,
    pub vehicle: String,
}

impl AccidentContext {
    /// Raw value of one categorical field
    pub fn categorical(&self, feature: CategoricalFeature) -> &str {
        match feature {
            CategoricalFeature::RoadType => &self.road_type,
            CategoricalFeature::Weather => &self.weather,
            CategoricalFeature::Gender => &self.gender,
            CategoricalFeature::Vehicle => &self.vehicle,
        }
    }

    /// Input echo in display order
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Year", self.year.to_string()),
            ("Month", self.month.to_string()),
            ("Hour", self.hour.to_string()),
            ("Latitude", self.latitude.to_string()),
            ("Longitude", self.longitude.to_string()),
            ("Road Type", self.road_type.clone()),
            ("Weather", self.weather.clone()),
            ("Gender", self.gender.clone()),
            ("Vehicle", self.vehicle.clone()),
        ]
    }

    /// Assemble the encoded record in layout order
    pub fn to_feature_vector(&self, codes: &CategoryCodes) -> FeatureVector {
        let values: [f64; FEATURE_COUNT] = [
            f64::from(self.year),
            self.longitude,
            self.latitude,
            f64::from(codes.road_type),
            f64::from(codes.weather),
            f64::from(codes.gender),
            f64::from(codes.vehicle),
            f64::from(self.hour),
            f64::from(self.month),
        ];
        FeatureVector::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> AccidentContext {
        AccidentContext {
            year: 2025,
            month: 6,
            hour: 14,
            latitude: 8.78,
            longitude: 80.62,
            road_type: "Highway".to_string(),
            weather: "Clear".to_string(),
            gender: "Male".to_string(),
            vehicle: "Car".to_string(),
        }
    }

    #[test]
    fn test_record_follows_layout() {
        let codes = CategoryCodes { road_type: 1, weather: 2, gender: 3, vehicle: 4 };
        let record = context().to_feature_vector(&codes);

        assert_eq!(
            record.as_array(),
            &[2025.0, 80.62, 8.78, 1.0, 2.0, 3.0, 4.0, 14.0, 6.0]
        );
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_categorical_lookup() {
        let ctx = context();
        assert_eq!(ctx.categorical(CategoricalFeature::RoadType), "Highway");
        assert_eq!(ctx.categorical(CategoricalFeature::Vehicle), "Car");
    }

    #[test]
    fn test_summary_order() {
        let labels: Vec<_> = context().summary().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            labels,
            ["Year", "Month", "Hour", "Latitude", "Longitude", "Road Type", "Weather", "Gender", "Vehicle"]
        );
    }

    #[test]
    fn test_allowed_years() {
        let years = allowed_years(2026);
        assert!(years.contains(&2026));
        assert!(years.contains(&2036));
        assert!(!years.contains(&2025));
        assert!(!years.contains(&2037));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"year":2025,"month":1,"hour":0,"latitude":6.9,"longitude":79.86,
            "road_type":"Highway","weather":"Rainy","gender":"Female","vehicle":"Bus"}"#;
        let ctx: AccidentContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.month, 1);
        assert_eq!(ctx.hour, 0);
        assert_eq!(ctx.weather, "Rainy");
    }
}
