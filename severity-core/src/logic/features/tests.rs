//! Integration Tests for record assembly
//!
//! Encoder + context + scaler working together on boundary inputs.

#[cfg(test)]
mod integration_tests {
    use crate::logic::encoder::{CategoryEncoder, Vocabulary};
    use crate::logic::features::{AccidentContext, FEATURE_COUNT};
    use crate::logic::scaler::FeatureScaler;

    fn encoder() -> CategoryEncoder {
        CategoryEncoder::new(
            Vocabulary::new(["Highway", "Urban Road"]).unwrap(),
            Vocabulary::new(["Clear", "Rainy"]).unwrap(),
            Vocabulary::new(["Female", "Male"]).unwrap(),
            Vocabulary::new(["Bus", "Car"]).unwrap(),
        )
    }

    fn context(month: u32, hour: u32) -> AccidentContext {
        AccidentContext {
            year: 2027,
            month,
            hour,
            latitude: 7.29,
            longitude: 80.63,
            road_type: "Urban Road".to_string(),
            weather: "Rainy".to_string(),
            gender: "Female".to_string(),
            vehicle: "Bus".to_string(),
        }
    }

    /// Month/hour edges go through the same affine path as interior values
    #[test]
    fn test_boundaries_processed_like_interior() {
        let encoder = encoder();
        let scaler = FeatureScaler::standard(vec![0.0; FEATURE_COUNT], vec![2.0; FEATURE_COUNT]).unwrap();

        for (month, hour) in [(1, 0), (12, 23), (6, 12)] {
            let codes = encoder.encode_context(&context(month, hour)).unwrap();
            let record = context(month, hour).to_feature_vector(&codes);
            let scaled = scaler.scale(&record).unwrap();

            assert_eq!(scaled.as_slice()[7], hour as f64 / 2.0);
            assert_eq!(scaled.as_slice()[8], month as f64 / 2.0);
        }
    }

    #[test]
    fn test_encoded_codes_land_in_categorical_slots() {
        let encoder = encoder();
        let ctx = context(3, 9);
        let codes = encoder.encode_context(&ctx).unwrap();
        let record = ctx.to_feature_vector(&codes);

        assert_eq!(record.values[3], 1.0); // Urban Road
        assert_eq!(record.values[4], 1.0); // Rainy
        assert_eq!(record.values[5], 0.0); // Female
        assert_eq!(record.values[6], 0.0); // Bus
    }
}
