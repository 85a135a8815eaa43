//! Integration Tests for the prediction pipeline

#[cfg(test)]
mod integration_tests {
    use crate::logic::encoder::{CategoricalFeature, CategoryEncoder, Vocabulary};
    use crate::logic::features::{AccidentContext, ShapeError, FEATURE_COUNT};
    use crate::logic::model::{InferenceError, LinearSvc, LogisticRegression, RandomForest};
    use crate::logic::pipeline::{PipelineError, Severity, SeverityPredictor};
    use crate::logic::scaler::FeatureScaler;

    fn encoder() -> CategoryEncoder {
        CategoryEncoder::new(
            Vocabulary::new(["Expressway", "Highway", "Minor Road", "Urban Road"]).unwrap(),
            Vocabulary::new(["Clear", "Cloudy", "Foggy", "Rainy"]).unwrap(),
            Vocabulary::new(["Female", "Male"]).unwrap(),
            Vocabulary::new(["Bicycle", "Bus", "Car", "Lorry", "Motorcycle"]).unwrap(),
        )
    }

    fn scaler() -> FeatureScaler {
        FeatureScaler::standard(
            vec![2020.0, 80.6, 7.9, 1.5, 1.5, 0.5, 2.0, 12.0, 6.5],
            vec![3.0, 0.3, 0.6, 1.1, 1.1, 0.5, 1.4, 6.9, 3.5],
        )
        .unwrap()
    }

    fn logistic(intercept: f64) -> LogisticRegression {
        LogisticRegression::binary(
            vec![0.05, -0.2, 0.1, 0.3, 0.4, -0.1, 0.2, 0.15, -0.05],
            intercept,
        )
    }

    fn predictor(intercept: f64) -> SeverityPredictor {
        SeverityPredictor::new(encoder(), scaler(), Box::new(logistic(intercept))).unwrap()
    }

    fn highway_context() -> AccidentContext {
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
    fn test_highway_request_end_to_end() {
        let predictor = predictor(0.0);
        let ctx = highway_context();

        let record = predictor.encode(&ctx).unwrap();
        assert_eq!(record.as_slice().len(), FEATURE_COUNT);
        // Year, longitude, latitude, Road Type, Weather, Gender, Vehicle, Hour, Month
        assert_eq!(
            record.as_array(),
            &[2025.0, 80.62, 8.78, 1.0, 0.0, 1.0, 2.0, 14.0, 6.0]
        );

        let result = predictor.predict(&ctx).unwrap();
        assert!(result.label == 0 || result.label == 1);
        let confidence = result.confidence.unwrap();
        assert!((0.0..=100.0).contains(&confidence.percent()));
        assert!(confidence.caption().starts_with("Prediction Confidence: "));
    }

    #[test]
    fn test_unknown_road_type_is_rejected() {
        let mut ctx = highway_context();
        ctx.road_type = "Unpaved Goat Trail".to_string();

        match predictor(0.0).predict(&ctx) {
            Err(PipelineError::UnknownCategory(err)) => {
                assert_eq!(err.feature, CategoricalFeature::RoadType);
                assert_eq!(err.value, "Unpaved Goat Trail");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_first_unknown_field_is_reported() {
        let mut ctx = highway_context();
        ctx.weather = "Sandstorm".to_string();
        ctx.vehicle = "Hovercraft".to_string();

        let err = predictor(0.0).predict(&ctx).unwrap_err();
        assert!(err.to_string().contains("Weather"));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let predictor = predictor(0.3);
        let ctx = highway_context();
        let first = predictor.predict(&ctx).unwrap();
        for _ in 0..20 {
            assert_eq!(predictor.predict(&ctx).unwrap(), first);
        }
    }

    #[test]
    fn test_label_zero_maps_to_high_severity() {
        let result = predictor(-100.0).predict(&highway_context()).unwrap();
        assert_eq!(result.label, 0);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.verdict(), "HIGH SEVERITY ACCIDENT RISK");
        assert_eq!(
            result.advisory(),
            "Warning: High probability of severe accident outcome."
        );
    }

    #[test]
    fn test_label_one_maps_to_low_severity() {
        let result = predictor(100.0).predict(&highway_context()).unwrap();
        assert_eq!(result.label, 1);
        assert_eq!(result.severity, Severity::Low);
        assert_eq!(result.verdict(), "LOW SEVERITY ACCIDENT RISK");
        assert_eq!(result.advisory(), "Safe: Lower probability of severe consequences.");
    }

    #[test]
    fn test_model_without_probabilities_has_no_confidence() {
        let svc = LinearSvc::binary(vec![0.1; FEATURE_COUNT], -50.0);
        let predictor = SeverityPredictor::new(encoder(), scaler(), Box::new(svc)).unwrap();

        let result = predictor.predict(&highway_context()).unwrap();
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.confidence, None);
        assert!(!predictor.model_info().supports_probabilities);
    }

    #[test]
    fn test_boundary_month_and_hour() {
        let predictor = predictor(0.0);
        for (month, hour) in [(1, 0), (12, 23)] {
            let mut ctx = highway_context();
            ctx.month = month;
            ctx.hour = hour;
            let result = predictor.predict(&ctx).unwrap();
            assert!(result.confidence.is_some());
        }
    }

    #[test]
    fn test_out_of_range_numeric_is_not_clamped() {
        let predictor = predictor(0.0);
        let mut far = highway_context();
        far.longitude = 120.0;

        let near = predictor.prepare(&highway_context()).unwrap();
        let scaled = predictor.prepare(&far).unwrap();
        assert!(scaled.as_slice()[1] > near.as_slice()[1]);
        assert!(scaled.as_slice()[1] > 100.0);
    }

    #[test]
    fn test_overflowing_coordinates_are_rejected() {
        let predictor = predictor(0.0);
        let mut ctx = highway_context();
        ctx.latitude = 1.7e308;
        ctx.longitude = -1.7e308;

        match predictor.predict(&ctx) {
            Err(PipelineError::NonFiniteFeature { feature }) => assert_eq!(feature, "longitude"),
            other => panic!("expected NonFiniteFeature, got {:?}", other),
        }
    }

    #[test]
    fn test_model_width_checked_at_construction() {
        let narrow = LogisticRegression::binary(vec![0.1; 4], 0.0);
        let err = SeverityPredictor::new(encoder(), scaler(), Box::new(narrow)).unwrap_err();
        assert_eq!(err, InferenceError::FeatureCount { expected: FEATURE_COUNT, actual: 4 });
    }

    #[test]
    fn test_random_forest_behind_predictor() {
        let forest: RandomForest = serde_json::from_value(serde_json::json!({
            "classes": [0, 1],
            "n_features": FEATURE_COUNT,
            "trees": [{
                "nodes": [
                    { "type": "split", "feature": 7, "threshold": 0.0, "left": 1, "right": 2 },
                    { "type": "leaf", "value": [1.0, 3.0] },
                    { "type": "leaf", "value": [4.0, 1.0] }
                ]
            }]
        }))
        .unwrap();
        let predictor = SeverityPredictor::new(encoder(), scaler(), Box::new(forest)).unwrap();

        // Hour 14 scales above 0 and takes the right branch
        let result = predictor.predict(&highway_context()).unwrap();
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.confidence.unwrap().progress(), 80);
    }

    #[test]
    fn test_shape_error_maps_to_feature_shape_mismatch() {
        let err = scaler().scale_slice(&[0.0; 8]).unwrap_err();
        assert_eq!(err, ShapeError::Length { expected: FEATURE_COUNT, actual: 8 });
        let err = PipelineError::from(err);
        assert!(matches!(err, PipelineError::FeatureShapeMismatch(_)));
        assert!(err.to_string().starts_with("feature shape mismatch"));
    }
}
