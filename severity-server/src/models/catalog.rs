//! Vocabulary and model description models

use serde::Serialize;

use severity_core::logic::features::LayoutInfo;
use severity_core::logic::model::ModelInfo;
use severity_core::SeverityPredictor;

use super::prediction::NumericDomains;

/// Allowed values of one categorical field
#[derive(Debug, Serialize)]
pub struct VocabularyEntry {
    pub feature: &'static str,
    pub classes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub categorical: Vec<VocabularyEntry>,
    pub numeric: NumericDomains,
}

impl VocabularyResponse {
    pub fn new(predictor: &SeverityPredictor, current_year: i32) -> Self {
        let categorical = predictor
            .encoder()
            .tables()
            .into_iter()
            .map(|(feature, classes)| VocabularyEntry {
                feature,
                classes: classes.to_vec(),
            })
            .collect();

        Self {
            categorical,
            numeric: NumericDomains::for_year(current_year),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model: ModelInfo,
    pub scaler: &'static str,
    pub layout: LayoutInfo,
}

impl ModelResponse {
    pub fn new(predictor: &SeverityPredictor) -> Self {
        Self {
            model: predictor.model_info(),
            scaler: predictor.scaler().kind(),
            layout: LayoutInfo::current(),
        }
    }
}
