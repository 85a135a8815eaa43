//! Prediction request/response models

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use severity_core::logic::features::{allowed_years, HOUR_RANGE, MONTH_RANGE};
use severity_core::{AccidentContext, Confidence, PredictionResult, Severity};

fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

/// Year the form domain is anchored to
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Accident context as submitted by a client
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PredictRequest {
    pub year: i32,

    #[validate(range(min = 1, max = 12))]
    pub month: u32,

    #[validate(range(min = 0, max = 23))]
    pub hour: u32,

    #[validate(custom(function = "finite"), range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(custom(function = "finite"), range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    #[validate(length(min = 1))]
    pub road_type: String,

    #[validate(length(min = 1))]
    pub weather: String,

    #[validate(length(min = 1))]
    pub gender: String,

    #[validate(length(min = 1))]
    pub vehicle: String,
}

impl PredictRequest {
    /// Field domains plus the year window relative to `current_year`
    pub fn check(&self, current_year: i32) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;

        let years = allowed_years(current_year);
        if !years.contains(&self.year) {
            return Err(format!(
                "year: {} is outside {}..={}",
                self.year,
                years.start(),
                years.end()
            ));
        }
        Ok(())
    }

    pub fn into_context(self) -> AccidentContext {
        AccidentContext {
            year: self.year,
            month: self.month,
            hour: self.hour,
            latitude: self.latitude,
            longitude: self.longitude,
            road_type: self.road_type,
            weather: self.weather,
            gender: self.gender,
            vehicle: self.vehicle,
        }
    }
}

/// One row of the input echo
#[derive(Debug, Clone, Serialize)]
pub struct SummaryField {
    pub field: &'static str,
    pub value: String,
}

pub fn summarize(ctx: &AccidentContext) -> Vec<SummaryField> {
    ctx.summary()
        .into_iter()
        .map(|(field, value)| SummaryField { field, value })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub request_id: Uuid,
    pub input: Vec<SummaryField>,
    pub label: i64,
    pub severity: Severity,
    pub verdict: &'static str,
    pub advisory: &'static str,
    pub confidence: Option<Confidence>,
}

impl PredictResponse {
    pub fn new(request_id: Uuid, ctx: &AccidentContext, result: PredictionResult) -> Self {
        Self {
            request_id,
            input: summarize(ctx),
            label: result.label,
            severity: result.severity,
            verdict: result.verdict(),
            advisory: result.advisory(),
            confidence: result.confidence,
        }
    }
}

/// Numeric input domains, as enforced by `PredictRequest::check`
#[derive(Debug, Serialize)]
pub struct NumericDomains {
    pub year: [i32; 2],
    pub month: [u32; 2],
    pub hour: [u32; 2],
}

impl NumericDomains {
    pub fn for_year(current_year: i32) -> Self {
        let years = allowed_years(current_year);
        Self {
            year: [*years.start(), *years.end()],
            month: [*MONTH_RANGE.start(), *MONTH_RANGE.end()],
            hour: [*HOUR_RANGE.start(), *HOUR_RANGE.end()],
        }
    }
}
