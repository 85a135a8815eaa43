//! Verdict interpretation
//!
//! Label 0 is the high-severity class of the training data. Every other
//! label reads as low severity. Do not re-derive this from class order.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Label the model uses for high-severity outcomes
pub const HIGH_SEVERITY_LABEL: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Low,
}

impl Severity {
    pub fn from_label(label: i64) -> Self {
        if label == HIGH_SEVERITY_LABEL {
            Severity::High
        } else {
            Severity::Low
        }
    }

    /// Headline shown to the user
    pub fn verdict(self) -> &'static str {
        match self {
            Severity::High => "HIGH SEVERITY ACCIDENT RISK",
            Severity::Low => "LOW SEVERITY ACCIDENT RISK",
        }
    }

    /// Advisory line under the headline
    pub fn advisory(self) -> &'static str {
        match self {
            Severity::High => "Warning: High probability of severe accident outcome.",
            Severity::Low => "Safe: Lower probability of severe consequences.",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => f.write_str("HIGH SEVERITY"),
            Severity::Low => f.write_str("LOW SEVERITY"),
        }
    }
}

/// Probability of the predicted class, as a percentage in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence(f64);

impl Confidence {
    /// `max(probabilities) * 100`; `None` for an empty distribution
    pub fn from_probabilities(probabilities: &[f64]) -> Option<Self> {
        let max = probabilities.iter().copied().reduce(f64::max)?;
        Some(Self((max * 100.0).clamp(0.0, 100.0)))
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    /// Integer value for a progress bar (truncated, not rounded)
    pub fn progress(self) -> u8 {
        self.0 as u8
    }

    /// Caption text with two decimals
    pub fn caption(self) -> String {
        format!("Prediction Confidence: {:.2}%", self.0)
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Confidence", 3)?;
        state.serialize_field("percent", &self.percent())?;
        state.serialize_field("progress", &self.progress())?;
        state.serialize_field("caption", &self.caption())?;
        state.end()
    }
}

/// Outcome of one prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: i64,
    pub severity: Severity,
    pub confidence: Option<Confidence>,
}

impl PredictionResult {
    pub fn new(label: i64, probabilities: Option<&[f64]>) -> Self {
        Self {
            label,
            severity: Severity::from_label(label),
            confidence: probabilities.and_then(Confidence::from_probabilities),
        }
    }

    pub fn verdict(&self) -> &'static str {
        self.severity.verdict()
    }

    pub fn advisory(&self) -> &'static str {
        self.severity.advisory()
    }
}
