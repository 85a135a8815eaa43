//! HTML rendering for the prediction form

use std::fmt::Write;

use serde::Deserialize;

use severity_core::constants::{APP_NAME, DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
use severity_core::{CategoricalFeature, PredictionResult, Severity, SeverityPredictor};

use crate::models::{NumericDomains, SummaryField};

/// Raw form fields, kept as text so a rejected submission re-renders as typed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormValues {
    pub year: String,
    pub month: String,
    pub hour: String,
    pub latitude: String,
    pub longitude: String,
    pub road_type: String,
    pub weather: String,
    pub gender: String,
    pub vehicle: String,
}

impl FormValues {
    /// Initial values: current date/hour, default location, first vocabulary entries
    pub fn defaults(predictor: &SeverityPredictor, year: i32, month: u32, hour: u32) -> Self {
        let first = |feature: CategoricalFeature| {
            predictor.encoder().vocabulary(feature).first().to_string()
        };

        Self {
            year: year.to_string(),
            month: month.to_string(),
            hour: hour.to_string(),
            latitude: DEFAULT_LATITUDE.to_string(),
            longitude: DEFAULT_LONGITUDE.to_string(),
            road_type: first(CategoricalFeature::RoadType),
            weather: first(CategoricalFeature::Weather),
            gender: first(CategoricalFeature::Gender),
            vehicle: first(CategoricalFeature::Vehicle),
        }
    }

    fn categorical(&self, feature: CategoricalFeature) -> &str {
        match feature {
            CategoricalFeature::RoadType => &self.road_type,
            CategoricalFeature::Weather => &self.weather,
            CategoricalFeature::Gender => &self.gender,
            CategoricalFeature::Vehicle => &self.vehicle,
        }
    }
}

/// What to show under the form
pub enum Outcome {
    Empty,
    Verdict {
        summary: Vec<SummaryField>,
        result: PredictionResult,
    },
    Rejected(String),
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn number_input(html: &mut String, name: &str, label: &str, value: &str, attrs: &str) {
    let _ = write!(
        html,
        r#"<label>{label}<input type="number" name="{name}" value="{value}" {attrs} required></label>"#,
        label = label,
        name = name,
        value = escape(value),
        attrs = attrs,
    );
}

fn select(html: &mut String, name: &str, feature: CategoricalFeature, predictor: &SeverityPredictor, selected: &str) {
    let _ = write!(html, r#"<label>{}<select name="{}">"#, escape(feature.column()), name);
    for class in predictor.encoder().vocabulary(feature).classes() {
        let mark = if class == selected { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{v}"{mark}>{v}</option>"#,
            v = escape(class),
            mark = mark
        );
    }
    html.push_str("</select></label>");
}

fn render_outcome(html: &mut String, outcome: &Outcome) {
    match outcome {
        Outcome::Empty => {}
        Outcome::Rejected(message) => {
            let _ = write!(html, r#"<div class="error">{}</div>"#, escape(message));
        }
        Outcome::Verdict { summary, result } => {
            html.push_str("<h2>Input Summary</h2><table>");
            for row in summary {
                let _ = write!(
                    html,
                    "<tr><th>{}</th><td>{}</td></tr>",
                    escape(row.field),
                    escape(&row.value)
                );
            }
            html.push_str("</table>");

            let class = match result.severity {
                Severity::High => "high",
                Severity::Low => "low",
            };
            let _ = write!(
                html,
                r#"<div class="verdict {}"><h2>{}</h2><p>{}</p></div>"#,
                class,
                result.verdict(),
                result.advisory()
            );

            if let Some(confidence) = result.confidence {
                let _ = write!(
                    html,
                    r#"<progress value="{}" max="100"></progress><p class="caption">{}</p>"#,
                    confidence.progress(),
                    confidence.caption()
                );
            }
        }
    }
}

/// Full page: form plus the outcome of the last submission
pub fn page(predictor: &SeverityPredictor, values: &FormValues, domains: &NumericDomains, outcome: &Outcome) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 720px; margin: 2em auto; }}
label {{ display: block; margin: .4em 0; }}
input, select {{ margin-left: .5em; }}
.error {{ background: #fde2e2; color: #8a1f1f; padding: .6em; }}
.verdict.high {{ background: #fde2e2; padding: .6em; }}
.verdict.low {{ background: #e2f5e4; padding: .6em; }}
progress {{ width: 100%; }}
</style></head><body><h1>{title}</h1><form method="post" action="/">"#,
        title = APP_NAME
    );

    number_input(
        &mut html,
        "year",
        "Year",
        &values.year,
        &format!(r#"min="{}" max="{}""#, domains.year[0], domains.year[1]),
    );
    number_input(
        &mut html,
        "month",
        "Month",
        &values.month,
        &format!(r#"min="{}" max="{}""#, domains.month[0], domains.month[1]),
    );
    number_input(
        &mut html,
        "hour",
        "Hour",
        &values.hour,
        &format!(r#"min="{}" max="{}""#, domains.hour[0], domains.hour[1]),
    );
    number_input(&mut html, "longitude", "Longitude", &values.longitude, r#"step="any""#);
    number_input(&mut html, "latitude", "Latitude", &values.latitude, r#"step="any""#);

    for (name, feature) in [
        ("road_type", CategoricalFeature::RoadType),
        ("weather", CategoricalFeature::Weather),
        ("gender", CategoricalFeature::Gender),
        ("vehicle", CategoricalFeature::Vehicle),
    ] {
        select(&mut html, name, feature, predictor, values.categorical(feature));
    }

    html.push_str(r#"<button type="submit">Predict Severity</button></form>"#);
    render_outcome(&mut html, outcome);
    html.push_str("</body></html>");
    html
}
