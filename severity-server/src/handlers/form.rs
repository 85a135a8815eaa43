//! HTML form handlers

use std::str::FromStr;

use axum::{extract::State, http::StatusCode, response::Html, Form};
use chrono::{Datelike, Local, Timelike};
use uuid::Uuid;

use crate::models::{summarize, NumericDomains, PredictRequest};
use crate::render::{self, FormValues, Outcome};
use crate::{AppError, AppState};

fn parse_field<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{}: {:?} is not a valid number", name, raw)))
}

/// Typed request from raw form text
pub fn parse_form(values: &FormValues) -> Result<PredictRequest, AppError> {
    Ok(PredictRequest {
        year: parse_field("year", &values.year)?,
        month: parse_field("month", &values.month)?,
        hour: parse_field("hour", &values.hour)?,
        latitude: parse_field("latitude", &values.latitude)?,
        longitude: parse_field("longitude", &values.longitude)?,
        road_type: values.road_type.clone(),
        weather: values.weather.clone(),
        gender: values.gender.clone(),
        vehicle: values.vehicle.clone(),
    })
}

/// Empty form with today's defaults
pub async fn show(State(state): State<AppState>) -> Html<String> {
    let now = Local::now();
    let values = FormValues::defaults(&state.predictor, now.year(), now.month(), now.hour());
    let domains = NumericDomains::for_year(now.year());

    Html(render::page(&state.predictor, &values, &domains, &Outcome::Empty))
}

/// Submission: re-render with the verdict or the rejection reason
pub async fn submit(
    State(state): State<AppState>,
    Form(values): Form<FormValues>,
) -> (StatusCode, Html<String>) {
    let request_id = Uuid::new_v4();
    let year = Local::now().year();

    let outcome = parse_form(&values)
        .and_then(|req| {
            req.check(year).map_err(AppError::Validation)?;
            let ctx = req.into_context();
            let result = state.predictor.predict(&ctx)?;
            Ok((ctx, result))
        });

    let (status, outcome) = match outcome {
        Ok((ctx, result)) => {
            tracing::info!(%request_id, severity = %result.severity, "Form prediction served");
            (
                StatusCode::OK,
                Outcome::Verdict {
                    summary: summarize(&ctx),
                    result,
                },
            )
        }
        Err(e) => {
            match &e {
                AppError::Internal(msg) => tracing::error!(%request_id, "Form prediction failed: {}", msg),
                other => tracing::warn!(%request_id, "Form submission rejected: {}", other),
            }
            (e.status(), Outcome::Rejected(e.public_message()))
        }
    };

    let domains = NumericDomains::for_year(year);
    (status, Html(render::page(&state.predictor, &values, &domains, &outcome)))
}
