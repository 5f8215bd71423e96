//! Request and response models for the prediction flow.
//!
//! Raw form input is parsed into a [`PredictionRequest`] before it can reach
//! the gateway, so a request that exists is always a real calendar date and a
//! location the model was trained on.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Advisory;

// ---

/// Reasons user input is rejected before prediction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("'{0}' is not a supported location")]
    UnknownLocation(String),
}

/// Raw fields posted by the prediction form or the JSON API.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionForm {
    pub date: String,
    pub location: String,
}

/// A validated prediction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    year: i32,
    month: u32,
    day: u32,
    location: String,
}

impl PredictionRequest {
    /// Parse a `YYYY-MM-DD` date and a location name checked against
    /// `known_locations`.
    pub fn parse(
        date: &str,
        location: &str,
        known_locations: &[String],
    ) -> Result<Self, InputError> {
        // ---
        let date_str = date.trim();
        let parsed = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| InputError::InvalidDate(date_str.to_string()))?;

        if !known_locations.iter().any(|l| l == location) {
            return Err(InputError::UnknownLocation(location.to_string()));
        }

        Ok(Self {
            year: parsed.year(),
            month: parsed.month(),
            day: parsed.day(),
            location: location.to_string(),
        })
    }

    pub fn from_form(form: &PredictionForm, known_locations: &[String]) -> Result<Self, InputError> {
        Self::parse(&form.date, &form.location, known_locations)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Everything the result page (or `/api/predict`) shows for one prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    // ---
    pub prediction: String,
    pub recommendation: Vec<String>,
    pub emergency_number: String,
    pub severity: String,
    pub precaution: String,
    pub locations: Vec<String>,
}

impl PredictionView {
    pub fn new(prediction: String, advisory: &Advisory, locations: &[String]) -> Self {
        // ---
        Self {
            prediction,
            recommendation: advisory
                .recommendations
                .iter()
                .map(|r| r.to_string())
                .collect(),
            emergency_number: advisory.emergency_number.to_string(),
            severity: advisory.severity.to_string(),
            precaution: advisory.precaution.to_string(),
            locations: locations.to_vec(),
        }
    }
}
