//! Categorical label encoder.
//!
//! Maps string classes to dense indices in sorted order, so the same set of
//! classes always encodes the same way regardless of input order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("index {0} is out of range for {1} classes")]
    IndexOutOfRange(usize, usize),

    #[error("failed to read or write encoder file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed encoder file: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the sorted, de-duplicated class set from `values`.
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // ---
        let mut classes: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn transform(&self, value: &str) -> Result<usize, EncoderError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map_err(|_| EncoderError::UnknownClass(value.to_string()))
    }

    pub fn inverse_transform(&self, index: usize) -> Result<&str, EncoderError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(EncoderError::IndexOutOfRange(index, self.classes.len()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EncoderError> {
        // ---
        let raw = fs::read_to_string(path)?;
        let mut encoder: Self = serde_json::from_str(&raw)?;

        // Hand-edited files may not be sorted; transform relies on it
        encoder.classes.sort();
        encoder.classes.dedup();
        Ok(encoder)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EncoderError> {
        // ---
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}
