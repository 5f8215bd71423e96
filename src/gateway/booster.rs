//! Gradient-boosted event classifier built on the `gbdt` crate.
//!
//! `gbdt` trains binary and regression boosters, so multi-class prediction is
//! done one-vs-rest: one LogLikelyhood booster per event class, and the
//! predicted class is the one whose booster scores highest.

use std::fs;
use std::path::Path;

use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{EventPredictor, GatewayError, LabelEncoder};
use crate::models::PredictionRequest;

/// Number of features per row: year, month, day, encoded location.
pub const FEATURE_SIZE: usize = 4;

// ---

/// Boosting hyper-parameters applied to every per-class booster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoosterParams {
    pub iterations: usize,
    pub max_depth: u32,
    pub shrinkage: f32,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            iterations: 400,
            max_depth: 8,
            shrinkage: 0.05,
        }
    }
}

impl BoosterParams {
    fn to_gbdt_config(self) -> GbdtConfig {
        // ---
        let mut cfg = GbdtConfig::new();
        cfg.set_feature_size(FEATURE_SIZE);
        cfg.set_max_depth(self.max_depth);
        cfg.set_iterations(self.iterations);
        cfg.set_shrinkage(self.shrinkage);
        cfg.set_loss("LogLikelyhood");
        cfg.set_debug(false);
        cfg
    }
}

/// One binary booster per class, indexed by encoded class id.
#[derive(Serialize, Deserialize)]
pub struct OneVsRestBooster {
    boosters: Vec<GBDT>,
}

impl OneVsRestBooster {
    /// Fit `n_classes` boosters on `rows` (each `FEATURE_SIZE` wide) with
    /// encoded class ids `labels`.
    pub fn fit(rows: &[Vec<ValueType>], labels: &[usize], n_classes: usize, params: BoosterParams) -> Self {
        // ---
        let cfg = params.to_gbdt_config();
        let mut boosters = Vec::with_capacity(n_classes);

        for class in 0..n_classes {
            let mut data: DataVec = rows
                .iter()
                .zip(labels)
                .map(|(row, &label)| {
                    let target = if label == class { 1.0 } else { -1.0 };
                    Data::new_training_data(row.clone(), 1.0, target, None)
                })
                .collect();

            let mut booster = GBDT::new(&cfg);
            booster.fit(&mut data);
            debug!(class, "fitted booster");
            boosters.push(booster);
        }

        info!(n_classes, rows = rows.len(), "one-vs-rest training complete");
        Self { boosters }
    }

    pub fn n_classes(&self) -> usize {
        self.boosters.len()
    }

    /// Predicted class index for every row.
    pub fn predict_batch(&self, rows: &[Vec<ValueType>]) -> Vec<usize> {
        // ---
        let data: DataVec = rows
            .iter()
            .map(|row| Data::new_test_data(row.clone(), None))
            .collect();

        let per_class: Vec<Vec<ValueType>> = self.boosters.iter().map(|b| b.predict(&data)).collect();

        (0..rows.len())
            .map(|i| argmax(per_class.iter().map(|scores| scores[i])).unwrap_or(0))
            .collect()
    }

    /// Predicted class index for one row, `None` if the model has no classes.
    pub fn predict_one(&self, row: &[ValueType]) -> Option<usize> {
        // ---
        let data: DataVec = vec![Data::new_test_data(row.to_vec(), None)];
        argmax(self.boosters.iter().map(|b| b.predict(&data)[0]))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GatewayError> {
        let raw = serde_json::to_string(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

fn argmax(scores: impl Iterator<Item = ValueType>) -> Option<usize> {
    scores
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Feature row for one observation.
pub fn feature_row(year: i32, month: u32, day: u32, location_index: usize) -> Vec<ValueType> {
    vec![
        year as ValueType,
        month as ValueType,
        day as ValueType,
        location_index as ValueType,
    ]
}

// ---

/// The trained classifier together with the encoders it was trained with.
pub struct GbdtEventModel {
    booster: OneVsRestBooster,
    locations: LabelEncoder,
    events: LabelEncoder,
}

impl GbdtEventModel {
    pub fn new(
        booster: OneVsRestBooster,
        locations: LabelEncoder,
        events: LabelEncoder,
    ) -> Result<Self, GatewayError> {
        // ---
        if booster.n_classes() == 0 {
            return Err(GatewayError::EmptyModel);
        }
        if booster.n_classes() != events.len() {
            return Err(GatewayError::Mismatch(format!(
                "{} boosters but {} event classes",
                booster.n_classes(),
                events.len()
            )));
        }
        Ok(Self {
            booster,
            locations,
            events,
        })
    }

    /// Load the three artifacts written by `train-model`.
    pub fn load(
        model_path: impl AsRef<Path>,
        location_encoder_path: impl AsRef<Path>,
        event_encoder_path: impl AsRef<Path>,
    ) -> Result<Self, GatewayError> {
        // ---
        let booster = OneVsRestBooster::load(model_path)?;
        let locations = LabelEncoder::load(location_encoder_path)?;
        let events = LabelEncoder::load(event_encoder_path)?;
        Self::new(booster, locations, events)
    }

    pub fn save(
        &self,
        model_path: impl AsRef<Path>,
        location_encoder_path: impl AsRef<Path>,
        event_encoder_path: impl AsRef<Path>,
    ) -> Result<(), GatewayError> {
        // ---
        self.booster.save(model_path)?;
        self.locations.save(location_encoder_path)?;
        self.events.save(event_encoder_path)?;
        Ok(())
    }

    pub fn event_classes(&self) -> &[String] {
        self.events.classes()
    }
}

impl EventPredictor for GbdtEventModel {
    fn locations(&self) -> &[String] {
        self.locations.classes()
    }

    fn predict(&self, request: &PredictionRequest) -> Result<String, GatewayError> {
        // ---
        let location_index = self
            .locations
            .transform(request.location())
            .map_err(|_| GatewayError::UnknownLocation(request.location().to_string()))?;

        let row = feature_row(request.year(), request.month(), request.day(), location_index);
        let class = self.booster.predict_one(&row).ok_or(GatewayError::EmptyModel)?;
        let label = self
            .events
            .inverse_transform(class)
            .map_err(|_| GatewayError::UnknownClassIndex(class))?;

        Ok(label.to_string())
    }
}
