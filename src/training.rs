//! Offline training pipeline for the event classifier.
//!
//! CSV -> encoders -> stratified split -> one-vs-rest boosting -> evaluation
//! -> artifacts. Driven by the `train-model` binary.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use gbdt::decision_tree::ValueType;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::TrainingConfig;
use crate::gateway::{feature_row, GatewayError, GbdtEventModel, LabelEncoder, OneVsRestBooster};

// ---

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("failed to read training CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("training CSV has no rows")]
    Empty,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// One historical observation.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    // ---
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Day")]
    pub day: u32,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Event")]
    pub event: String,
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<EventRecord>, TrainingError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_records(file)
}

/// Parse records from any CSV source with a header row. Extra columns are
/// ignored; surrounding whitespace is trimmed.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<EventRecord>, TrainingError> {
    // ---
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = rdr.deserialize().collect::<Result<Vec<EventRecord>, _>>()?;
    if records.is_empty() {
        return Err(TrainingError::Empty);
    }
    Ok(records)
}

/// Records turned into model input.
pub struct Dataset {
    pub rows: Vec<Vec<ValueType>>,
    pub labels: Vec<usize>,
    pub locations: LabelEncoder,
    pub events: LabelEncoder,
}

pub fn encode(records: &[EventRecord]) -> Result<Dataset, TrainingError> {
    // ---
    let locations = LabelEncoder::fit(records.iter().map(|r| r.location.as_str()));
    let events = LabelEncoder::fit(records.iter().map(|r| r.event.as_str()));

    let mut rows = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());
    for r in records {
        let location = locations.transform(&r.location).map_err(GatewayError::from)?;
        rows.push(feature_row(r.year, r.month, r.day, location));
        labels.push(events.transform(&r.event).map_err(GatewayError::from)?);
    }

    Ok(Dataset {
        rows,
        labels,
        locations,
        events,
    })
}

/// Split row indices into (train, test), holding out `test_size` of every
/// class. Each class keeps at least one training row. Deterministic for a
/// given `seed`.
pub fn stratified_split(labels: &[usize], test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    // ---
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut indices) in by_class {
        indices.shuffle(&mut rng);
        let n_test = ((indices.len() as f64 * test_size).round() as usize).min(indices.len() - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

// ---

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Accuracy plus a per-class classification report.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
}

pub fn evaluate(truth: &[usize], predicted: &[usize], classes: &[String]) -> EvaluationReport {
    // ---
    let n = classes.len();
    let mut true_pos = vec![0usize; n];
    let mut predicted_count = vec![0usize; n];
    let mut support = vec![0usize; n];

    for (&t, &p) in truth.iter().zip(predicted) {
        support[t] += 1;
        predicted_count[p] += 1;
        if t == p {
            true_pos[t] += 1;
        }
    }

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

    let per_class = classes
        .iter()
        .enumerate()
        .map(|(k, label)| {
            let precision = ratio(true_pos[k], predicted_count[k]);
            let recall = ratio(true_pos[k], support[k]);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support: support[k],
            }
        })
        .collect();

    EvaluationReport {
        accuracy: ratio(true_pos.iter().sum(), truth.len()),
        per_class,
    }
}

impl EvaluationReport {
    pub fn log(&self) {
        // ---
        info!("Accuracy: {:.2}%", self.accuracy * 100.0);
        info!("{:>24} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support");
        for m in &self.per_class {
            info!(
                "{:>24} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1, m.support
            );
        }
    }
}

// ---

/// Run the whole pipeline and write the artifacts. Returns the held-out
/// evaluation, or `None` when `test_size` leaves no test rows.
pub fn run(config: &TrainingConfig) -> Result<Option<EvaluationReport>, TrainingError> {
    // ---
    let records = load_records(&config.csv_path)?;
    info!("Dataset loaded with {} rows", records.len());

    let data = encode(&records)?;
    info!(
        "{} locations, {} event classes",
        data.locations.len(),
        data.events.len()
    );

    let (train_idx, test_idx) = stratified_split(&data.labels, config.test_size, config.split_seed);
    info!("Split: {} train / {} test", train_idx.len(), test_idx.len());

    let pick_rows = |idx: &[usize]| idx.iter().map(|&i| data.rows[i].clone()).collect::<Vec<_>>();
    let pick_labels = |idx: &[usize]| idx.iter().map(|&i| data.labels[i]).collect::<Vec<_>>();

    let booster = OneVsRestBooster::fit(
        &pick_rows(&train_idx),
        &pick_labels(&train_idx),
        data.events.len(),
        config.params,
    );

    let report = if test_idx.is_empty() {
        None
    } else {
        let predicted = booster.predict_batch(&pick_rows(&test_idx));
        let report = evaluate(&pick_labels(&test_idx), &predicted, data.events.classes());
        report.log();
        Some(report)
    };

    let model = GbdtEventModel::new(booster, data.locations, data.events)?;
    model.save(
        &config.artifacts.model,
        &config.artifacts.location_encoder,
        &config.artifacts.event_encoder,
    )?;
    info!("Model and encoders saved");

    Ok(report)
}
