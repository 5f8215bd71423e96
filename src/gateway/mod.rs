//! Prediction gateway: the boundary behind which the trained classifier lives.
//!
//! Handlers only see the [`EventPredictor`] trait. The production
//! implementation is [`GbdtEventModel`]; tests plug in their own.

use thiserror::Error;

use crate::models::PredictionRequest;

mod booster;
mod encoder;

pub use booster::{feature_row, BoosterParams, GbdtEventModel, OneVsRestBooster, FEATURE_SIZE};
pub use encoder::{EncoderError, LabelEncoder};

// ---

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("location '{0}' was not part of the training data")]
    UnknownLocation(String),

    #[error("classifier produced class index {0} with no event label")]
    UnknownClassIndex(usize),

    #[error("classifier has no classes")]
    EmptyModel,

    #[error("encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("failed to read or write model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("model does not match encoders: {0}")]
    Mismatch(String),
}

/// Anything that can turn a validated request into an event label.
pub trait EventPredictor: Send + Sync {
    /// Locations the predictor accepts, for the selection control.
    fn locations(&self) -> &[String];

    fn predict(&self, request: &PredictionRequest) -> Result<String, GatewayError>;
}
