use std::path::PathBuf;

use candle_core::DeviceLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("tokenizer error: {0}")]
    TokenizerError(#[from] tokenizers::Error),
    #[error("candle error: {0}")]
    CandleError(#[from] candle_core::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),

    /// The imported data is not row/column shaped.
    #[error("invalid table shape: {0}")]
    ShapeError(String),
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("row {row}: cannot interpret '{value}' as a binary label")]
    InvalidLabel { row: usize, value: String },

    #[error("cannot load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
    #[error("unknown device '{0}'")]
    UnknownDevice(String),

    #[error("inference called with an empty batch")]
    EmptyBatch,
    #[error("device mismatch: model is on {model:?}, inputs are on {input:?}")]
    DeviceMismatch {
        model: DeviceLocation,
        input: DeviceLocation,
    },

    #[error("prediction table {0} has no rows")]
    EmptyPredictions(PathBuf),
    #[error("length mismatch: {references} references vs {predictions} predictions")]
    LengthMismatch {
        references: usize,
        predictions: usize,
    },
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
