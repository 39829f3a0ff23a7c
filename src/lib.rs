//! Batch inference and evaluation for a pretrained toxicity classifier.
//!
//! Raw data is imported and analyzed, normalized into `(source, target)`
//! records, wrapped in a [`SampleDataset`], run through an
//! [`InferencePipeline`], persisted as a [`PredictionTable`] and scored by a
//! [`TaskEvaluator`].

pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod importer;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod predictions;
pub mod preprocess;
pub mod settings;
pub mod table;
pub mod timing;

pub use dataset::{NormalizedRecord, NormalizedTable, Sample, SampleDataset};
pub use error::{Error, Result};
pub use evaluator::{MetricScores, TaskEvaluator};
pub use importer::RawDataImporter;
pub use pipeline::{InferencePipeline, ModelProperties};
pub use predictions::{PredictionRecord, PredictionTable};
pub use preprocess::{ColumnMapping, DatasetProperties, RawDataPreprocessor};
pub use settings::Settings;
