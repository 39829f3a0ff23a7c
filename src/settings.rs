use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::evaluator::TaskEvaluator;
use crate::preprocess::ColumnMapping;

/// Contents of `settings.json`. Only `parameters` is mandatory.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub parameters: Parameters,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub inference: InferenceSettings,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Parameters {
    /// Path of the dataset file to import.
    pub dataset: PathBuf,
    /// Path of the local model directory.
    pub model: PathBuf,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceSettings {
    pub max_length: usize,
    pub batch_size: usize,
    pub device: String,
    /// Caps the working set to the first `num_samples` normalized rows.
    pub num_samples: Option<usize>,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            max_length: 120,
            batch_size: 64,
            device: "cpu".to_string(),
            num_samples: Some(100),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn predictions_path(&self) -> PathBuf {
        self.output_dir.join("predictions.csv")
    }

    /// Resolves the configured metrics against the predictions path. Call it
    /// before inference so a bad metric name fails fast.
    pub fn evaluator(&self) -> Result<TaskEvaluator> {
        TaskEvaluator::new(self.predictions_path(), &self.parameters.metrics)
    }
}
