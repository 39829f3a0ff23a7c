use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::ColumnNames;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub target: u8,
    pub prediction: String,
}

/// Ground truth paired with model output, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionTable {
    records: Vec<PredictionRecord>,
}

impl PredictionTable {
    pub fn new(records: Vec<PredictionRecord>) -> Self {
        Self { records }
    }

    pub fn from_parts(
        targets: impl ExactSizeIterator<Item = u8>,
        predictions: Vec<String>,
    ) -> Result<Self> {
        if targets.len() != predictions.len() {
            return Err(Error::LengthMismatch {
                references: targets.len(),
                predictions: predictions.len(),
            });
        }
        Ok(Self {
            records: targets
                .zip(predictions)
                .map(|(target, prediction)| PredictionRecord { target, prediction })
                .collect(),
        })
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn targets(&self) -> Vec<String> {
        self.records.iter().map(|r| r.target.to_string()).collect()
    }

    pub fn predictions(&self) -> Vec<String> {
        self.records.iter().map(|r| r.prediction.clone()).collect()
    }

    /// Writes `target,prediction` CSV, creating the parent directory if needed.
    /// The header is written even for an empty table.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record([ColumnNames::Target.as_str(), ColumnNames::Prediction.as_str()])?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        log::info!("wrote {} predictions to {}", self.len(), path.display());
        Ok(())
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let headers = reader.headers()?.clone();
        for required in [ColumnNames::Target, ColumnNames::Prediction] {
            if !headers.iter().any(|h| h == required.as_str()) {
                return Err(Error::MissingColumn(required.as_str().to_string()));
            }
        }
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<PredictionRecord>, _>>()?;
        Ok(Self { records })
    }
}
