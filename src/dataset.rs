use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canonical column names of the normalized schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnNames {
    Target,
    Prediction,
}

impl ColumnNames {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::Prediction => "prediction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub source: String,
    pub target: u8,
}

/// The output of preprocessing: rows indexed contiguously from zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTable {
    records: Vec<NormalizedRecord>,
}

impl NormalizedTable {
    pub fn new(records: Vec<NormalizedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` rows (or all of them if the table is shorter).
    pub fn head(&self, n: usize) -> Self {
        Self {
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.source.as_str())
    }

    pub fn targets(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        self.records.iter().map(|r| r.target)
    }
}

/// One inference-ready sample: the source text of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample(pub String);

impl Sample {
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// Read-only, positional view over a [`NormalizedTable`].
///
/// The table is copied on construction and never mutated afterwards, so
/// indices stay valid for the lifetime of the dataset.
#[derive(Debug, Clone)]
pub struct SampleDataset {
    data: NormalizedTable,
}

impl SampleDataset {
    pub fn new(data: &NormalizedTable) -> Self {
        Self { data: data.clone() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn sample_at(&self, index: usize) -> Result<Sample> {
        self.data
            .records()
            .get(index)
            .map(|r| Sample(r.source.clone()))
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.data.sources().map(|s| Sample(s.to_string()))
    }

    pub fn data(&self) -> &NormalizedTable {
        &self.data
    }
}
