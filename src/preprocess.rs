use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::{NormalizedRecord, NormalizedTable};
use crate::error::{Error, Result};
use crate::table::{RawRecord, RawTable};

/// Which raw columns become `source` and `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: String,
    pub target: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            source: "neutral".to_string(),
            target: "toxic".to_string(),
        }
    }
}

/// Shape and quality statistics of a raw table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetProperties {
    pub dataset_columns: usize,
    /// Rows identical to an earlier row across every raw column. Rows that
    /// differ only outside the source/target columns are not counted here,
    /// yet collapse into one record in [`RawDataPreprocessor::transform`].
    pub dataset_duplicates: usize,
    /// Total number of empty cells across all columns.
    pub dataset_empty_rows: usize,
    pub dataset_number_of_samples: usize,
    pub dataset_sample_max_len: Option<usize>,
    pub dataset_sample_min_len: Option<usize>,
}

pub struct RawDataPreprocessor {
    raw_data: RawTable,
    columns: ColumnMapping,
}

impl RawDataPreprocessor {
    pub fn new(raw_data: RawTable, columns: ColumnMapping) -> Self {
        Self { raw_data, columns }
    }

    pub fn raw_data(&self) -> &RawTable {
        &self.raw_data
    }

    pub fn analyze(&self) -> Result<DatasetProperties> {
        let lengths: Vec<usize> = self
            .raw_data
            .column(&self.columns.source)?
            .flatten()
            .map(|s| s.chars().count())
            .collect();

        let mut seen: HashSet<&RawRecord> = HashSet::new();
        let duplicates = self
            .raw_data
            .rows()
            .iter()
            .filter(|row| !seen.insert(*row))
            .count();

        let empty_cells = self
            .raw_data
            .rows()
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_none())
            .count();

        Ok(DatasetProperties {
            dataset_columns: self.raw_data.num_columns(),
            dataset_duplicates: duplicates,
            dataset_empty_rows: empty_cells,
            dataset_number_of_samples: self.raw_data.num_rows(),
            dataset_sample_max_len: lengths.iter().copied().max(),
            dataset_sample_min_len: lengths.iter().copied().min(),
        })
    }

    /// Projects the raw table onto `(source, target)`, dropping duplicate
    /// rows (first occurrence wins) and rows without source text.
    ///
    /// Pure function of the raw table, so repeated calls yield equal output.
    pub fn transform(&self) -> Result<NormalizedTable> {
        let source_idx = self.raw_data.column_index(&self.columns.source)?;
        let target_idx = self.raw_data.column_index(&self.columns.target)?;

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(self.raw_data.num_rows());
        let mut without_source = 0usize;

        for (row, cells) in self.raw_data.rows().iter().enumerate() {
            let Some(source) = cells[source_idx].as_deref() else {
                without_source += 1;
                continue;
            };
            let target = parse_label(cells[target_idx].as_deref(), row)?;
            let record = NormalizedRecord {
                source: source.to_string(),
                target,
            };
            if seen.insert(record.clone()) {
                records.push(record);
            }
        }

        if without_source > 0 {
            log::warn!("dropped {without_source} rows with an empty source column");
        }
        log::info!(
            "normalized {} of {} rows",
            records.len(),
            self.raw_data.num_rows()
        );
        Ok(NormalizedTable::new(records))
    }
}

fn parse_label(value: Option<&str>, row: usize) -> Result<u8> {
    let value = value.unwrap_or("");
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(1),
        "false" | "0" => Ok(0),
        _ => Err(Error::InvalidLabel {
            row,
            value: value.to_string(),
        }),
    }
}
