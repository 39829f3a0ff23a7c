use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::table::{RawRecord, RawTable};

/// Reads a labeled dataset from a local file into a [`RawTable`].
///
/// The format is picked from the extension:
/// * `.csv`            – header row, one record per line
/// * `.json`           – `[{ "column": value, ... }, ...]`
/// * `.jsonl`/`.ndjson` – one JSON object per line
pub struct RawDataImporter {
    path: PathBuf,
}

impl RawDataImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn obtain(&self) -> Result<RawTable> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let table = match ext.as_str() {
            "csv" => read_csv(&self.path)?,
            "json" => {
                let text = std::fs::read_to_string(&self.path)?;
                let root: JsonValue = serde_json::from_str(&text)?;
                let records = root.as_array().ok_or_else(|| {
                    Error::ShapeError("expected a top-level JSON array of records".to_string())
                })?;
                records_to_table(records.iter())?
            }
            "jsonl" | "ndjson" => {
                let text = std::fs::read_to_string(&self.path)?;
                let records = text
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(serde_json::from_str)
                    .collect::<std::result::Result<Vec<JsonValue>, _>>()?;
                records_to_table(records.iter())?
            }
            other => {
                return Err(Error::ShapeError(format!(
                    "unsupported dataset extension '.{other}'"
                )))
            }
        };

        log::info!(
            "imported {} rows x {} columns from {}",
            table.num_rows(),
            table.num_columns(),
            self.path.display()
        );
        Ok(table)
    }
}

fn read_csv(path: &Path) -> Result<RawTable> {
    // Width is validated by RawTable so ragged input surfaces as a shape error.
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|v| (!v.is_empty()).then(|| v.to_string()))
                .collect(),
        );
    }
    RawTable::new(columns, rows)
}

fn records_to_table<'a>(records: impl Iterator<Item = &'a JsonValue>) -> Result<RawTable> {
    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::new();

    for (i, rec) in records.enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| Error::ShapeError(format!("record {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push((i, obj));
    }

    let rows = objects
        .into_iter()
        .map(|(i, obj)| {
            columns
                .iter()
                .map(|col| json_to_cell(obj.get(col), i, col))
                .collect::<Result<RawRecord>>()
        })
        .collect::<Result<Vec<_>>>()?;

    RawTable::new(columns, rows)
}

fn json_to_cell(val: Option<&JsonValue>, row: usize, col: &str) -> Result<Option<String>> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) if s.is_empty() => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(Error::ShapeError(format!(
            "record {row}, column '{col}': nested values are not supported"
        ))),
    }
}
