use crate::error::{Error, Result};

/// One imported row. `None` marks an empty cell.
pub type RawRecord = Vec<Option<String>>;

/// The imported dataset before normalization: named columns over rows of
/// optional string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<RawRecord>,
}

impl RawTable {
    /// Builds a table, rejecting rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<RawRecord>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::ShapeError("table has no columns".to_string()));
        }
        if let Some((row, record)) = rows
            .iter()
            .enumerate()
            .find(|(_, record)| record.len() != columns.len())
        {
            return Err(Error::ShapeError(format!(
                "row {row} has {} cells, expected {}",
                record.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[RawRecord] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Iterates the cells of one column in row order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = Option<&str>> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| row[idx].as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec![cell("1"), cell("2")], vec![cell("3")]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ShapeError(_)));
    }

    #[test]
    fn rejects_headerless_table() {
        assert!(matches!(
            RawTable::new(vec![], vec![]),
            Err(Error::ShapeError(_))
        ));
    }

    #[test]
    fn column_lookup() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec![cell("1"), None], vec![cell("3"), cell("4")]],
        )
        .unwrap();
        let b: Vec<_> = table.column("b").unwrap().collect();
        assert_eq!(b, vec![None, Some("4")]);
        assert!(matches!(table.column("c"), Err(Error::MissingColumn(c)) if c == "c"));
    }
}
