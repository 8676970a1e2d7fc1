use serde::Serialize;

use crate::error::GeseError;

/// A numeric table with a string row index (first CSV column) and string
/// column names. Cells are `Option<f64>` so a missing measurement stays
/// distinguishable from any real value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericTable {
    index: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl NumericTable {
    pub fn new(index: Vec<String>, columns: Vec<String>, cells: Vec<Vec<Option<f64>>>) -> Self {
        Self {
            index,
            columns,
            cells,
        }
    }

    /// Parse CSV bytes where the first column holds row identifiers and the
    /// remaining columns hold numeric values. Empty cells and the usual
    /// missing-value spellings become `None`.
    pub fn from_csv(bytes: &[u8], file: &str) -> Result<Self, GeseError> {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader
            .headers()
            .map_err(|err| malformed(file, err.to_string()))?;
        let columns: Vec<String> = headers.iter().skip(1).map(|name| name.to_string()).collect();

        let mut index = Vec::new();
        let mut cells = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| malformed(file, err.to_string()))?;
            let row_label = record.get(0).unwrap_or("").to_string();
            let mut row = Vec::with_capacity(columns.len());
            for (position, raw) in record.iter().skip(1).enumerate() {
                let column = columns
                    .get(position)
                    .map(|name| name.as_str())
                    .unwrap_or("?");
                row.push(parse_cell(raw, file, &row_label, column)?);
            }
            index.push(row_label);
            cells.push(row);
        }

        Ok(Self {
            index,
            columns,
            cells,
        })
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn row_position(&self, label: &str) -> Option<usize> {
        self.index.iter().position(|name| name == label)
    }

    pub fn column_position(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == label)
    }

    pub fn value_at(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|cells| cells.get(column)).copied().flatten()
    }

    /// Convenience label-based lookup; `None` for a missing cell or an
    /// unknown label alike.
    pub fn get(&self, row_label: &str, column_label: &str) -> Option<f64> {
        let row = self.row_position(row_label)?;
        let column = self.column_position(column_label)?;
        self.value_at(row, column)
    }
}

/// A benchmark results table kept as strings: filtering compares labels, and
/// score columns pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl BenchmarkTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn from_csv(bytes: &[u8], file: &str) -> Result<Self, GeseError> {
        let mut reader = csv::Reader::from_reader(bytes);
        let columns: Vec<String> = reader
            .headers()
            .map_err(|err| malformed(file, err.to_string()))?
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| malformed(file, err.to_string()))?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Case-insensitive column lookup: "Species", "species" and "SPECIES"
    /// all resolve to the same position.
    pub fn column_position_ci(&self, label: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| name.eq_ignore_ascii_case(label))
    }

    pub fn retain<F>(&self, keep: F) -> BenchmarkTable
    where
        F: Fn(&[String]) -> bool,
    {
        BenchmarkTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }
}

fn parse_cell(
    raw: &str,
    file: &str,
    row: &str,
    column: &str,
) -> Result<Option<f64>, GeseError> {
    let value = raw.trim();
    if value.is_empty() || matches!(value, "NA" | "NaN" | "nan") {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| malformed(file, format!("non-numeric value '{value}' at row '{row}', column '{column}'")))
}

fn malformed(file: &str, message: String) -> GeseError {
    GeseError::MalformedPayload {
        file: file.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_numeric_csv_with_index_column() {
        let bytes = b",m1,m2\ng1,0,1.5\ng2,2,\n";
        let table = NumericTable::from_csv(bytes, "testX.csv").unwrap();

        assert_eq!(table.index(), ["g1", "g2"]);
        assert_eq!(table.columns(), ["m1", "m2"]);
        assert_eq!(table.get("g1", "m2"), Some(1.5));
        assert_eq!(table.get("g2", "m2"), None);
    }

    #[test]
    fn parse_numeric_csv_treats_na_as_missing() {
        let bytes = b",DF,DTF\ng1,NA,12\n";
        let table = NumericTable::from_csv(bytes, "testY.csv").unwrap();
        assert_eq!(table.get("g1", "DF"), None);
        assert_eq!(table.get("g1", "DTF"), Some(12.0));
    }

    #[test]
    fn parse_numeric_csv_rejects_text_cells() {
        let bytes = b",m1\ng1,oops\n";
        let err = NumericTable::from_csv(bytes, "testX.csv").unwrap_err();
        assert_matches!(err, GeseError::MalformedPayload { ref file, .. } if file == "testX.csv");
    }

    #[test]
    fn benchmark_column_lookup_is_case_insensitive() {
        let bytes = b"Species,Trait,Model,r2\nbean,DF,GBLUP,0.5\n";
        let table = BenchmarkTable::from_csv(bytes, "results_summary.csv").unwrap();

        assert_eq!(table.column_position_ci("species"), Some(0));
        assert_eq!(table.column_position_ci("SPECIES"), Some(0));
        assert_eq!(table.column_position_ci("model"), Some(2));
        assert_eq!(table.column_position_ci("score"), None);
    }
}
