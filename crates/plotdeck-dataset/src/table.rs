//! In-memory table model with per-column type inference.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::DatasetError;

/// Inferred column type.
///
/// Inference order per column, considering non-null cells only:
/// all parse as `i64` → `Int`; all parse as `f64` → `Float`; all are
/// `true`/`false` (case-insensitive) → `Bool`; otherwise `Str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    Int,
    Float,
    Bool,
    Str,
}

impl Dtype {
    /// Display name used in prompt-facing summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dtype::Int => "int64",
            Dtype::Float => "float64",
            Dtype::Bool => "bool",
            Dtype::Str => "object",
        }
    }
}

/// A single typed cell. Empty CSV fields become `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell; `None` for null, bool and string cells.
    /// Non-finite floats are preserved here and filtered by callers that
    /// need finite values (statistics, plotting).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// JSON view of the cell. NaN and ±Inf have no JSON representation
    /// and are mapped to `null`, which is exactly the sanitization the
    /// HTTP surface requires.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Int(v) => Value::from(*v),
            Cell::Float(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Bool(v) => Value::from(*v),
            Cell::Str(v) => Value::from(v.clone()),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: Dtype,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|c| c.is_null()).count()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.dtype, Dtype::Int | Dtype::Float)
    }

    /// Finite numeric values, nulls and NaN/Inf skipped.
    pub fn finite_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(Cell::as_f64)
            .filter(|v| v.is_finite())
            .collect()
    }
}

/// A fully-loaded tabular dataset.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Request-facing (hyphenated) dataset name.
    pub name: String,
    pub columns: Vec<Column>,
    pub n_rows: usize,
}

impl DataTable {
    /// Parse CSV from any reader. The first record is the header row.
    pub fn from_csv_reader<R: Read>(name: &str, reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();

        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut n_rows = 0usize;
        for record in rdr.records() {
            let record = record?;
            for (i, col) in raw.iter_mut().enumerate() {
                col.push(record.get(i).unwrap_or("").trim().to_owned());
            }
            n_rows += 1;
        }

        let columns = headers
            .into_iter()
            .zip(raw)
            .map(|(name, values)| build_column(name, values))
            .collect();

        Ok(DataTable {
            name: name.to_owned(),
            columns,
            n_rows,
        })
    }

    pub fn from_csv_path(name: &str, path: &Path) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(name, file)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Row-major JSON records, one field map per row, NaN/Inf → null.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        (0..self.n_rows)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| (col.name.clone(), col.values[row].to_json()))
                    .collect()
            })
            .collect()
    }
}

fn build_column(name: String, raw: Vec<String>) -> Column {
    let dtype = infer_dtype(&raw);
    let values = raw
        .into_iter()
        .map(|s| parse_cell(&s, dtype))
        .collect();
    Column { name, dtype, values }
}

fn infer_dtype(raw: &[String]) -> Dtype {
    let non_null: Vec<&String> = raw.iter().filter(|s| !s.is_empty()).collect();
    if non_null.is_empty() {
        return Dtype::Str;
    }
    if non_null.iter().all(|s| s.parse::<i64>().is_ok()) {
        return Dtype::Int;
    }
    if non_null.iter().all(|s| s.parse::<f64>().is_ok()) {
        return Dtype::Float;
    }
    if non_null.iter().all(|s| s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")) {
        return Dtype::Bool;
    }
    Dtype::Str
}

fn parse_cell(s: &str, dtype: Dtype) -> Cell {
    if s.is_empty() {
        return Cell::Null;
    }
    match dtype {
        // Parses cannot fail here: the dtype was inferred from these
        // exact strings. Fall through to Str on the impossible path.
        Dtype::Int => s.parse().map(Cell::Int).unwrap_or_else(|_| Cell::Str(s.to_owned())),
        Dtype::Float => s.parse().map(Cell::Float).unwrap_or_else(|_| Cell::Str(s.to_owned())),
        Dtype::Bool => Cell::Bool(s.eq_ignore_ascii_case("true")),
        Dtype::Str => Cell::Str(s.to_owned()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    const CSV: &str = "a,b,c,d\n1,1.5,true,x\n2,,false,y\n3,2.5,true,\n";

    fn table() -> DataTable {
        DataTable::from_csv_reader("sample", CSV.as_bytes()).expect("parse")
    }

    #[test]
    fn infers_column_dtypes() {
        let t = table();
        assert_eq!(t.columns[0].dtype, Dtype::Int);
        assert_eq!(t.columns[1].dtype, Dtype::Float);
        assert_eq!(t.columns[2].dtype, Dtype::Bool);
        assert_eq!(t.columns[3].dtype, Dtype::Str);
    }

    #[test]
    fn counts_rows_and_nulls() {
        let t = table();
        assert_eq!(t.n_rows, 3);
        assert_eq!(t.columns[1].null_count(), 1);
        assert_eq!(t.columns[3].null_count(), 1);
    }

    #[test]
    fn records_length_matches_row_count() {
        let t = table();
        assert_eq!(t.records().len(), t.n_rows);
    }

    #[test]
    fn nan_and_inf_become_null_in_records() {
        let csv = "v\nNaN\ninf\n2.5\n";
        let t = DataTable::from_csv_reader("nn", csv.as_bytes()).expect("parse");
        assert_eq!(t.columns[0].dtype, Dtype::Float);
        let recs = t.records();
        assert_eq!(recs[0]["v"], Value::Null);
        assert_eq!(recs[1]["v"], Value::Null);
        assert_eq!(recs[2]["v"], serde_json::json!(2.5));
    }

    #[test]
    fn finite_values_skip_null_and_nan() {
        let csv = "v\n1\nNaN\n\n3\n";
        let t = DataTable::from_csv_reader("fv", csv.as_bytes()).expect("parse");
        assert_eq!(t.columns[0].finite_values(), vec![1.0, 3.0]);
    }

    #[test]
    fn integers_with_exponent_are_float() {
        let csv = "v\n1e3\n2\n";
        let t = DataTable::from_csv_reader("e", csv.as_bytes()).expect("parse");
        assert_eq!(t.columns[0].dtype, Dtype::Float);
    }
}
