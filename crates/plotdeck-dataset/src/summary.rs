//! Prompt-facing dataset summaries.
//!
//! The rendered text is consumed by a language model, not a human UI, so
//! the format favors density over layout: shape, column list, dtypes,
//! null counts, a small row sample, and descriptive statistics for the
//! numeric columns.

use std::fmt::Write;

use crate::table::{Cell, DataTable};

const SAMPLE_ROWS: usize = 3;

/// Render a textual summary of `table` for inclusion in an LLM prompt.
pub fn summarize(table: &DataTable) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Dataset Summary:");
    let _ = writeln!(
        out,
        "- Shape: {} rows, {} columns",
        table.n_rows,
        table.columns.len()
    );
    let _ = writeln!(out, "- Columns: {}", table.column_names().join(", "));
    let _ = writeln!(
        out,
        "- Data types: {}",
        table
            .columns
            .iter()
            .map(|c| format!("{}: {}", c.name, c.dtype.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    let _ = writeln!(
        out,
        "- Missing values: {}",
        table
            .columns
            .iter()
            .map(|c| format!("{}: {}", c.name, c.null_count()))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if table.n_rows > 0 {
        let _ = writeln!(out, "\nSample data:");
        let _ = writeln!(out, "{}", table.column_names().join(" "));
        for row in 0..table.n_rows.min(SAMPLE_ROWS) {
            let cells: Vec<String> = table
                .columns
                .iter()
                .map(|c| render_cell(&c.values[row]))
                .collect();
            let _ = writeln!(out, "{}", cells.join(" "));
        }
    }

    let numeric: Vec<_> = table.columns.iter().filter(|c| c.is_numeric()).collect();
    if !numeric.is_empty() {
        let _ = writeln!(out, "\nNumeric column statistics:");
        for col in numeric {
            let values = col.finite_values();
            let d = Describe::of(&values);
            let _ = writeln!(
                out,
                "{}: count={} mean={:.4} std={:.4} min={:.4} 25%={:.4} 50%={:.4} 75%={:.4} max={:.4}",
                col.name, d.count, d.mean, d.std, d.min, d.q25, d.q50, d.q75, d.max
            );
        }
    }

    out
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Null => "NaN".to_owned(),
        Cell::Int(v) => v.to_string(),
        Cell::Float(v) => v.to_string(),
        Cell::Bool(v) => v.to_string(),
        Cell::Str(v) => v.clone(),
    }
}

/// Descriptive statistics over the finite values of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); 0.0 when count < 2.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Describe {
                count: 0,
                mean: 0.0,
                std: 0.0,
                min: 0.0,
                q25: 0.0,
                q50: 0.0,
                q75: 0.0,
                max: 0.0,
            };
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));

        Describe {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }
}

/// Linear-interpolation quantile over pre-sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn describe_matches_pandas_semantics() {
        let d = Describe::of(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(d.count, 5);
        assert!((d.mean - 3.0).abs() < 1e-12);
        // sample std of 1..=5 is sqrt(2.5)
        assert!((d.std - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.q25, 2.0);
        assert_eq!(d.q50, 3.0);
        assert_eq!(d.q75, 4.0);
        assert_eq!(d.max, 5.0);
    }

    #[test]
    fn quantile_interpolates_between_points() {
        let d = Describe::of(&[1.0, 2.0, 3.0, 4.0]);
        assert!((d.q25 - 1.75).abs() < 1e-12);
        assert!((d.q50 - 2.5).abs() < 1e-12);
        assert!((d.q75 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn single_value_describe_is_degenerate() {
        let d = Describe::of(&[7.0]);
        assert_eq!(d.std, 0.0);
        assert_eq!(d.q25, 7.0);
        assert_eq!(d.max, 7.0);
    }

    #[test]
    fn summary_names_every_section() {
        let csv = "price,label\n1,a\n2,b\n3,c\n4,d\n";
        let table = crate::DataTable::from_csv_reader("s", csv.as_bytes()).expect("parse");
        let text = summarize(&table);
        assert!(text.contains("4 rows, 2 columns"));
        assert!(text.contains("price: int64"));
        assert!(text.contains("label: object"));
        assert!(text.contains("Sample data:"));
        assert!(text.contains("Numeric column statistics:"));
        assert!(text.contains("price: count=4"));
        // only the first three rows are sampled
        assert!(!text.contains("\n4 d"));
    }

    #[test]
    fn summary_omits_stats_without_numeric_columns() {
        let csv = "label\nx\ny\n";
        let table = crate::DataTable::from_csv_reader("s", csv.as_bytes()).expect("parse");
        let text = summarize(&table);
        assert!(!text.contains("Numeric column statistics:"));
    }
}
