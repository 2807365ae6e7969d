//! End-to-end chart synthesis with deterministic fallback.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use plotdeck_dataset::DataTable;
use tracing::{debug, warn};

use crate::command::PlotCommand;
use crate::engine::execute;
use crate::error::ChartError;
use crate::render::render;
use crate::sanitize::strip_code_fences;
use crate::Result;

/// Outcome of one synthesis run.
#[derive(Debug)]
pub struct ChartSynthesis {
    /// The sanitized code that was evaluated (the generated code even
    /// when the fallback produced the artifact, so callers can show it).
    pub code: String,
    /// Artifact file name, `plot_{dataset}_{unix_ts}.png`.
    pub filename: String,
    pub path: PathBuf,
    pub used_fallback: bool,
}

/// Evaluate the raw model output against `table` and render a PNG under
/// `artifacts_dir`.
///
/// When evaluation or rendering of the generated code fails, a
/// deterministic default chart is rendered instead; only when that also
/// fails does the call error, carrying both failure messages.
pub fn synthesize(raw: &str, table: &DataTable, artifacts_dir: &Path) -> Result<ChartSynthesis> {
    let code = strip_code_fences(raw);
    let filename = artifact_filename(&table.name);
    let path = artifacts_dir.join(&filename);
    std::fs::create_dir_all(artifacts_dir)?;

    let primary = execute(&code, table).and_then(|commands| render(&commands, &path));
    let used_fallback = match primary {
        Ok(()) => false,
        Err(primary_err) => {
            warn!(
                dataset = %table.name,
                error = %primary_err,
                "generated plot failed, rendering fallback",
            );
            render(&fallback_commands(table), &path).map_err(|fallback_err| {
                ChartError::ExecutionFailed {
                    primary: primary_err.to_string(),
                    fallback: fallback_err.to_string(),
                }
            })?;
            true
        }
    };

    if !path.is_file() {
        return Err(ChartError::ArtifactMissing(path));
    }
    debug!(dataset = %table.name, file = %filename, used_fallback, "chart rendered");

    Ok(ChartSynthesis { code, filename, path, used_fallback })
}

/// The deterministic default chart.
///
/// Two or more columns: scatter of the first column against the second,
/// pairwise-finite. One column: its finite values against the row index.
/// No columns yields no series, which the renderer rejects.
pub fn fallback_commands(table: &DataTable) -> Vec<PlotCommand> {
    match table.columns.as_slice() {
        [a, b, ..] => {
            let (x, y) = finite_pairs(a, b);
            vec![
                PlotCommand::Scatter { x, y },
                PlotCommand::Xlabel { text: a.name.clone() },
                PlotCommand::Ylabel { text: b.name.clone() },
                PlotCommand::Title {
                    text: format!("Scatter Plot of {} vs {}", a.name, b.name),
                },
            ]
        }
        [only] => vec![
            PlotCommand::Line { x: None, y: only.finite_values() },
            PlotCommand::Xlabel { text: "Index".into() },
            PlotCommand::Ylabel { text: only.name.clone() },
            PlotCommand::Title { text: format!("Plot of {}", only.name) },
        ],
        [] => Vec::new(),
    }
}

fn finite_pairs(a: &plotdeck_dataset::Column, b: &plotdeck_dataset::Column) -> (Vec<f64>, Vec<f64>) {
    a.values
        .iter()
        .zip(&b.values)
        .filter_map(|(ca, cb)| match (ca.as_f64(), cb.as_f64()) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        })
        .unzip()
}

fn artifact_filename(dataset: &str) -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("plot_{dataset}_{ts}.png")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
