//! The recorded plotting command set.
//!
//! The evaluator does not draw; it records. Each `plt` method call in
//! the generated code becomes one command here, and the renderer replays
//! them against a fresh drawing area. The JSON shape is the contract
//! with the JavaScript shim (`op`-tagged objects).

use serde::{Deserialize, Serialize};

/// One recorded plotting call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PlotCommand {
    /// `plt.scatter(x, y)` — pairwise-finite points.
    Scatter { x: Vec<f64>, y: Vec<f64> },
    /// `plt.plot(y)` or `plt.plot(x, y)`; without `x` the series is
    /// drawn against the row index.
    Line {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<Vec<f64>>,
        y: Vec<f64>,
    },
    /// `plt.bar(labels, values)`.
    Bar { labels: Vec<String>, values: Vec<f64> },
    /// `plt.hist(values, bins)`.
    Hist {
        values: Vec<f64>,
        #[serde(default)]
        bins: Option<u32>,
    },
    Xlabel { text: String },
    Ylabel { text: String },
    Title { text: String },
}

impl PlotCommand {
    /// Whether this command draws a data series (as opposed to styling).
    pub fn is_series(&self) -> bool {
        matches!(
            self,
            PlotCommand::Scatter { .. }
                | PlotCommand::Line { .. }
                | PlotCommand::Bar { .. }
                | PlotCommand::Hist { .. }
        )
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserializes_shim_output() {
        let json = r#"[
            {"op":"scatter","x":[1.0,2.0],"y":[3.0,4.0]},
            {"op":"line","y":[1.0,2.0]},
            {"op":"line","x":[0.0,1.0],"y":[5.0,6.0]},
            {"op":"bar","labels":["a","b"],"values":[1.0,2.0]},
            {"op":"hist","values":[1.0,1.5],"bins":null},
            {"op":"title","text":"T"}
        ]"#;
        let commands: Vec<PlotCommand> = serde_json::from_str(json).expect("parse");
        assert_eq!(commands.len(), 6);
        assert!(commands[0].is_series());
        assert!(!commands[5].is_series());
        assert_eq!(
            commands[1],
            PlotCommand::Line { x: None, y: vec![1.0, 2.0] }
        );
    }
}
