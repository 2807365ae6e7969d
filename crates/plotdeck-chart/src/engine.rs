//! Scoped JavaScript evaluation of generated plotting code.
//!
//! Each call builds a fresh `boa_engine::Context`, installs a recording
//! `plt` shim plus the dataset as `df`, evaluates the candidate
//! statements, and reads the recorded commands back as JSON. Nothing
//! survives the call; two requests can never observe each other's
//! drawing state.
//!
//! `columns` and `length` are reserved keys on `df`: the metadata
//! assignments run after the column arrays are installed, so a data
//! column with either name is shadowed by the metadata.

use boa_engine::{Context, Source};
use plotdeck_dataset::DataTable;
use serde_json::{Map, Value};

use crate::command::PlotCommand;
use crate::error::ChartError;
use crate::Result;

/// Recording shim for the `plt` surface the prompt advertises.
///
/// Series arguments are coerced with `Number()` and filtered to finite
/// values before recording; `null` cells (the JSON image of missing or
/// non-finite data) are dropped pairwise. Styling calls record text,
/// figure-management calls are tolerated as no-ops.
const PLT_SHIM: &str = r#"
(function () {
  "use strict";
  globalThis.__plot_commands = [];
  function push(cmd) { globalThis.__plot_commands.push(cmd); }
  function num(v) {
    if (v === null || v === undefined) { return null; }
    var n = Number(v);
    return isFinite(n) ? n : null;
  }
  function finite(vs) {
    var out = [];
    for (var i = 0; i < vs.length; i++) {
      var v = num(vs[i]);
      if (v !== null) { out.push(v); }
    }
    return out;
  }
  function pairs(xs, ys) {
    var x = [], y = [], n = Math.min(xs.length, ys.length);
    for (var i = 0; i < n; i++) {
      var a = num(xs[i]), b = num(ys[i]);
      if (a !== null && b !== null) { x.push(a); y.push(b); }
    }
    return { x: x, y: y };
  }
  function noop() {}
  globalThis.plt = {
    scatter: function (xs, ys) {
      var p = pairs(xs, ys);
      push({ op: "scatter", x: p.x, y: p.y });
    },
    plot: function (a, b) {
      if (b === undefined) {
        push({ op: "line", y: finite(a) });
      } else {
        var p = pairs(a, b);
        push({ op: "line", x: p.x, y: p.y });
      }
    },
    bar: function (labels, values) {
      var l = [], v = [], n = Math.min(labels.length, values.length);
      for (var i = 0; i < n; i++) {
        var val = num(values[i]);
        if (val !== null) { l.push(String(labels[i])); v.push(val); }
      }
      push({ op: "bar", labels: l, values: v });
    },
    hist: function (values, bins) {
      var b = num(bins);
      push({
        op: "hist",
        values: finite(values),
        bins: (b !== null && b >= 1) ? Math.floor(b) : null
      });
    },
    xlabel: function (t) { push({ op: "xlabel", text: String(t) }); },
    ylabel: function (t) { push({ op: "ylabel", text: String(t) }); },
    title: function (t) { push({ op: "title", text: String(t) }); },
    figure: noop,
    legend: noop,
    grid: noop,
    tight_layout: noop,
    show: noop,
    savefig: noop,
    close: noop
  };
})();
"#;

/// Evaluate `code` against `table` and return the recorded commands.
///
/// Any throw inside the generated statements surfaces as
/// [`ChartError::Eval`] with the JavaScript error message, which is what
/// the synthesis layer reports when the fallback also fails.
pub fn execute(code: &str, table: &DataTable) -> Result<Vec<PlotCommand>> {
    let mut ctx = Context::default();

    ctx.eval(Source::from_bytes(PLT_SHIM))
        .map_err(|err| ChartError::Eval(format!("installing plot shim: {err}")))?;
    ctx.eval(Source::from_bytes(&df_script(table)))
        .map_err(|err| ChartError::Eval(format!("installing dataset: {err}")))?;

    ctx.eval(Source::from_bytes(code))
        .map_err(|err| ChartError::Eval(err.to_string()))?;

    let recorded = ctx
        .eval(Source::from_bytes("JSON.stringify(globalThis.__plot_commands)"))
        .map_err(|err| ChartError::Eval(format!("reading recorded commands: {err}")))?;
    let json = recorded
        .to_string(&mut ctx)
        .map_err(|err| ChartError::Eval(format!("reading recorded commands: {err}")))?
        .to_std_string_escaped();

    serde_json::from_str(&json)
        .map_err(|err| ChartError::Eval(format!("recorded commands were not valid: {err}")))
}

/// Script installing the dataset as `df`: one array per column keyed by
/// name, with `columns` carrying the authoritative column order and
/// `length` the row count. The metadata keys win over same-named data
/// columns. NaN and infinity arrive as `null`.
fn df_script(table: &DataTable) -> String {
    let mut frame = Map::new();
    for col in &table.columns {
        let values: Vec<Value> = col.values.iter().map(|c| c.to_json()).collect();
        frame.insert(col.name.clone(), Value::from(values));
    }
    let names: Vec<Value> = table
        .column_names()
        .into_iter()
        .map(Value::from)
        .collect();

    format!(
        "globalThis.df = {};\nglobalThis.df.columns = {};\nglobalThis.df.length = {};",
        Value::Object(frame),
        Value::from(names),
        table.n_rows,
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> DataTable {
        let csv = "alpha,beta\n1,10.5\n2,20.5\n3,30.5\n";
        DataTable::from_csv_reader("sample", csv.as_bytes()).expect("parse")
    }

    #[test]
    fn records_scatter_and_title() {
        let code = r#"
            plt.scatter(df["alpha"], df["beta"]);
            plt.title("Alpha vs Beta");
        "#;
        let commands = execute(code, &table()).expect("eval should pass");
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            PlotCommand::Scatter { x: vec![1.0, 2.0, 3.0], y: vec![10.5, 20.5, 30.5] }
        );
        assert_eq!(commands[1], PlotCommand::Title { text: "Alpha vs Beta".into() });
    }

    #[test]
    fn single_argument_plot_has_no_x() {
        let commands = execute("plt.plot(df[\"beta\"]);", &table()).expect("eval should pass");
        assert_eq!(
            commands[0],
            PlotCommand::Line { x: None, y: vec![10.5, 20.5, 30.5] }
        );
    }

    #[test]
    fn throwing_code_maps_to_eval_error() {
        let err = execute("throw new Error('boom')", &table()).expect_err("expected error");
        assert!(matches!(err, ChartError::Eval(ref msg) if msg.contains("boom")));
    }

    #[test]
    fn missing_column_access_throws() {
        let err = execute("plt.plot(df[\"nope\"]);", &table()).expect_err("expected error");
        assert!(matches!(err, ChartError::Eval(_)));
    }

    #[test]
    fn exposes_column_order_and_length() {
        let code = r#"
            plt.title(df.columns.join(",") + "/" + df.length);
        "#;
        let commands = execute(code, &table()).expect("eval should pass");
        assert_eq!(commands[0], PlotCommand::Title { text: "alpha,beta/3".into() });
    }

    #[test]
    fn metadata_keys_shadow_same_named_columns() {
        let csv = "columns,length\n9,9\n8,8\n";
        let t = DataTable::from_csv_reader("clash", csv.as_bytes()).expect("parse");
        let code = r#"
            plt.title(df.columns.join(",") + "/" + df.length);
        "#;
        let commands = execute(code, &t).expect("eval should pass");
        assert_eq!(commands[0], PlotCommand::Title { text: "columns,length/2".into() });
    }

    #[test]
    fn null_cells_are_dropped_pairwise() {
        let csv = "x,y\n1,5\n2,\n3,7\n";
        let t = DataTable::from_csv_reader("holes", csv.as_bytes()).expect("parse");
        let commands = execute("plt.scatter(df[\"x\"], df[\"y\"]);", &t).expect("eval");
        assert_eq!(
            commands[0],
            PlotCommand::Scatter { x: vec![1.0, 3.0], y: vec![5.0, 7.0] }
        );
    }

    #[test]
    fn figure_management_calls_are_tolerated() {
        let code = r#"
            plt.figure();
            plt.plot(df["alpha"]);
            plt.grid(true);
            plt.tight_layout();
            plt.show();
        "#;
        let commands = execute(code, &table()).expect("eval should pass");
        assert_eq!(commands.len(), 1);
    }
}
