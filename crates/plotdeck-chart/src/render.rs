//! Replays recorded commands onto a fresh bitmap drawing area.
//!
//! Text rendering needs a registered font. A system TTF is registered
//! once, best effort; when none is found, or the styled pass fails, the
//! chart is drawn again without caption or axis text so the request
//! still produces an artifact.

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use tracing::warn;

use crate::command::PlotCommand;
use crate::error::ChartError;
use crate::Result;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const SERIES_COLORS: [RGBColor; 3] = [BLUE, RED, GREEN];
const DEFAULT_HIST_BINS: u32 = 10;

static FONT_READY: OnceLock<bool> = OnceLock::new();

const FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
];

fn fonts_ready() -> bool {
    *FONT_READY.get_or_init(|| {
        for candidate in FONT_CANDIDATES {
            if let Ok(bytes) = std::fs::read(candidate) {
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                if register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                    return true;
                }
            }
        }
        warn!("no usable system font found, charts will render without text");
        false
    })
}

/// Render `commands` to a PNG at `path`.
///
/// Fails with [`ChartError::Render`] when no series command was recorded
/// or every recorded series is empty; the synthesis layer treats that
/// like an evaluation failure and falls back.
pub fn render(commands: &[PlotCommand], path: &Path) -> Result<()> {
    let labels = Labels::collect(commands);
    let shapes = build_shapes(commands);
    if shapes.is_empty() {
        return Err(ChartError::Render("no drawable series recorded".into()));
    }
    let (x_bounds, y_bounds) = bounds(&shapes)
        .ok_or_else(|| ChartError::Render("recorded series have no finite points".into()))?;
    let x_range = pad(x_bounds);
    let y_range = pad(y_bounds);

    if fonts_ready() {
        match draw(path, &shapes, &labels, x_range.clone(), y_range.clone(), true) {
            Ok(()) => return Ok(()),
            Err(err) => warn!(error = %err, "styled render failed, retrying without text"),
        }
    }
    draw(path, &shapes, &labels, x_range, y_range, false)
        .map_err(|err| ChartError::Render(err.to_string()))
}

#[derive(Debug, Default)]
struct Labels {
    title: Option<String>,
    xlabel: Option<String>,
    ylabel: Option<String>,
}

impl Labels {
    /// Last call wins, as with repeated styling calls on one figure.
    fn collect(commands: &[PlotCommand]) -> Self {
        let mut labels = Labels::default();
        for cmd in commands {
            match cmd {
                PlotCommand::Title { text } => labels.title = Some(text.clone()),
                PlotCommand::Xlabel { text } => labels.xlabel = Some(text.clone()),
                PlotCommand::Ylabel { text } => labels.ylabel = Some(text.clone()),
                _ => {}
            }
        }
        labels
    }
}

/// Drawable geometry in data coordinates.
enum Shape {
    Line(Vec<(f64, f64)>),
    Points(Vec<(f64, f64)>),
    /// `(x0, x1, height)` rectangles rising from the zero baseline.
    Bars(Vec<(f64, f64, f64)>),
}

fn build_shapes(commands: &[PlotCommand]) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for cmd in commands {
        match cmd {
            PlotCommand::Scatter { x, y } => {
                shapes.push(Shape::Points(x.iter().copied().zip(y.iter().copied()).collect()));
            }
            PlotCommand::Line { x, y } => {
                let points = match x {
                    Some(x) => x.iter().copied().zip(y.iter().copied()).collect(),
                    None => y.iter().copied().enumerate().map(|(i, v)| (i as f64, v)).collect(),
                };
                shapes.push(Shape::Line(points));
            }
            PlotCommand::Bar { values, .. } => {
                let bars = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| (i as f64 + 0.1, i as f64 + 0.9, v))
                    .collect();
                shapes.push(Shape::Bars(bars));
            }
            PlotCommand::Hist { values, bins } => {
                shapes.push(histogram_bars(values, bins.unwrap_or(DEFAULT_HIST_BINS)));
            }
            _ => {}
        }
    }
    shapes
}

fn histogram_bars(values: &[f64], bins: u32) -> Shape {
    let bins = bins.max(1) as usize;
    let Some((min, max)) = min_max(values) else {
        return Shape::Bars(Vec::new());
    };
    if min == max {
        return Shape::Bars(vec![(min - 0.5, min + 0.5, values.len() as f64)]);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let bars = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| (min + i as f64 * width, min + (i + 1) as f64 * width, c as f64))
        .collect();
    Shape::Bars(bars)
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut range = None;
    for &v in values {
        grow(&mut range, v);
    }
    range
}

fn grow(range: &mut Option<(f64, f64)>, v: f64) {
    match range {
        Some((lo, hi)) => {
            if v < *lo {
                *lo = v;
            }
            if v > *hi {
                *hi = v;
            }
        }
        None => *range = Some((v, v)),
    }
}

fn bounds(shapes: &[Shape]) -> Option<((f64, f64), (f64, f64))> {
    let mut x = None;
    let mut y = None;
    for shape in shapes {
        match shape {
            Shape::Line(points) | Shape::Points(points) => {
                for &(px, py) in points {
                    grow(&mut x, px);
                    grow(&mut y, py);
                }
            }
            Shape::Bars(bars) => {
                for &(x0, x1, h) in bars {
                    grow(&mut x, x0);
                    grow(&mut x, x1);
                    grow(&mut y, 0.0);
                    grow(&mut y, h);
                }
            }
        }
    }
    Some((x?, y?))
}

/// Degenerate ranges get a half-unit of slack, others a 5% margin.
fn pad((lo, hi): (f64, f64)) -> Range<f64> {
    if lo == hi {
        return (lo - 0.5)..(hi + 0.5);
    }
    let margin = (hi - lo) * 0.05;
    (lo - margin)..(hi + margin)
}

fn draw(
    path: &Path,
    shapes: &[Shape],
    labels: &Labels,
    x_range: Range<f64>,
    y_range: Range<f64>,
    styled: bool,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    if styled {
        builder
            .caption(labels.title.as_deref().unwrap_or(""), ("sans-serif", 28))
            .x_label_area_size(40)
            .y_label_area_size(50);
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    if styled {
        chart
            .configure_mesh()
            .x_desc(labels.xlabel.as_deref().unwrap_or(""))
            .y_desc(labels.ylabel.as_deref().unwrap_or(""))
            .draw()?;
    }

    for (i, shape) in shapes.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        match shape {
            Shape::Line(points) => {
                chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
            }
            Shape::Points(points) => {
                chart.draw_series(
                    points.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
                )?;
            }
            Shape::Bars(bars) => {
                chart.draw_series(bars.iter().map(|&(x0, x1, h)| {
                    Rectangle::new([(x0, 0.0), (x1, h)], color.filled())
                }))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
