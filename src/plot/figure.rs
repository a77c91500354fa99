// ---------------------------------------------------------------------------
// Declarative figures.
//
// A `Figure` holds everything a renderer needs (computed bars, curves,
// quartiles, colours) and nothing about pixels, so what a reporter plotted
// can be inspected without rasterizing.
// ---------------------------------------------------------------------------

use log::warn;
use plotters::style::RGBColor;

use crate::color::ColorMap;
use crate::data::model::CellValue;
use crate::stats::correlation::CorrelationMatrix;
use crate::stats::descriptive::{min_max, BoxStats, Quartiles};
use crate::stats::histogram::Histogram;
use crate::stats::kde::{Kde, GRID_SIZE};

/// Bandwidths added beyond the data range of a density curve.
pub const KDE_CUT: f64 = 3.0;

/// Violins are trimmed closer to the data than free-standing curves.
pub const VIOLIN_CUT: f64 = 2.0;

pub const DEFAULT_SIZE: (u32, u32) = (900, 600);

/// One coloured, labelled data series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    pub label: String,
    pub color: RGBColor,
    pub data: T,
}

/// KDE outline of one violin plus its quartile markers.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinBody {
    /// `(value, density)` pairs; empty when the group is degenerate.
    pub curve: Vec<(f64, f64)>,
    pub quartiles: Option<Quartiles>,
    /// Density at `q1`, median and `q3`, sizing the quartile lines.
    pub quartile_density: [f64; 3],
}

/// Observations of one label group in a pair grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PairGroup {
    /// `columns[v]` holds the values of variable `v`, row aligned.
    pub columns: Vec<Vec<f64>>,
    /// Density curve per variable (diagonal panels); empty when degenerate.
    pub diagonal: Vec<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FigureKind {
    /// Bars over shared `edges`; each series holds one height per bin.
    Histogram {
        edges: Vec<f64>,
        series: Vec<Series<Vec<f64>>>,
    },
    Violin {
        groups: Vec<Series<ViolinBody>>,
    },
    BoxPlot {
        groups: Vec<Series<BoxStats>>,
    },
    Scatter {
        series: Vec<Series<Vec<(f64, f64)>>>,
    },
    Pie {
        slices: Vec<Series<f64>>,
    },
    Bar {
        bars: Vec<Series<f64>>,
    },
    Heatmap {
        matrix: CorrelationMatrix,
        annotate: bool,
    },
    PairGrid {
        variables: Vec<String>,
        groups: Vec<Series<PairGroup>>,
        corner: bool,
    },
    Density {
        series: Vec<Series<Vec<(f64, f64)>>>,
        shade: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub size: (u32, u32),
    pub kind: FigureKind,
}

impl Figure {
    pub fn new(title: impl Into<String>, kind: FigureKind) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            size: DEFAULT_SIZE,
            kind,
        }
    }

    pub fn with_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = x.into();
        self.y_label = y.into();
        self
    }

    pub fn with_size(mut self, size: (u32, u32)) -> Self {
        self.size = size;
        self
    }
}

fn hue_label(colors: &ColorMap, value: &CellValue) -> String {
    format!("{}={value}", colors.column)
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Histogram split by label, bins shared across groups, each group's bars
/// normalized to sum to one. `None` if the feature has no values.
pub fn split_histogram(
    title: &str,
    feature: &str,
    groups: &[(CellValue, Vec<f64>)],
    colors: &ColorMap,
    bins: usize,
) -> Option<Figure> {
    let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    let edges = Histogram::edges_for(&all, bins)?;
    let series = groups
        .iter()
        .map(|(label, values)| Series {
            label: hue_label(colors, label),
            color: colors.color_for(label),
            data: Histogram::with_edges(values, edges.clone()).probabilities(),
        })
        .collect();
    Some(
        Figure::new(title, FigureKind::Histogram { edges, series })
            .with_labels(feature, "Probability"),
    )
}

/// Plain count histogram of one unsplit sample.
pub fn count_histogram(
    title: &str,
    feature: &str,
    values: &[f64],
    bins: usize,
    color: RGBColor,
) -> Option<Figure> {
    let histogram = Histogram::new(values, bins)?;
    let series = vec![Series {
        label: feature.to_string(),
        color,
        data: histogram.counts.iter().map(|&c| c as f64).collect(),
    }];
    Some(
        Figure::new(
            title,
            FigureKind::Histogram {
                edges: histogram.edges,
                series,
            },
        )
        .with_labels(feature, "Number of objects"),
    )
}

fn density_at(curve: &[(f64, f64)], x: f64) -> f64 {
    curve
        .windows(2)
        .find(|w| w[0].0 <= x && x <= w[1].0)
        .map(|w| {
            let span = w[1].0 - w[0].0;
            if span == 0.0 {
                w[0].1
            } else {
                w[0].1 + (w[1].1 - w[0].1) * (x - w[0].0) / span
            }
        })
        .unwrap_or(0.0)
}

/// One violin per label group with quartile lines inside the body.
pub fn violin(
    title: &str,
    feature: &str,
    groups: &[(CellValue, Vec<f64>)],
    colors: &ColorMap,
) -> Figure {
    let groups = groups
        .iter()
        .map(|(label, values)| {
            let curve = match Kde::new(values) {
                Some(kde) => kde.curve(VIOLIN_CUT, GRID_SIZE),
                None => {
                    warn!("{feature}: cannot estimate density for {}={label}", colors.column);
                    Vec::new()
                }
            };
            let quartiles = Quartiles::new(values);
            let quartile_density = quartiles
                .map(|q| [q.q1, q.median, q.q3].map(|x| density_at(&curve, x)))
                .unwrap_or([0.0; 3]);
            Series {
                label: label.to_string(),
                color: colors.color_for(label),
                data: ViolinBody {
                    curve,
                    quartiles,
                    quartile_density,
                },
            }
        })
        .collect();
    Figure::new(title, FigureKind::Violin { groups }).with_labels(colors.column.clone(), feature)
}

/// Box plot per label group; empty groups are dropped.
pub fn box_plot(
    title: &str,
    feature: &str,
    groups: &[(CellValue, Vec<f64>)],
    colors: &ColorMap,
) -> Figure {
    let groups = groups
        .iter()
        .filter_map(|(label, values)| {
            Some(Series {
                label: label.to_string(),
                color: colors.color_for(label),
                data: BoxStats::new(values)?,
            })
        })
        .collect();
    Figure::new(title, FigureKind::BoxPlot { groups }).with_labels(colors.column.clone(), feature)
}

pub fn scatter(
    title: &str,
    x: &str,
    y: &str,
    groups: &[(CellValue, Vec<(f64, f64)>)],
    colors: &ColorMap,
) -> Figure {
    let series = groups
        .iter()
        .map(|(label, points)| Series {
            label: hue_label(colors, label),
            color: colors.color_for(label),
            data: points.clone(),
        })
        .collect();
    Figure::new(title, FigureKind::Scatter { series }).with_labels(x, y)
}

pub fn pie(title: &str, counts: &[(CellValue, usize)], colors: &ColorMap) -> Figure {
    let slices = counts
        .iter()
        .map(|(label, count)| Series {
            label: label.to_string(),
            color: colors.color_for(label),
            data: *count as f64,
        })
        .collect();
    Figure::new(title, FigureKind::Pie { slices }).with_size((600, 600))
}

pub fn bar(title: &str, counts: &[(CellValue, usize)], colors: &ColorMap) -> Figure {
    let bars = counts
        .iter()
        .map(|(label, count)| Series {
            label: label.to_string(),
            color: colors.color_for(label),
            data: *count as f64,
        })
        .collect();
    Figure::new(title, FigureKind::Bar { bars }).with_labels(colors.column.clone(), "count")
}

pub fn heatmap(title: &str, matrix: CorrelationMatrix, annotate: bool) -> Figure {
    Figure::new(title, FigureKind::Heatmap { matrix, annotate }).with_size((1000, 800))
}

/// Pair grid over `variables`; `groups` hold row-aligned columns per label.
pub fn pair_grid(
    title: &str,
    variables: &[String],
    groups: Vec<(CellValue, Vec<Vec<f64>>)>,
    colors: &ColorMap,
    corner: bool,
) -> Figure {
    let groups = groups
        .into_iter()
        .map(|(label, columns)| {
            let diagonal = columns
                .iter()
                .map(|values| {
                    Kde::new(values)
                        .map(|kde| kde.curve(KDE_CUT, GRID_SIZE))
                        .unwrap_or_default()
                })
                .collect();
            Series {
                label: hue_label(colors, &label),
                color: colors.color_for(&label),
                data: PairGroup { columns, diagonal },
            }
        })
        .collect();
    Figure::new(
        title,
        FigureKind::PairGrid {
            variables: variables.to_vec(),
            groups,
            corner,
        },
    )
    .with_size((1000, 1000))
}

/// One density curve per label group, optionally shaded underneath.
pub fn density(
    title: &str,
    feature: &str,
    groups: &[(CellValue, Vec<f64>)],
    colors: &ColorMap,
    shade: bool,
) -> Figure {
    let series = groups
        .iter()
        .map(|(label, values)| {
            let curve = match Kde::new(values) {
                Some(kde) => kde.curve(KDE_CUT, GRID_SIZE),
                None => {
                    warn!("{feature}: cannot estimate density for {}={label}", colors.column);
                    Vec::new()
                }
            };
            Series {
                label: hue_label(colors, label),
                color: colors.color_for(label),
                data: curve,
            }
        })
        .collect();
    Figure::new(title, FigureKind::Density { series, shade }).with_labels(feature, "Density")
}

// ---------------------------------------------------------------------------
// Axis helpers shared by renderers
// ---------------------------------------------------------------------------

/// `[lo, hi]` widened by `frac` of its span on each side; unit span if flat.
pub fn padded_range(lo: f64, hi: f64, frac: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * frac;
    (lo - pad, hi + pad)
}

/// Padded range over every value yielded.
pub fn data_range(values: impl Iterator<Item = f64>, frac: f64) -> (f64, f64) {
    let values: Vec<f64> = values.collect();
    match min_max(&values) {
        Some((lo, hi)) => padded_range(lo, hi, frac),
        None => (0.0, 1.0),
    }
}
