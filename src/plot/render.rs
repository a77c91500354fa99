// ---------------------------------------------------------------------------
// Rasterizes `Figure`s into PNG files with the `plotters` bitmap backend.
//
// Every figure kind has its own drawing routine, generic over the backend.
// Text uses the backend's `sans-serif` family, so a system font must be
// discoverable at runtime.
// ---------------------------------------------------------------------------

use std::f64::consts::PI;
use std::fmt::Display;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;

use super::figure::{data_range, padded_range, Figure, FigureKind, PairGroup, Series, ViolinBody};
use crate::color::cool_warm;
use crate::stats::correlation::CorrelationMatrix;
use crate::stats::descriptive::BoxStats;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Turns a [`Figure`] into a file at `path`.
pub trait Renderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<()>;
}

/// PNG output through plotters' bitmap backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRenderer;

impl Renderer for BitmapRenderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, figure.size).into_drawing_area();
        root.fill(&WHITE).map_err(area_err)?;

        match &figure.kind {
            FigureKind::Histogram { edges, series } => draw_histogram(&root, figure, edges, series)?,
            FigureKind::Violin { groups } => draw_violin(&root, figure, groups)?,
            FigureKind::BoxPlot { groups } => draw_box_plot(&root, figure, groups)?,
            FigureKind::Scatter { series } => draw_scatter(&root, figure, series)?,
            FigureKind::Pie { slices } => draw_pie(&root, figure, slices)?,
            FigureKind::Bar { bars } => draw_bar(&root, figure, bars)?,
            FigureKind::Heatmap { matrix, annotate } => {
                draw_heatmap(&root, figure, matrix, *annotate)?
            }
            FigureKind::PairGrid {
                variables,
                groups,
                corner,
            } => draw_pair_grid(&root, figure, variables, groups, *corner)?,
            FigureKind::Density { series, shade } => draw_density(&root, figure, series, *shade)?,
        }

        // Ensure everything is properly rendered and saved
        root.present().map_err(draw_err)?;
        Ok(())
    }
}

fn area_err<E: Display>(e: E) -> PlotError {
    PlotError::DrawingArea(e.to_string())
}

fn chart_err<E: Display>(e: E) -> PlotError {
    PlotError::ChartConfig(e.to_string())
}

fn draw_err<E: Display>(e: E) -> PlotError {
    PlotError::Drawing(e.to_string())
}

const TITLE_FONT: (&str, u32) = ("sans-serif", 26);
const LABEL_FONT: (&str, u32) = ("sans-serif", 16);

/// Tick label for categorical axes drawn at integer positions.
fn category_label(names: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

fn centered(size: u32) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    edges: &[f64],
    series: &[Series<Vec<f64>>],
) -> Result<()> {
    let (Some(&x0), Some(&x1)) = (edges.first(), edges.last()) else {
        return Err(PlotError::InvalidData("histogram has no bins".to_string()));
    };
    let y_max = series
        .iter()
        .flat_map(|s| s.data.iter().copied())
        .fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    let alpha = if series.len() > 1 { 0.5 } else { 0.85 };

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, 0.0..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(draw_err)?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(edges.windows(2).zip(&s.data).map(|(w, &h)| {
                Rectangle::new([(w[0], 0.0), (w[1], h)], color.mix(alpha).filled())
            }))
            .map_err(draw_err)?
            .label(&s.label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.mix(alpha).filled())
            });
        chart
            .draw_series(edges.windows(2).zip(&s.data).map(|(w, &h)| {
                Rectangle::new([(w[0], 0.0), (w[1], h)], color.stroke_width(1))
            }))
            .map_err(draw_err)?;
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Violin
// ---------------------------------------------------------------------------

/// Half-width of a violin or box at its widest point, in category units.
const HALF_WIDTH: f64 = 0.4;

fn draw_violin<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    groups: &[Series<ViolinBody>],
) -> Result<()> {
    let names: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let (y0, y1) = data_range(
        groups.iter().flat_map(|g| {
            g.data.curve.iter().map(|p| p.0).chain(
                g.data
                    .quartiles
                    .iter()
                    .flat_map(|q| [q.q1, q.median, q.q3]),
            )
        }),
        0.05,
    );
    // Shared scale keeps equal-area bodies comparable across groups.
    let d_max = groups
        .iter()
        .flat_map(|g| g.data.curve.iter().map(|p| p.1))
        .fold(0.0f64, f64::max);
    let scale = if d_max > 0.0 { HALF_WIDTH / d_max } else { 0.0 };

    let x_max = groups.len().max(1) as f64 - 0.5;
    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..x_max, y0..y1)
        .map_err(chart_err)?;

    let fmt = |x: &f64| category_label(&names, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len().max(1))
        .x_label_formatter(&fmt)
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(draw_err)?;

    for (i, group) in groups.iter().enumerate() {
        let c = i as f64;
        let body = &group.data;

        if !body.curve.is_empty() {
            let mut outline: Vec<(f64, f64)> =
                body.curve.iter().map(|&(v, d)| (c + d * scale, v)).collect();
            outline.extend(body.curve.iter().rev().map(|&(v, d)| (c - d * scale, v)));
            chart
                .draw_series(std::iter::once(Polygon::new(
                    outline.clone(),
                    group.color.mix(0.7).filled(),
                )))
                .map_err(draw_err)?;
            outline.push(outline[0]);
            chart
                .draw_series(std::iter::once(PathElement::new(outline, BLACK.stroke_width(1))))
                .map_err(draw_err)?;
        }

        if let Some(q) = body.quartiles {
            let lines = [q.q1, q.median, q.q3]
                .into_iter()
                .zip(body.quartile_density)
                .enumerate()
                .map(|(k, (value, density))| {
                    let half = if scale > 0.0 { density * scale } else { HALF_WIDTH };
                    let width = if k == 1 { 2 } else { 1 };
                    PathElement::new(
                        vec![(c - half, value), (c + half, value)],
                        BLACK.stroke_width(width),
                    )
                });
            chart.draw_series(lines).map_err(draw_err)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

fn draw_box_plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    groups: &[Series<BoxStats>],
) -> Result<()> {
    let names: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
    let (y0, y1) = data_range(
        groups.iter().flat_map(|g| {
            [g.data.whisker_low, g.data.whisker_high]
                .into_iter()
                .chain(g.data.outliers.iter().copied())
        }),
        0.05,
    );

    let x_max = groups.len().max(1) as f64 - 0.5;
    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5..x_max, y0..y1)
        .map_err(chart_err)?;

    let fmt = |x: &f64| category_label(&names, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len().max(1))
        .x_label_formatter(&fmt)
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(draw_err)?;

    let half = HALF_WIDTH * 0.8;
    for (i, group) in groups.iter().enumerate() {
        let c = i as f64;
        let stats = &group.data;
        let q = stats.quartiles;

        chart
            .draw_series([
                Rectangle::new([(c - half, q.q1), (c + half, q.q3)], group.color.mix(0.8).filled()),
                Rectangle::new([(c - half, q.q1), (c + half, q.q3)], BLACK.stroke_width(1)),
            ])
            .map_err(draw_err)?;

        chart
            .draw_series([
                PathElement::new(vec![(c - half, q.median), (c + half, q.median)], BLACK.stroke_width(2)),
                PathElement::new(vec![(c, q.q3), (c, stats.whisker_high)], BLACK.stroke_width(1)),
                PathElement::new(vec![(c, q.q1), (c, stats.whisker_low)], BLACK.stroke_width(1)),
                PathElement::new(
                    vec![(c - half / 2.0, stats.whisker_high), (c + half / 2.0, stats.whisker_high)],
                    BLACK.stroke_width(1),
                ),
                PathElement::new(
                    vec![(c - half / 2.0, stats.whisker_low), (c + half / 2.0, stats.whisker_low)],
                    BLACK.stroke_width(1),
                ),
            ])
            .map_err(draw_err)?;

        chart
            .draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((c, v), 3, BLACK.stroke_width(1))),
            )
            .map_err(draw_err)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    series: &[Series<Vec<(f64, f64)>>],
) -> Result<()> {
    let (x0, x1) = data_range(series.iter().flat_map(|s| s.data.iter().map(|p| p.0)), 0.05);
    let (y0, y1) = data_range(series.iter().flat_map(|s| s.data.iter().map(|p| p.1)), 0.05);

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(draw_err)?;

    for s in series {
        let color = s.color;
        chart
            .draw_series(
                s.data
                    .iter()
                    .map(|&p| Circle::new(p, 3, color.mix(0.7).filled())),
            )
            .map_err(draw_err)?
            .label(&s.label)
            .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    slices: &[Series<f64>],
) -> Result<()> {
    let total: f64 = slices.iter().map(|s| s.data).sum();
    if total <= 0.0 {
        return Err(PlotError::InvalidData("pie chart has no observations".to_string()));
    }

    let area = root.titled(&figure.title, TITLE_FONT).map_err(area_err)?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = w.min(h) as f64 * 0.38;
    let at = |angle: f64, r: f64| {
        (
            (center.0 + r * angle.cos()).round() as i32,
            (center.1 - r * angle.sin()).round() as i32,
        )
    };

    // Counter-clockwise from three o'clock.
    let mut start = 0.0f64;
    for slice in slices {
        let sweep = slice.data / total * 2.0 * PI;
        let steps = ((sweep.to_degrees()).ceil() as usize).max(2);
        let mut wedge = vec![at(0.0, 0.0)];
        wedge.extend((0..=steps).map(|k| at(start + sweep * k as f64 / steps as f64, radius)));
        area.draw(&Polygon::new(wedge, slice.color.filled()))
            .map_err(draw_err)?;

        let mid = start + sweep / 2.0;
        let pct = slice.data / total * 100.0;
        area.draw(&Text::new(format!("{pct:.1}%"), at(mid, radius * 0.6), centered(20)))
            .map_err(draw_err)?;
        area.draw(&Text::new(slice.label.clone(), at(mid, radius * 1.12), centered(20)))
            .map_err(draw_err)?;
        start += sweep;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Bar
// ---------------------------------------------------------------------------

fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    bars: &[Series<f64>],
) -> Result<()> {
    let names: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    let y_max = bars.iter().map(|b| b.data).fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    let x_max = bars.len().max(1) as f64 - 0.5;
    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5..x_max, 0.0..y_max)
        .map_err(chart_err)?;

    let fmt = |x: &f64| category_label(&names, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len().max(1))
        .x_label_formatter(&fmt)
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, b)| {
            let c = i as f64;
            Rectangle::new([(c - HALF_WIDTH, 0.0), (c + HALF_WIDTH, b.data)], b.color.filled())
        }))
        .map_err(draw_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    matrix: &CorrelationMatrix,
    annotate: bool,
) -> Result<()> {
    if matrix.is_empty() {
        return Err(PlotError::InvalidData("correlation matrix is empty".to_string()));
    }
    let n = matrix.len();
    let top = n as f64 - 0.5;
    let (w, _) = root.dim_in_pixel();
    let (main, legend) = root.split_horizontally((w as i32 - 120).max(1));

    let mut chart = ChartBuilder::on(&main)
        .caption(&figure.title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(140)
        .y_label_area_size(140)
        .build_cartesian_2d(-0.5..top, -0.5..top)
        .map_err(chart_err)?;

    // Row 0 is drawn at the top.
    let x_fmt = |x: &f64| category_label(&matrix.labels, *x);
    let y_fmt = |y: &f64| category_label(&matrix.labels, top - 0.5 - *y);
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
        .y_label_style(("sans-serif", 13))
        .draw()
        .map_err(draw_err)?;

    let row_y = |i: usize| (n - 1 - i) as f64;
    chart
        .draw_series((0..n).flat_map(|i| {
            (0..n).map(move |j| (i, j))
        }).map(|(i, j)| {
            let (x, y) = (j as f64, row_y(i));
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                cool_warm(matrix.values[i][j]).filled(),
            )
        }))
        .map_err(draw_err)?;

    if annotate {
        let size = (260 / n as u32).clamp(9, 18);
        chart
            .draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| {
                let r = matrix.values[i][j];
                let color: &'static RGBColor = if r.abs() > 0.6 { &WHITE } else { &BLACK };
                Text::new(
                    format!("{r:.2}"),
                    (j as f64, row_y(i)),
                    centered(size).color(color),
                )
            }))
            .map_err(draw_err)?;
    }

    // Colour bar
    let mut bar = ChartBuilder::on(&legend)
        .margin_top(60)
        .margin_bottom(155)
        .margin_right(20)
        .y_label_area_size(45)
        .build_cartesian_2d(0.0..1.0, -1.0..1.0)
        .map_err(chart_err)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .label_style(("sans-serif", 13))
        .draw()
        .map_err(draw_err)?;
    bar.draw_series((0..100).map(|k| {
        let lo = -1.0 + k as f64 * 0.02;
        Rectangle::new([(0.0, lo), (1.0, lo + 0.02)], cool_warm(lo + 0.01).filled())
    }))
    .map_err(draw_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Pair grid
// ---------------------------------------------------------------------------

fn draw_pair_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    variables: &[String],
    groups: &[Series<PairGroup>],
    corner: bool,
) -> Result<()> {
    let n = variables.len();
    if n == 0 {
        return Err(PlotError::InvalidData("pair grid has no variables".to_string()));
    }
    let area = root.titled(&figure.title, TITLE_FONT).map_err(area_err)?;
    let panels = area.split_evenly((n, n));

    let ranges: Vec<(f64, f64)> = (0..n)
        .map(|v| data_range(groups.iter().flat_map(|g| g.data.columns[v].iter().copied()), 0.05))
        .collect();

    for (idx, panel) in panels.iter().enumerate() {
        let (row, col) = (idx / n, idx % n);
        if corner && col > row {
            continue;
        }
        let x_desc = if row == n - 1 { variables[col].as_str() } else { "" };
        let (x0, x1) = ranges[col];

        if row == col {
            let d_max = groups
                .iter()
                .flat_map(|g| g.data.diagonal[col].iter().map(|p| p.1))
                .fold(0.0f64, f64::max);
            let (_, d_top) = padded_range(0.0, d_max, 0.05);
            let mut chart = ChartBuilder::on(panel)
                .margin(6)
                .x_label_area_size(35)
                .y_label_area_size(55)
                .build_cartesian_2d(x0..x1, 0.0..d_top)
                .map_err(chart_err)?;
            chart
                .configure_mesh()
                .x_labels(4)
                .y_labels(4)
                .x_desc(x_desc)
                .y_desc(if col == 0 { variables[row].as_str() } else { "" })
                .label_style(("sans-serif", 11))
                .draw()
                .map_err(draw_err)?;
            for g in groups {
                let color = g.color;
                chart
                    .draw_series(LineSeries::new(
                        g.data.diagonal[col].iter().copied(),
                        color.stroke_width(2),
                    ))
                    .map_err(draw_err)?
                    .label(&g.label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], color.stroke_width(2)));
            }
            if row == 0 {
                chart
                    .configure_series_labels()
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .label_font(("sans-serif", 11))
                    .draw()
                    .map_err(draw_err)?;
            }
        } else {
            let (y0, y1) = ranges[row];
            let mut chart = ChartBuilder::on(panel)
                .margin(6)
                .x_label_area_size(35)
                .y_label_area_size(55)
                .build_cartesian_2d(x0..x1, y0..y1)
                .map_err(chart_err)?;
            chart
                .configure_mesh()
                .x_labels(4)
                .y_labels(4)
                .x_desc(x_desc)
                .y_desc(if col == 0 { variables[row].as_str() } else { "" })
                .label_style(("sans-serif", 11))
                .draw()
                .map_err(draw_err)?;
            for g in groups {
                let color = g.color;
                let xs = &g.data.columns[col];
                let ys = &g.data.columns[row];
                chart
                    .draw_series(
                        xs.iter()
                            .zip(ys)
                            .map(|(&x, &y)| Circle::new((x, y), 2, color.mix(0.6).filled())),
                    )
                    .map_err(draw_err)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Density curves
// ---------------------------------------------------------------------------

fn draw_density<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    series: &[Series<Vec<(f64, f64)>>],
    shade: bool,
) -> Result<()> {
    let (x0, x1) = data_range(series.iter().flat_map(|s| s.data.iter().map(|p| p.0)), 0.0);
    let d_max = series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.1))
        .fold(0.0f64, f64::max);
    let (_, y1) = padded_range(0.0, d_max, 0.05);

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, TITLE_FONT)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, 0.0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(LABEL_FONT)
        .draw()
        .map_err(draw_err)?;

    for s in series.iter().filter(|s| !s.data.is_empty()) {
        let color = s.color;
        if shade {
            let mut fill = s.data.clone();
            if let (Some(&(first, _)), Some(&(last, _))) = (s.data.first(), s.data.last()) {
                fill.push((last, 0.0));
                fill.push((first, 0.0));
            }
            chart
                .draw_series(std::iter::once(Polygon::new(fill, color.mix(0.25).filled())))
                .map_err(draw_err)?;
        }
        chart
            .draw_series(LineSeries::new(s.data.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err)?
            .label(&s.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMap;
    use crate::data::model::CellValue;
    use crate::plot::figure;
    use crate::stats::correlation::CorrelationMatrix;

    #[test]
    fn category_labels_only_at_integer_ticks() {
        let names = vec!["0".to_string(), "1".to_string()];
        assert_eq!(category_label(&names, 0.0), "0");
        assert_eq!(category_label(&names, 1.0), "1");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, -1.0), "");
        assert_eq!(category_label(&names, 2.0), "");
    }

    #[test]
    fn empty_histogram_is_rejected_before_drawing() {
        let dir = tempfile::tempdir().unwrap();
        let fig = Figure::new(
            "empty",
            FigureKind::Histogram {
                edges: Vec::new(),
                series: Vec::new(),
            },
        );
        let result = BitmapRenderer.render(&fig, &dir.path().join("empty.png"));
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn renders_every_figure_kind() {
        let dir = tempfile::tempdir().unwrap();
        let colors = ColorMap::new("Target", &[CellValue::Integer(0), CellValue::Integer(1)]);
        let groups = vec![
            (CellValue::Integer(0), vec![1.0, 2.0, 2.5, 4.0]),
            (CellValue::Integer(1), vec![3.0, 3.5, 5.0, 6.0]),
        ];
        let counts = vec![(CellValue::Integer(0), 4), (CellValue::Integer(1), 4)];
        let pairs = vec![
            (CellValue::Integer(0), vec![(1.0, 10.0), (2.0, 12.5)]),
            (CellValue::Integer(1), vec![(3.0, 9.0), (5.0, 14.0)]),
        ];
        // A constant column leaves its correlations undefined.
        let matrix = CorrelationMatrix {
            labels: vec!["Area".to_string(), "Target".to_string()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
        };
        let variables = vec!["Area".to_string(), "Perimeter".to_string()];
        let columns = vec![
            (CellValue::Integer(0), vec![vec![1.0, 2.0, 2.5], vec![10.0, 12.5, 11.0]]),
            (CellValue::Integer(1), vec![vec![3.0, 5.0, 6.0], vec![9.0, 14.0, 15.5]]),
        ];
        let figures = vec![
            figure::split_histogram("hist", "Area", &groups, &colors, 30).unwrap(),
            figure::violin("violin", "Area", &groups, &colors),
            figure::box_plot("box", "Area", &groups, &colors),
            figure::pie("pie", &counts, &colors),
            figure::bar("bar", &counts, &colors),
            figure::density("kde", "Area", &groups, &colors, true),
            figure::scatter("scatter", "Area", "Perimeter", &pairs, &colors),
            figure::heatmap("heatmap", matrix, true),
            figure::pair_grid("pairs", &variables, columns.clone(), &colors, false),
            figure::pair_grid("corner", &variables, columns, &colors, true),
        ];

        for (i, fig) in figures.iter().enumerate() {
            let path = dir.path().join(format!("{i}.png"));
            BitmapRenderer.render(fig, &path).unwrap();
            assert!(path.exists());
        }
    }
}
