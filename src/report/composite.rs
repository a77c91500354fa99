// ---------------------------------------------------------------------------
// Task4: the fixed battery of composite figures, one file per
// `CompositeSpec` entry.
// ---------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use super::summary::value_counts;
use super::{file_stem, label_groups, render_to};
use crate::color::ColorMap;
use crate::config::{CompositeSpec, ReportConfig};
use crate::data::filter::{split_numeric, split_pairs, LabelGroups};
use crate::data::model::{CellValue, DataError, Dataset};
use crate::plot::figure::{self, Figure};
use crate::plot::Renderer;
use crate::stats::correlation::CorrelationMatrix;

/// Per label group, the rows where every variable is present, as columns.
fn complete_rows(
    dataset: &Dataset,
    variables: &[String],
    groups: &LabelGroups,
) -> Result<Vec<(CellValue, Vec<Vec<f64>>)>, DataError> {
    let rows: Vec<Vec<Option<f64>>> = variables
        .iter()
        .map(|v| dataset.numeric_rows(v))
        .collect::<Result<_, _>>()?;

    Ok(groups
        .iter()
        .map(|(label, indices)| {
            let mut columns = vec![Vec::with_capacity(indices.len()); variables.len()];
            for &i in indices {
                let row: Option<Vec<f64>> = rows.iter().map(|r| r[i]).collect();
                if let Some(row) = row {
                    for (column, value) in columns.iter_mut().zip(row) {
                        column.push(value);
                    }
                }
            }
            (label.clone(), columns)
        })
        .collect())
}

/// Build the figure described by one entry.
pub fn build_figure(
    spec: &CompositeSpec,
    dataset: &Dataset,
    config: &ReportConfig,
    groups: &LabelGroups,
    colors: &ColorMap,
) -> Result<Figure, DataError> {
    for column in spec.columns() {
        dataset.column(column)?;
    }
    let target = colors.column.as_str();
    let size = config.figure_size;

    let figure = match spec {
        CompositeSpec::ClassPie { .. } => {
            let counts = value_counts(dataset, target)?;
            figure::pie(&format!("{target} distribution"), &counts, colors)
        }
        CompositeSpec::ClassBar { .. } => {
            let counts: Vec<(CellValue, usize)> = groups
                .iter()
                .map(|(label, rows)| (label.clone(), rows.len()))
                .collect();
            figure::bar(&format!("{target} class counts"), &counts, colors).with_size(size)
        }
        CompositeSpec::BoxPlot { feature, .. } => {
            let split = split_numeric(dataset, feature, groups)?;
            figure::box_plot(&format!("Boxplot: {feature} vs {target}"), feature, &split, colors)
                .with_size(size)
        }
        CompositeSpec::Scatter { x, y, .. } => {
            let split = split_pairs(dataset, x, y, groups)?;
            figure::scatter(&format!("Scatterplot: {x} vs {y}"), x, y, &split, colors)
                .with_size(size)
        }
        CompositeSpec::CorrelationHeatmap { .. } => {
            let matrix = CorrelationMatrix::from_dataset(dataset, &dataset.numeric_column_names())?;
            figure::heatmap("Feature correlation matrix", matrix, config.annotate_heatmap)
        }
        CompositeSpec::PairGrid { features, .. } => {
            let columns = complete_rows(dataset, features, groups)?;
            let title = format!("Pair plot: {}", features.join(", "));
            figure::pair_grid(&title, features, columns, colors, config.pairgrid_corner)
        }
        CompositeSpec::Violin { feature, .. } => {
            let split = split_numeric(dataset, feature, groups)?;
            figure::violin(&format!("Violinplot: {feature} vs {target}"), feature, &split, colors)
                .with_size(size)
        }
        CompositeSpec::Kde { feature, .. } => {
            let split = split_numeric(dataset, feature, groups)?;
            figure::density(&format!("KDE: {feature} by class"), feature, &split, colors, true)
                .with_size(size)
        }
    };
    Ok(figure)
}

pub fn run(
    dataset: &Dataset,
    config: &ReportConfig,
    renderer: &dyn Renderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let (groups, colors) = label_groups(dataset, &config.label.target_column)?;

    let mut written = Vec::with_capacity(config.composite.len());
    for spec in &config.composite {
        let figure = build_figure(spec, dataset, config, &groups, &colors)
            .with_context(|| format!("building composite figure '{}'", spec.file()))?;
        written.push(render_to(renderer, &figure, out_dir, &file_stem(spec.file()))?);
    }

    info!("Composite plots: {} written to {}", written.len(), out_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;

    use super::*;
    use crate::data::model::Column;
    use crate::plot::figure::FigureKind;
    use crate::plot::testing::RecordingRenderer;

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::from_f64(
                "Area",
                &[56276.0, 76631.0, 71623.0, 66458.0, 66107.0, 73191.0, 73338.0, 69692.0],
            ),
            Column::from_f64(
                "Perimeter",
                &[888.242, 1068.146, 1082.987, 992.051, 998.146, 1041.46, 1020.055, 1049.108],
            ),
            Column::from_f64(
                "Solidity",
                &[0.9902, 0.9916, 0.9851, 0.9918, 0.9901, 0.9947, 0.9899, 0.9919],
            ),
            Column::from_f64(
                "Compactness",
                &[0.7331, 0.6640, 0.6208, 0.7085, 0.6767, 0.7051, 0.6785, 0.6570],
            ),
            Column::from_f64(
                "Aspect_Ration",
                &[1.4809, 1.8133, 2.0303, 1.6031, 1.7307, 1.6148, 1.7386, 1.8403],
            ),
            Column::new(
                "Class",
                ["A", "A", "A", "A", "B", "B", "B", "B"]
                    .iter()
                    .map(|s| CellValue::String(s.to_string()))
                    .collect(),
            ),
            Column::new(
                "Target",
                [1, 0, 1, 0, 1, 0, 1, 0].iter().map(|&t| CellValue::Integer(t)).collect(),
            ),
        ])
        .unwrap()
    }

    fn listing(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn writes_exactly_ten_files() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let written = run(&dataset(), &ReportConfig::default(), &renderer, dir.path()).unwrap();

        assert_eq!(written.len(), 10);
        let expected: BTreeSet<String> = [
            "pie_target",
            "bar_target",
            "box_area",
            "box_perimeter",
            "scatter_area_perimeter",
            "scatter_compactness_solidity",
            "heatmap_corr",
            "pairplot",
            "violin_solidity",
            "kde_aspect_ratio",
        ]
        .iter()
        .map(|s| format!("{s}.png"))
        .collect();
        assert_eq!(listing(dir.path()), expected);
    }

    #[test]
    fn rerun_keeps_file_set_and_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();
        let config = ReportConfig::default();

        run(&dataset(), &config, &RecordingRenderer::default(), dir.path()).unwrap();
        let first = listing(dir.path());
        run(&dataset(), &config, &RecordingRenderer::default(), dir.path()).unwrap();

        assert_eq!(listing(dir.path()), first);
        assert_eq!(first.len(), 11);
        assert_eq!(fs::read_to_string(dir.path().join("notes.txt")).unwrap(), "keep me");
    }

    #[test]
    fn figures_consume_their_named_columns() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        run(&dataset(), &ReportConfig::default(), &renderer, dir.path()).unwrap();

        let area = renderer.figure("box_area.png").unwrap();
        assert_eq!((area.x_label.as_str(), area.y_label.as_str()), ("Target", "Area"));

        let scatter = renderer.figure("scatter_compactness_solidity.png").unwrap();
        assert_eq!(scatter.x_label, "Compactness");
        assert_eq!(scatter.y_label, "Solidity");

        let kde = renderer.figure("kde_aspect_ratio.png").unwrap();
        assert_eq!(kde.x_label, "Aspect_Ration");
        let FigureKind::Density { series, shade } = kde.kind else {
            panic!("expected density");
        };
        assert!(shade);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].label, "Target=1");

        let pair = renderer.figure("pairplot.png").unwrap();
        let FigureKind::PairGrid { variables, groups, corner } = pair.kind else {
            panic!("expected pair grid");
        };
        assert_eq!(variables, vec!["Area", "Perimeter", "Solidity"]);
        assert_eq!(groups.len(), 2);
        assert!(!corner);
    }

    #[test]
    fn corner_setting_reaches_the_pair_grid() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let config = ReportConfig {
            pairgrid_corner: true,
            ..ReportConfig::default()
        };
        run(&dataset(), &config, &renderer, dir.path()).unwrap();

        let FigureKind::PairGrid { corner, .. } = renderer.figure("pairplot.png").unwrap().kind
        else {
            panic!("expected pair grid");
        };
        assert!(corner);
    }

    #[test]
    fn heatmap_covers_numeric_columns_including_target() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let config = ReportConfig {
            annotate_heatmap: true,
            ..ReportConfig::default()
        };
        run(&dataset(), &config, &renderer, dir.path()).unwrap();

        let FigureKind::Heatmap { matrix, annotate } = renderer.figure("heatmap_corr.png").unwrap().kind
        else {
            panic!("expected heatmap");
        };
        assert!(annotate);
        assert_eq!(
            matrix.labels,
            vec!["Area", "Perimeter", "Solidity", "Compactness", "Aspect_Ration", "Target"]
        );
        assert!((matrix.values[0][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pie_orders_slices_by_count() {
        let ds = Dataset::from_columns(vec![Column::new(
            "Target",
            [0, 1, 1].iter().map(|&t| CellValue::Integer(t)).collect(),
        )])
        .unwrap();
        let config = ReportConfig::default();
        let (groups, colors) = label_groups(&ds, "Target").unwrap();
        let spec = CompositeSpec::ClassPie {
            file: "pie_target".to_string(),
        };
        let FigureKind::Pie { slices } = build_figure(&spec, &ds, &config, &groups, &colors)
            .unwrap()
            .kind
        else {
            panic!("expected pie");
        };
        assert_eq!(slices[0].label, "1");
        assert_eq!(slices[0].data, 2.0);
    }

    #[test]
    fn missing_named_column_aborts() {
        let ds = dataset();
        let columns: Vec<Column> = ds
            .columns()
            .iter()
            .filter(|c| c.name != "Compactness")
            .cloned()
            .collect();
        let ds = Dataset::from_columns(columns).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = run(&ds, &ReportConfig::default(), &RecordingRenderer::default(), dir.path())
            .unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("scatter_compactness_solidity"), "{chain}");
        assert!(chain.contains("Compactness"), "{chain}");
    }

    #[test]
    fn pair_grid_rows_need_every_variable() {
        let ds = Dataset::from_columns(vec![
            Column::new(
                "A",
                vec![CellValue::Float(1.5), CellValue::Null, CellValue::Float(3.5)],
            ),
            Column::from_f64("B", &[4.5, 5.5, 6.5]),
            Column::new("Target", vec![CellValue::Integer(0); 3]),
        ])
        .unwrap();
        let groups = crate::data::filter::group_indices(&ds, "Target").unwrap();
        let vars = vec!["A".to_string(), "B".to_string()];
        let rows = complete_rows(&ds, &vars, &groups).unwrap();
        assert_eq!(rows[0].1, vec![vec![1.5, 3.5], vec![4.5, 6.5]]);
    }
}
