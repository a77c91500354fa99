// ---------------------------------------------------------------------------
// Task3: cardinality per feature and a fine unsplit histogram that makes
// quantization gaps visible.
// ---------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};

use super::{file_stem, render_to};
use crate::color::SKY_BLUE;
use crate::config::ReportConfig;
use crate::data::label::feature_list;
use crate::data::model::{DataError, Dataset};
use crate::plot::figure::count_histogram;
use crate::plot::Renderer;
use crate::stats::descriptive::n_unique;

/// `(feature, distinct non-null values)` in feature order.
pub fn cardinality(dataset: &Dataset, features: &[String]) -> Result<Vec<(String, usize)>, DataError> {
    features
        .iter()
        .map(|f| Ok((f.clone(), n_unique(dataset.column(f)?))))
        .collect()
}

pub fn run(
    dataset: &Dataset,
    config: &ReportConfig,
    renderer: &dyn Renderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let features = feature_list(dataset, &config.excluded_columns());
    let total = dataset.len();

    println!("Unique values per feature:");
    let mut written = Vec::new();
    for (feature, unique) in cardinality(dataset, &features)? {
        println!("{feature}: {unique} unique values (total {total} rows)");

        let Some(values) = dataset.column(&feature)?.numeric_values() else {
            warn!("Skipping histogram of non-numeric feature '{feature}'");
            continue;
        };
        let title = format!("Discrete component of {feature}");
        let Some(figure) =
            count_histogram(&title, &feature, &values, config.fine_histogram_bins, SKY_BLUE)
        else {
            warn!("Skipping feature '{feature}': no values");
            continue;
        };
        let stem = format!("discrete_{}", file_stem(&feature));
        written.push(render_to(renderer, &figure.with_size(config.figure_size), out_dir, &stem)?);
    }

    info!("Discreteness plots: {} written to {}", written.len(), out_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};
    use crate::plot::figure::FigureKind;
    use crate::plot::testing::RecordingRenderer;

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::new(
                "Area",
                vec![
                    CellValue::Integer(10),
                    CellValue::Integer(10),
                    CellValue::Null,
                    CellValue::Integer(12),
                ],
            ),
            Column::from_f64("Extent", &[0.71, 0.72, 0.73, 0.74]),
            Column::new(
                "Target",
                [0, 1, 0, 1].iter().map(|&t| CellValue::Integer(t)).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn unique_count_never_exceeds_rows() {
        let ds = dataset();
        let features = feature_list(&ds, &["Class", "Target"]);
        let counts = cardinality(&ds, &features).unwrap();
        assert_eq!(counts, vec![("Area".to_string(), 2), ("Extent".to_string(), 4)]);
        assert!(counts.iter().all(|(_, unique)| *unique <= ds.len()));
    }

    #[test]
    fn one_sky_blue_histogram_per_feature() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let written = run(&dataset(), &ReportConfig::default(), &renderer, dir.path()).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("discrete_Area.png"), dir.path().join("discrete_Extent.png")]
        );
        let figure = renderer.figure("discrete_Extent.png").unwrap();
        assert_eq!(figure.y_label, "Number of objects");
        let FigureKind::Histogram { edges, series } = figure.kind else {
            panic!("expected histogram");
        };
        assert_eq!(edges.len(), 51);
        assert_eq!(series[0].color, SKY_BLUE);
    }
}
