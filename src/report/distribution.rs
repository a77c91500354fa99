// ---------------------------------------------------------------------------
// Task1: one label-split, per-label normalized histogram per feature.
// ---------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};

use super::{file_stem, label_groups, render_to};
use crate::config::ReportConfig;
use crate::data::filter::split_numeric;
use crate::data::label::feature_list;
use crate::data::model::{DataError, Dataset};
use crate::plot::figure::split_histogram;
use crate::plot::Renderer;

pub fn run(
    dataset: &Dataset,
    config: &ReportConfig,
    renderer: &dyn Renderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let target = &config.label.target_column;
    let (groups, colors) = label_groups(dataset, target)?;

    let mut written = Vec::new();
    for feature in feature_list(dataset, &config.excluded_columns()) {
        let split = match split_numeric(dataset, &feature, &groups) {
            Ok(split) => split,
            Err(DataError::NonNumericColumn(_)) => {
                warn!("Skipping non-numeric feature '{feature}'");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let title = format!("Distribution of {feature} by class");
        let Some(figure) = split_histogram(&title, &feature, &split, &colors, config.histogram_bins)
        else {
            warn!("Skipping feature '{feature}': no values");
            continue;
        };
        let stem = format!("hist_{}", file_stem(&feature));
        written.push(render_to(renderer, &figure.with_size(config.figure_size), out_dir, &stem)?);
    }

    info!("Distribution plots: {} written to {}", written.len(), out_dir.display());
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
            Column::from_f64("Area", &[56276.0, 76631.0, 71623.0, 66458.0]),
            Column::from_f64("Solidity", &[0.9902, 0.9916, 0.9851, 0.9918]),
            Column::new(
                "Class",
                ["A", "A", "B", "B"]
                    .iter()
                    .map(|s| CellValue::String(s.to_string()))
                    .collect(),
            ),
            Column::new(
                "Target",
                [1, 0, 1, 0].iter().map(|&t| CellValue::Integer(t)).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn one_histogram_per_feature() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let written = run(&dataset(), &ReportConfig::default(), &renderer, dir.path()).unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("hist_Area.png"), dir.path().join("hist_Solidity.png")]
        );
        assert!(written.iter().all(|p| p.exists()));

        let figure = renderer.figure("hist_Area.png").unwrap();
        let FigureKind::Histogram { edges, series } = figure.kind else {
            panic!("expected histogram");
        };
        assert_eq!(edges.len(), 31);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn text_features_are_skipped() {
        let ds = dataset()
            .with_column(Column::new(
                "Origin",
                ["x", "y", "z", "w"]
                    .iter()
                    .map(|s| CellValue::String(s.to_string()))
                    .collect(),
            ))
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let written = run(&ds, &ReportConfig::default(), &renderer, dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!dir.path().join("hist_Origin.png").exists());
    }

    #[test]
    fn missing_target_is_fatal() {
        let ds = Dataset::from_columns(vec![Column::from_f64("Area", &[1.0, 2.0])]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = run(&ds, &ReportConfig::default(), &RecordingRenderer::default(), dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("Target"));
    }
}
