// ---------------------------------------------------------------------------
// Task2: features whose most frequent value is not unique.
// ---------------------------------------------------------------------------

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};

use super::{file_stem, label_groups, render_to};
use crate::config::ReportConfig;
use crate::data::filter::split_numeric;
use crate::data::label::feature_list;
use crate::data::model::{CellValue, DataError, Dataset};
use crate::plot::figure::{split_histogram, violin};
use crate::plot::Renderer;
use crate::stats::descriptive::{column_modes, is_multimodal};

/// Features with more than one mode, paired with their modes, in feature order.
pub fn multimodal_features(
    dataset: &Dataset,
    features: &[String],
) -> Result<Vec<(String, Vec<CellValue>)>, DataError> {
    let mut found = Vec::new();
    for feature in features {
        let column = dataset.column(feature)?;
        if is_multimodal(column) {
            found.push((feature.clone(), column_modes(column)));
        }
    }
    Ok(found)
}

fn format_modes(modes: &[CellValue]) -> String {
    let items: Vec<String> = modes.iter().map(CellValue::to_string).collect();
    format!("[{}]", items.join(", "))
}

pub fn run(
    dataset: &Dataset,
    config: &ReportConfig,
    renderer: &dyn Renderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let features = feature_list(dataset, &config.excluded_columns());
    let multimodal = multimodal_features(dataset, &features)?;
    for (feature, modes) in &multimodal {
        println!("Feature '{feature}' is multimodal, modes: {}", format_modes(modes));
    }

    let (groups, colors) = label_groups(dataset, &config.label.target_column)?;
    let mut written = Vec::new();
    for (feature, _) in &multimodal {
        let split = match split_numeric(dataset, feature, &groups) {
            Ok(split) => split,
            Err(DataError::NonNumericColumn(_)) => {
                warn!("Multimodal feature '{feature}' is not numeric; no plots drawn");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let stem = file_stem(feature);

        let title = format!("Multimodal histogram of {feature}");
        if let Some(hist) = split_histogram(&title, feature, &split, &colors, config.histogram_bins) {
            let hist = hist.with_size(config.figure_size);
            written.push(render_to(renderer, &hist, out_dir, &format!("hist_multimodal_{stem}"))?);
        }

        let title = format!("Violin plot of {feature} by {}", colors.column);
        let body = violin(&title, feature, &split, &colors).with_size(config.figure_size);
        written.push(render_to(renderer, &body, out_dir, &format!("violin_{stem}"))?);
    }

    info!(
        "Multimodal features: {} of {}, {} plots written to {}",
        multimodal.len(),
        features.len(),
        written.len(),
        out_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;
    use crate::plot::figure::FigureKind;
    use crate::plot::testing::RecordingRenderer;

    fn ints(values: &[i64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Integer(v)).collect()
    }

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::new("Bimodal", ints(&[1, 1, 2, 2, 3])),
            Column::new("Unimodal", ints(&[1, 1, 2, 3, 4])),
            Column::new("Target", ints(&[0, 1, 0, 1, 0])),
        ])
        .unwrap()
    }

    #[test]
    fn tie_for_most_frequent_is_multimodal() {
        let features = vec!["Bimodal".to_string(), "Unimodal".to_string()];
        let found = multimodal_features(&dataset(), &features).unwrap();
        assert_eq!(
            found,
            vec![("Bimodal".to_string(), ints(&[1, 2]))]
        );
    }

    #[test]
    fn modes_print_as_a_list() {
        assert_eq!(format_modes(&ints(&[1, 2])), "[1, 2]");
        assert_eq!(
            format_modes(&[CellValue::Float(0.5), CellValue::Float(0.75)]),
            "[0.5, 0.75]"
        );
    }

    #[test]
    fn plots_only_multimodal_features() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let written = run(&dataset(), &ReportConfig::default(), &renderer, dir.path()).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("hist_multimodal_Bimodal.png"),
                dir.path().join("violin_Bimodal.png"),
            ]
        );
        let figure = renderer.figure("violin_Bimodal.png").unwrap();
        let FigureKind::Violin { groups } = figure.kind else {
            panic!("expected violin");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(figure.y_label, "Bimodal");
    }
}
