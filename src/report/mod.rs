/// Report stages. Each reporter reads the labelled dataset, builds
/// [`Figure`]s and hands them to a [`Renderer`]; none of them mutates the
/// dataset or reads another reporter's output.
///
/// ```text
///   summary       stdout: preview, dtypes, class counts
///   distribution  Task1/hist_<feature>.png
///   multimodal    Task2/hist_multimodal_<feature>.png, violin_<feature>.png
///   discreteness  Task3/discrete_<feature>.png
///   composite     Task4/<ten fixed figures>.png
/// ```
pub mod composite;
pub mod discreteness;
pub mod distribution;
pub mod multimodal;
pub mod summary;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::color::ColorMap;
use crate::data::filter::{group_indices, LabelGroups};
use crate::data::model::Dataset;
use crate::plot::{Figure, Renderer};

/// Make a column name safe to use as a file stem.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "_".to_string()
    } else {
        stem
    }
}

/// Render `figure` into `<dir>/<stem>.png` and return the written path.
pub fn render_to(
    renderer: &dyn Renderer,
    figure: &Figure,
    dir: &Path,
    stem: &str,
) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}.png"));
    renderer
        .render(figure, &path)
        .with_context(|| format!("rendering {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Row groups of the label column and a colour per label value.
pub fn label_groups(dataset: &Dataset, label_column: &str) -> Result<(LabelGroups, ColorMap)> {
    let groups = group_indices(dataset, label_column)?;
    let colors = ColorMap::new(label_column, groups.keys());
    Ok((groups, colors))
}
