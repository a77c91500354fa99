use std::collections::BTreeMap;

use super::model::{CellValue, DataError, Dataset};

// ---------------------------------------------------------------------------
// Label grouping: which rows belong to each label value
// ---------------------------------------------------------------------------

/// Row indices per distinct label value, ordered by label value.
/// Rows with a null label are left out.
pub type LabelGroups = BTreeMap<CellValue, Vec<usize>>;

/// Group row indices by the values of `label_column`.
pub fn group_indices(dataset: &Dataset, label_column: &str) -> Result<LabelGroups, DataError> {
    let mut groups = LabelGroups::new();
    for (i, value) in dataset.column(label_column)?.values.iter().enumerate() {
        if value.is_null() {
            continue;
        }
        groups.entry(value.clone()).or_default().push(i);
    }
    Ok(groups)
}

/// Non-null values of `feature` for each label group.
pub fn split_numeric(
    dataset: &Dataset,
    feature: &str,
    groups: &LabelGroups,
) -> Result<Vec<(CellValue, Vec<f64>)>, DataError> {
    let rows = dataset.numeric_rows(feature)?;
    Ok(groups
        .iter()
        .map(|(label, indices)| {
            let values = indices.iter().filter_map(|&i| rows[i]).collect();
            (label.clone(), values)
        })
        .collect())
}

/// Row-aligned `(x, y)` pairs per label group; rows missing either side are skipped.
pub fn split_pairs(
    dataset: &Dataset,
    x: &str,
    y: &str,
    groups: &LabelGroups,
) -> Result<Vec<(CellValue, Vec<(f64, f64)>)>, DataError> {
    let xs = dataset.numeric_rows(x)?;
    let ys = dataset.numeric_rows(y)?;
    Ok(groups
        .iter()
        .map(|(label, indices)| {
            let points = indices
                .iter()
                .filter_map(|&i| Some((xs[i]?, ys[i]?)))
                .collect();
            (label.clone(), points)
        })
        .collect())
}
