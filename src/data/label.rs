use log::info;

use super::model::{CellValue, Column, DataError, Dataset};

/// Threshold on `Solidity` at or below which a seed is labelled `1`.
pub const SOLIDITY_THRESHOLD: f64 = 0.9903;

/// Name of the original categorical label column.
pub const CLASS_COLUMN: &str = "Class";

/// Name of the derived binary label column.
pub const TARGET_COLUMN: &str = "Target";

/// Threshold predicate used to derive the binary label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRule {
    /// Numeric column the predicate reads.
    pub source_column: String,
    /// Inclusive upper bound for the positive class.
    pub threshold: f64,
    /// Name of the derived column.
    pub target_column: String,
}

impl Default for LabelRule {
    fn default() -> Self {
        Self {
            source_column: "Solidity".to_string(),
            threshold: SOLIDITY_THRESHOLD,
            target_column: TARGET_COLUMN.to_string(),
        }
    }
}

impl LabelRule {
    /// `1` iff `value <= threshold`. Null cells are never positive.
    pub fn label(&self, value: Option<f64>) -> i64 {
        match value {
            Some(v) if v <= self.threshold => 1,
            _ => 0,
        }
    }
}

/// Return a copy of `dataset` with the binary label column appended.
pub fn derive_target(dataset: &Dataset, rule: &LabelRule) -> Result<Dataset, DataError> {
    let source = dataset.numeric_rows(&rule.source_column)?;
    let labels: Vec<CellValue> = source
        .iter()
        .map(|&v| CellValue::Integer(rule.label(v)))
        .collect();

    let positives = labels
        .iter()
        .filter(|v| **v == CellValue::Integer(1))
        .count();
    info!(
        "Derived '{}' = ({} <= {}): {positives} of {} rows positive",
        rule.target_column,
        rule.source_column,
        rule.threshold,
        labels.len()
    );

    dataset.with_column(Column::new(rule.target_column.clone(), labels))
}

/// Every column name except the excluded label columns, in file order.
pub fn feature_list(dataset: &Dataset, excluded: &[&str]) -> Vec<String> {
    dataset
        .column_names()
        .into_iter()
        .filter(|name| !excluded.contains(name))
        .map(str::to_string)
        .collect()
}
