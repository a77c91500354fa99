// ---------------------------------------------------------------------------
// Console diagnostics printed right after loading: a row preview, a
// per-column dtype listing and the label class counts.
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::config::ReportConfig;
use crate::data::model::{CellValue, Column, ColumnKind, DataError, Dataset};

/// Convert one column into an arrow array matching its dtype.
fn to_arrow(column: &Column) -> (DataType, ArrayRef) {
    match column.kind() {
        ColumnKind::Integer => {
            let values: Vec<Option<i64>> = column
                .values
                .iter()
                .map(|v| match v {
                    CellValue::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(Int64Array::from(values)))
        }
        ColumnKind::Float => {
            let values: Vec<Option<f64>> = column.values.iter().map(CellValue::as_f64).collect();
            (DataType::Float64, Arc::new(Float64Array::from(values)))
        }
        ColumnKind::Bool => {
            let values: Vec<Option<bool>> = column
                .values
                .iter()
                .map(|v| match v {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            (DataType::Boolean, Arc::new(BooleanArray::from(values)))
        }
        ColumnKind::Text | ColumnKind::Mixed | ColumnKind::Empty => {
            let values: Vec<Option<String>> = column
                .values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect();
            (DataType::Utf8, Arc::new(StringArray::from(values)))
        }
    }
}

/// The first `rows` rows as a boxed text table.
pub fn preview(dataset: &Dataset, rows: usize) -> Result<String> {
    if dataset.columns().is_empty() {
        return Ok("(no columns)".to_string());
    }
    let head = dataset.head(rows);
    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = head
        .columns()
        .iter()
        .map(|column| {
            let (dtype, array) = to_arrow(column);
            (Field::new(column.name.as_str(), dtype, true), array)
        })
        .unzip();
    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// Column listing with non-null counts and dtypes, then a dtype tally.
pub fn info(dataset: &Dataset) -> String {
    let n = dataset.len();
    let mut out = String::new();
    let _ = writeln!(out, "{n} entries, 0 to {}", n.saturating_sub(1));
    let _ = writeln!(out, "Data columns (total {} columns):", dataset.columns().len());

    let width = dataset
        .columns()
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());
    let _ = writeln!(out, " {:>3}  {:<width$}  Non-Null Count  Dtype", "#", "Column");

    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for (i, column) in dataset.columns().iter().enumerate() {
        let kind = column.kind().to_string();
        let non_null = format!("{} non-null", column.non_null_count());
        let _ = writeln!(out, " {i:>3}  {:<width$}  {non_null:<14}  {kind}", column.name);
        *tally.entry(kind).or_insert(0) += 1;
    }

    let dtypes: Vec<String> = tally.iter().map(|(k, n)| format!("{k}({n})")).collect();
    let _ = write!(out, "dtypes: {}", dtypes.join(", "));
    out
}

/// Non-null value counts of `column`, most frequent first; ties keep value order.
pub fn value_counts(dataset: &Dataset, column: &str) -> Result<Vec<(CellValue, usize)>, DataError> {
    let mut counts: Vec<(CellValue, usize)> =
        dataset.column(column)?.value_counts().into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts)
}

pub fn format_counts(column: &str, counts: &[(CellValue, usize)]) -> String {
    let mut out = column.to_string();
    for (value, count) in counts {
        let value = value.to_string();
        let _ = write!(out, "\n{value:<8}{count:>8}");
    }
    out
}

/// Print every diagnostic to stdout.
pub fn print(dataset: &Dataset, config: &ReportConfig) -> Result<()> {
    let target = &config.label.target_column;

    println!("First rows of the dataset:");
    println!("{}", preview(dataset, config.preview_rows)?);
    println!();
    println!("Dataset info:");
    println!("{}", info(dataset));
    println!();
    println!("Class distribution:");
    println!("{}", format_counts(target, &value_counts(dataset, target)?));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_columns(vec![
            Column::from_f64("Area", &[56276.0, 76631.0, 71623.0, 66458.0, 66107.0, 73191.0]),
            Column::from_f64("Solidity", &[0.9902, 0.9916, 0.9851, 0.9918, 0.9901, 0.9947]),
            Column::new(
                "Class",
                ["A", "A", "B", "B", "B", "A"]
                    .iter()
                    .map(|s| CellValue::String(s.to_string()))
                    .collect(),
            ),
            Column::new(
                "Target",
                [1, 0, 1, 0, 1, 0].iter().map(|&t| CellValue::Integer(t)).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn preview_shows_only_head_rows() {
        let table = preview(&dataset(), 5).unwrap();
        assert!(table.contains("Area"));
        assert!(table.contains("56276"));
        assert!(table.contains("66107"));
        assert!(!table.contains("73191"));
    }

    #[test]
    fn info_lists_dtypes_and_tally() {
        let text = info(&dataset());
        assert!(text.starts_with("6 entries, 0 to 5"));
        assert!(text.contains("Data columns (total 4 columns):"));
        assert!(text.contains("6 non-null"));
        assert!(text.contains("float64"));
        assert!(text.ends_with("dtypes: float64(1), int64(2), object(1)"));
    }

    #[test]
    fn value_counts_sorted_by_frequency() {
        let ds = Dataset::from_columns(vec![Column::new(
            "Target",
            vec![
                CellValue::Integer(0),
                CellValue::Integer(1),
                CellValue::Integer(1),
                CellValue::Null,
                CellValue::Integer(1),
                CellValue::Integer(0),
            ],
        )])
        .unwrap();
        let counts = value_counts(&ds, "Target").unwrap();
        assert_eq!(
            counts,
            vec![(CellValue::Integer(1), 3), (CellValue::Integer(0), 2)]
        );
        assert_eq!(format_counts("Target", &counts), "Target\n1              3\n0              2");
    }

    #[test]
    fn missing_count_column_is_an_error() {
        assert_eq!(
            value_counts(&dataset(), "Label"),
            Err(DataError::MissingColumn("Label".to_string()))
        );
    }
}
