// ---------------------------------------------------------------------------
// Order statistics, modes and cardinality.
// ---------------------------------------------------------------------------

use std::collections::BTreeMap;

use crate::data::model::{CellValue, Column};

/// All most-frequent values, ties included, in ascending order.
///
/// Equality is exact: no binning or rounding is applied, so on continuous
/// data any tie between repeated low-precision values produces several modes.
pub fn modes<T: Ord + Clone>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let Some(&best) = counts.values().max() else {
        return Vec::new();
    };
    counts
        .into_iter()
        .filter(|&(_, count)| count == best)
        .map(|(value, _)| value)
        .collect()
}

/// Modes of a column, ignoring null cells.
pub fn column_modes(column: &Column) -> Vec<CellValue> {
    modes(column.values.iter().filter(|v| !v.is_null()).cloned())
}

/// A column is multimodal when more than one value ties for most frequent.
pub fn is_multimodal(column: &Column) -> bool {
    column_modes(column).len() > 1
}

/// Number of distinct non-null values.
pub fn n_unique(column: &Column) -> usize {
    column.value_counts().len()
}

/// Quantile of already sorted data using linear interpolation between
/// closest ranks. Returns `None` for empty input.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Sort a copy of `values` ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// First, second and third quartiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn new(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        Some(Self {
            q1: quantile_sorted(&sorted, 0.25)?,
            median: quantile_sorted(&sorted, 0.5)?,
            q3: quantile_sorted(&sorted, 0.75)?,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Box plot summary: quartiles, whiskers at the most extreme observations
/// within 1.5 IQR of the box, and everything beyond as outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub quartiles: Quartiles,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub const WHISKER_IQR: f64 = 1.5;

    pub fn new(values: &[f64]) -> Option<Self> {
        let quartiles = Quartiles::new(values)?;
        let reach = Self::WHISKER_IQR * quartiles.iqr();
        let low_fence = quartiles.q1 - reach;
        let high_fence = quartiles.q3 + reach;

        let inside: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| (low_fence..=high_fence).contains(v))
            .collect();
        let whisker_low = inside.iter().copied().fold(f64::INFINITY, f64::min);
        let whisker_high = inside.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let outliers = sorted(
            &values
                .iter()
                .copied()
                .filter(|v| !(low_fence..=high_fence).contains(v))
                .collect::<Vec<_>>(),
        );

        Some(Self {
            quartiles,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Smallest and largest finite value, or `None` if there is none.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    Some(finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn column(values: &[i64]) -> Column {
        Column::new(
            "f",
            values.iter().map(|&v| CellValue::Integer(v)).collect(),
        )
    }

    #[test]
    fn tied_modes_are_all_reported() {
        let c = column(&[1, 1, 2, 2, 3]);
        assert_eq!(
            column_modes(&c),
            vec![CellValue::Integer(1), CellValue::Integer(2)]
        );
        assert!(is_multimodal(&c));
    }

    #[test]
    fn single_mode_is_not_multimodal() {
        let c = column(&[1, 1, 2, 3]);
        assert_eq!(column_modes(&c), vec![CellValue::Integer(1)]);
        assert!(!is_multimodal(&c));
    }

    #[test]
    fn all_distinct_values_are_all_modes() {
        let c = Column::from_f64("f", &[0.5, 0.25, 0.125]);
        assert_eq!(column_modes(&c).len(), 3);
        assert!(is_multimodal(&c));
    }

    #[test]
    fn nulls_do_not_count_as_modes() {
        let c = Column::new(
            "f",
            vec![
                CellValue::Null,
                CellValue::Null,
                CellValue::Null,
                CellValue::Integer(7),
            ],
        );
        assert_eq!(column_modes(&c), vec![CellValue::Integer(7)]);
        assert_eq!(n_unique(&c), 1);
    }

    #[test]
    fn empty_column_has_no_modes() {
        assert!(column_modes(&column(&[])).is_empty());
    }

    #[test]
    fn unique_count_never_exceeds_rows() {
        let c = column(&[4, 4, 5, 6, 6, 6]);
        assert_eq!(n_unique(&c), 3);
        assert!(n_unique(&c) <= c.len());
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.25, 1.75)]
    #[case(0.5, 2.5)]
    #[case(1.0, 4.0)]
    fn quantile_interpolates_linearly(#[case] q: f64, #[case] expected: f64) {
        let got = quantile_sorted(&[1.0, 2.0, 3.0, 4.0], q).unwrap();
        assert!((got - expected).abs() < 1e-12, "q={q}: {got}");
    }

    #[test]
    fn box_stats_separate_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stats = BoxStats::new(&values).unwrap();
        assert_eq!(stats.quartiles.median, 3.5);
        assert_eq!(stats.whisker_low, 1.0);
        assert_eq!(stats.whisker_high, 5.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn min_max_skips_non_finite() {
        assert_eq!(min_max(&[f64::NAN, 3.0, -1.0]), Some((-1.0, 3.0)));
        assert_eq!(min_max(&[]), None);
    }
}
