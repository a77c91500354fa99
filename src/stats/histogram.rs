// ---------------------------------------------------------------------------
// Fixed-count, equal-width histograms.
// ---------------------------------------------------------------------------

use super::descriptive::min_max;

/// Bin counts over `edges.len() - 1` half-open bins; the last bin is closed
/// so the maximum value is counted.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// `bins + 1` equally spaced edges spanning the finite range of `values`.
    /// A constant sample gets a unit-wide range centred on its value.
    pub fn edges_for(values: &[f64], bins: usize) -> Option<Vec<f64>> {
        if bins == 0 {
            return None;
        }
        let (mut lo, mut hi) = min_max(values)?;
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);
        Some(edges)
    }

    /// Histogram of `values` with `bins` bins over their own range.
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        let edges = Self::edges_for(values, bins)?;
        Some(Self::with_edges(values, edges))
    }

    /// Histogram of `values` over shared `edges`; values outside are dropped.
    pub fn with_edges(values: &[f64], edges: Vec<f64>) -> Self {
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0usize; bins];
        if bins > 0 {
            let lo = edges[0];
            let hi = edges[bins];
            let width = (hi - lo) / bins as f64;
            for &v in values {
                if !(lo..=hi).contains(&v) {
                    continue;
                }
                let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
                counts[idx] += 1;
            }
        }
        Self { edges, counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Each bin's share of this histogram's own total; sums to 1 unless empty.
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximum_falls_in_last_bin() {
        let h = Histogram::new(&[0.0, 0.5, 1.0], 2).unwrap();
        assert_eq!(h.edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(h.counts, vec![1, 2]);
    }

    #[test]
    fn constant_sample_gets_unit_range() {
        let h = Histogram::new(&[3.0, 3.0], 4).unwrap();
        assert_eq!(h.edges.first(), Some(&2.5));
        assert_eq!(h.edges.last(), Some(&3.5));
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn shared_edges_drop_out_of_range_values() {
        let edges = Histogram::edges_for(&[0.0, 10.0], 10).unwrap();
        let h = Histogram::with_edges(&[-1.0, 0.0, 9.99, 10.0, 11.0], edges);
        assert_eq!(h.total(), 3);
        assert_eq!(h.counts.len(), 10);
    }

    #[test]
    fn probabilities_are_normalized_per_histogram() {
        let edges = Histogram::edges_for(&[0.0, 4.0], 4).unwrap();
        let small = Histogram::with_edges(&[0.5, 1.5], edges.clone());
        let large = Histogram::with_edges(&[0.5, 0.5, 0.5, 2.5, 3.5, 3.9], edges);
        for h in [&small, &large] {
            let sum: f64 = h.probabilities().iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert_eq!(large.probabilities()[0], 0.5);
    }

    #[test]
    fn empty_input_has_no_histogram() {
        assert!(Histogram::new(&[], 30).is_none());
        assert!(Histogram::new(&[1.0], 0).is_none());
        let empty = Histogram::with_edges(&[], vec![0.0, 1.0]);
        assert_eq!(empty.probabilities(), vec![0.0]);
    }
}
