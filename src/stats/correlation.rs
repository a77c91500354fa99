// ---------------------------------------------------------------------------
// Pearson correlation over pairwise-complete observations.
// ---------------------------------------------------------------------------

use crate::data::model::{DataError, Dataset};

/// Pearson's r between two row-aligned columns, using only rows where both
/// sides are present. `NaN` when fewer than two such rows or a side is constant.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Square, symmetric correlation matrix with row/column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of the named numeric columns.
    pub fn from_dataset(dataset: &Dataset, columns: &[&str]) -> Result<Self, DataError> {
        let rows: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|name| dataset.numeric_rows(name))
            .collect::<Result<_, _>>()?;

        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            for j in i..n {
                let r = pearson(&rows[i], &rows[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Ok(Self {
            labels: columns.iter().map(|c| c.to_string()).collect(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
