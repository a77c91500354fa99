// ---------------------------------------------------------------------------
// Gaussian kernel density estimation with Scott's bandwidth rule.
// ---------------------------------------------------------------------------

use std::f64::consts::PI;

use super::descriptive::min_max;

/// Grid points per evaluated curve.
pub const GRID_SIZE: usize = 200;

/// Sample standard deviation (`n - 1` denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// A fitted one-dimensional Gaussian KDE.
#[derive(Debug, Clone)]
pub struct Kde {
    data: Vec<f64>,
    bandwidth: f64,
}

impl Kde {
    /// Fit on the finite values of `values`.
    ///
    /// Returns `None` for fewer than two points or zero variance, where the
    /// bandwidth would collapse.
    pub fn new(values: &[f64]) -> Option<Self> {
        let data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let std = sample_std(&data)?;
        if std <= 0.0 || !std.is_finite() {
            return None;
        }
        // Scott's factor for one dimension: n^(-1/5).
        let factor = (data.len() as f64).powf(-0.2);
        Some(Self {
            data,
            bandwidth: factor * std,
        })
    }

    #[cfg(test)]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let norm = 1.0 / (self.data.len() as f64 * h * (2.0 * PI).sqrt());
        self.data
            .iter()
            .map(|&xi| {
                let z = (x - xi) / h;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// `(x, density)` pairs over the data range extended by `cut` bandwidths.
    pub fn curve(&self, cut: f64, grid_size: usize) -> Vec<(f64, f64)> {
        let Some((lo, hi)) = min_max(&self.data) else {
            return Vec::new();
        };
        let lo = lo - cut * self.bandwidth;
        let hi = hi + cut * self.bandwidth;
        let steps = grid_size.max(2) - 1;
        (0..=steps)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / steps as f64;
                (x, self.evaluate(x))
            })
            .collect()
    }
}
