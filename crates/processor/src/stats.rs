//! Paired-sample statistics shared by the statistical algorithms
//!
//! [`PairStats`] digests a window of `(x, y)` pairs into centered moments and
//! answers the questions the correlation, regression, and forecast algorithms
//! ask: slope, intercept, Pearson's r, and the significance of the fitted
//! slope. Windows are small, so moments are recomputed per firing rather than
//! maintained incrementally.
//!
//! Degenerate inputs answer `None` instead of NaN: a slope needs x-variance,
//! r needs variance on both sides, significance needs at least three samples.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Centered second moments of a set of `(x, y)` pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairStats {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

impl PairStats {
    /// Digests the pairs in two passes (means, then centered moments).
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let pairs: Vec<(f64, f64)> = pairs.into_iter().collect();
        let n = pairs.len();
        if n == 0 {
            return Self {
                n: 0,
                mean_x: 0.0,
                mean_y: 0.0,
                sxx: 0.0,
                syy: 0.0,
                sxy: 0.0,
            };
        }

        let count = n as f64;
        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / count;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / count;

        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;
        for (x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        Self {
            n,
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn mean_x(&self) -> f64 {
        self.mean_x
    }

    pub fn mean_y(&self) -> f64 {
        self.mean_y
    }

    /// Least-squares slope; `None` without x-variance.
    pub fn slope(&self) -> Option<f64> {
        if self.n < 2 || self.sxx == 0.0 {
            return None;
        }
        Some(self.sxy / self.sxx)
    }

    /// Least-squares intercept; `None` whenever the slope is.
    pub fn intercept(&self) -> Option<f64> {
        self.slope().map(|slope| self.mean_y - slope * self.mean_x)
    }

    /// Pearson's correlation coefficient; `None` when either series has zero
    /// variance.
    pub fn r(&self) -> Option<f64> {
        if self.n < 2 || self.sxx == 0.0 || self.syy == 0.0 {
            return None;
        }
        Some(self.sxy / (self.sxx * self.syy).sqrt())
    }

    /// Residual mean square of the fitted line, `SSE / (n - 2)`.
    pub fn mse(&self) -> Option<f64> {
        if self.n < 3 || self.sxx == 0.0 {
            return None;
        }
        let sse = self.syy - self.sxy * self.sxy / self.sxx;
        // Floating-point cancellation can drive a perfect fit slightly negative.
        Some(sse.max(0.0) / (self.n as f64 - 2.0))
    }

    /// Standard error of the fitted slope.
    pub fn slope_std_err(&self) -> Option<f64> {
        self.mse().map(|mse| (mse / self.sxx).sqrt())
    }

    /// Standard error of the fitted intercept.
    pub fn intercept_std_err(&self) -> Option<f64> {
        self.mse().map(|mse| {
            let n = self.n as f64;
            (mse * (1.0 / n + self.mean_x * self.mean_x / self.sxx)).sqrt()
        })
    }

    /// Two-sided p-value of the slope against zero, Student's t with
    /// `n - 2` degrees of freedom. A perfect fit answers 0.0 for a nonzero
    /// slope and 1.0 for a flat one.
    pub fn slope_significance(&self) -> Option<f64> {
        let slope = self.slope()?;
        let std_err = self.slope_std_err()?;
        if std_err == 0.0 {
            return Some(if slope == 0.0 { 1.0 } else { 0.0 });
        }
        let df = self.n as f64 - 2.0;
        let t = StudentsT::new(0.0, 1.0, df).ok()?;
        let statistic = (slope / std_err).abs();
        Some(2.0 * (1.0 - t.cdf(statistic)))
    }

    /// Half-width of the slope confidence interval at the given level
    /// (e.g. 0.95). A perfect fit answers 0.0.
    pub fn slope_confidence(&self, level: f64) -> Option<f64> {
        if !(0.0..1.0).contains(&level) {
            return None;
        }
        let std_err = self.slope_std_err()?;
        if std_err == 0.0 {
            return Some(0.0);
        }
        let df = self.n as f64 - 2.0;
        let t = StudentsT::new(0.0, 1.0, df).ok()?;
        let quantile = t.inverse_cdf(1.0 - (1.0 - level) / 2.0);
        Some(quantile * std_err)
    }
}
