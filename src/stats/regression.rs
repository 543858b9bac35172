use super::descriptive;
use crate::error::AnalysisError;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Ordinary least-squares fit `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, clamped to [0, 1]
    pub r_squared: f64,
    pub count: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Correlation coefficient carrying the sign of the slope
    pub fn r_value(&self) -> f64 {
        self.r_squared.sqrt().copysign(self.slope)
    }
}

pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(AnalysisError::mismatch("regression samples", x.len(), y.len()));
    }
    if x.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "regression needs at least 2 samples, got {}",
            x.len()
        )));
    }

    if descriptive::is_constant(x) {
        return Err(AnalysisError::DegenerateInput(
            "regression x values have zero variance".to_string(),
        ));
    }
    let mx = descriptive::mean(x)?;
    let my = descriptive::mean(y)?;
    let sxx: f64 = x.iter().map(|xi| (xi - mx).powi(2)).sum();
    let sxy: f64 = x.iter().zip(y).map(|(xi, yi)| (xi - mx) * (yi - my)).sum();
    let slope = sxy / sxx;
    let intercept = my - slope * mx;

    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (yi - (slope * xi + intercept)).powi(2))
        .sum();
    let ss_tot: f64 = y.iter().map(|yi| (yi - my).powi(2)).sum();
    // A constant y is fitted exactly but explains no variance.
    let r_squared = if !descriptive::is_constant(y) && ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        count: x.len(),
    })
}

/// Fit against the sample index `0, 1, ..., n - 1`
pub fn fit_series(y: &[f64]) -> Result<LinearFit> {
    let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
    linear_regression(&x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_y_has_zero_r_squared() {
        let fit = linear_regression(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 4.0);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn test_inexact_constant_y_has_zero_r_squared() {
        let fit = linear_regression(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1]).unwrap();
        assert_eq!(fit.r_squared, 0.0);
        assert!(fit.slope.abs() < 1e-12);
    }

    #[test]
    fn test_negative_slope_r_value() {
        let fit = fit_series(&[10.0, 8.0, 6.0, 4.0]).unwrap();
        assert!((fit.slope + 2.0).abs() < 1e-12);
        assert!((fit.r_value() + 1.0).abs() < 1e-12);
        assert!((fit.predict(4.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_rejected() {
        assert!(matches!(
            linear_regression(&[1.0], &[1.0]),
            Err(AnalysisError::InsufficientData(_))
        ));
    }
}
