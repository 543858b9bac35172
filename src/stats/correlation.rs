use super::descriptive;
use crate::error::AnalysisError;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Pearson correlation with an approximate two-tailed p-value.
///
/// The p-value maps the t statistic through a closed-form exponential tail
/// approximation instead of the Student t distribution. Treat it as a rough
/// indicator only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
    pub n: usize,
}

const P_VALUE_FLOOR: f64 = 1e-10;

pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    if x.len() != y.len() {
        return Err(AnalysisError::mismatch("correlation samples", x.len(), y.len()));
    }
    let n = x.len();
    if n < 3 {
        return Err(AnalysisError::InsufficientData(format!(
            "correlation needs at least 3 samples, got {}",
            n
        )));
    }

    if descriptive::is_constant(x) || descriptive::is_constant(y) {
        return Err(AnalysisError::DegenerateInput(
            "correlation input has zero variance".to_string(),
        ));
    }
    let mx = descriptive::mean(x)?;
    let my = descriptive::mean(y)?;
    let sx = descriptive::std_dev(x, 1)?;
    let sy = descriptive::std_dev(y, 1)?;

    let cov: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    let r = (cov / ((n - 1) as f64 * sx * sy)).clamp(-1.0, 1.0);

    let t = r * ((n - 2) as f64 / (1.0 - r * r + 1e-10)).sqrt();
    // Symmetric in t, so anticorrelation gets the same p-value as correlation.
    let tail = 1.0 - (-0.717 * t.abs() - 0.416 * t * t).exp();
    let p_value = (1.0 - tail).max(P_VALUE_FLOOR);

    Ok(Correlation { r, p_value, n })
}
