//! Skewness/kurtosis normality heuristic.
//!
//! The statistic `skew² + kurt² / 4` and the p-value `exp(-stat / 2)` are an
//! ad hoc approximation of the D'Agostino-Pearson omnibus test. They rank
//! series by how far they stray from a Gaussian shape; they are not a
//! calibrated hypothesis test.

use super::descriptive;
use crate::Result;
use serde::{Deserialize, Serialize};

const STATISTIC_CUTOFF: f64 = 20.0;
const P_VALUE_BEYOND_CUTOFF: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalityHeuristic {
    pub skewness: f64,
    pub excess_kurtosis: f64,
    pub statistic: f64,
    pub p_value: f64,
}

pub fn normality_heuristic(series: &[f64]) -> Result<NormalityHeuristic> {
    let m = descriptive::mean(series)?;
    let s2 = descriptive::variance(series, 0)?;
    let n = series.len() as f64;

    let (skewness, excess_kurtosis) = if !descriptive::is_constant(series) && s2 > 0.0 {
        let m3 = series.iter().map(|x| (x - m).powi(3)).sum::<f64>() / n;
        let m4 = series.iter().map(|x| (x - m).powi(4)).sum::<f64>() / n;
        (m3 / s2.powf(1.5), m4 / (s2 * s2) - 3.0)
    } else {
        (0.0, 0.0)
    };

    let statistic = skewness.powi(2) + excess_kurtosis.powi(2) / 4.0;
    let p_value = if statistic < STATISTIC_CUTOFF {
        (-statistic / 2.0).exp()
    } else {
        P_VALUE_BEYOND_CUTOFF
    };

    Ok(NormalityHeuristic {
        skewness,
        excess_kurtosis,
        statistic,
        p_value,
    })
}
