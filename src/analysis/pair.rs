use super::{in_stage, RunInfo};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::stats::{entropy, mutual_information, pearson, Correlation};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Linear and histogram-based dependence between two paired series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    #[serde(flatten)]
    pub run: RunInfo,
    pub x_name: String,
    pub y_name: String,
    pub correlation: Correlation,
    pub mutual_information_bits: f64,
    pub x_entropy_bits: f64,
    pub y_entropy_bits: f64,
}

pub fn analyze_pair(
    x_name: &str,
    x: &[f64],
    y_name: &str,
    y: &[f64],
    config: &AnalysisConfig,
) -> Result<PairReport> {
    if x.len() != y.len() {
        return Err(AnalysisError::mismatch(
            format!("{} / {} samples", x_name, y_name),
            x.len(),
            y.len(),
        ));
    }

    in_stage("pair", x.len(), || {
        Ok(PairReport {
            run: RunInfo::new(),
            x_name: x_name.to_string(),
            y_name: y_name.to_string(),
            correlation: pearson(x, y)?,
            mutual_information_bits: mutual_information(x, y, config.mutual_information_bins)?,
            x_entropy_bits: entropy(x, config.entropy_bins)?,
            y_entropy_bits: entropy(y, config.entropy_bins)?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependent_pair() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 - 0.5 * v).collect();
        let report = analyze_pair("k", &x, "rmsd", &y, &AnalysisConfig::default()).unwrap();
        assert!((report.correlation.r + 1.0).abs() < 1e-12);
        assert!(report.mutual_information_bits > 2.0);
        assert!((report.x_entropy_bits - report.y_entropy_bits).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        let result = analyze_pair("a", &[1.0, 2.0, 3.0], "b", &[1.0, 2.0], &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::DimensionMismatch { .. })));
    }
}
