use super::{in_stage, RunInfo};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::stats::{
    block_average, entropy, fit_series, normality_heuristic, split_fraction, tail_window,
    BlockAverage, EarlyLate, LinearFit, NormalityHeuristic, Summary,
};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Convergence and drift diagnostics for one scalar series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    #[serde(flatten)]
    pub run: RunInfo,
    pub name: String,
    pub summary: Summary,
    pub block_average: BlockAverage,
    /// Least-squares fit against the frame index
    pub drift: LinearFit,
    /// Drift slope converted to series units per ns
    pub drift_per_ns: f64,
    pub equilibration: EarlyLate,
    pub tail: Summary,
    pub normality: NormalityHeuristic,
    pub entropy_bits: f64,
    /// Relative block-average SEM within the configured threshold
    pub converged: bool,
    /// Mean, spread and drift all inside the configured stability limits
    pub stable: bool,
}

pub fn analyze_series(name: &str, series: &[f64], config: &AnalysisConfig) -> Result<SeriesReport> {
    series_report(RunInfo::new(), name, series, config)
}

pub(crate) fn series_report(
    run: RunInfo,
    name: &str,
    series: &[f64],
    config: &AnalysisConfig,
) -> Result<SeriesReport> {
    if !(config.time_per_frame_ps > 0.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "time_per_frame_ps must be positive, got {}",
            config.time_per_frame_ps
        )));
    }

    in_stage("series", series.len(), || {
        let summary = Summary::from_series(series)?;
        let block_average = block_average(series, config.block_count)?;
        let drift = fit_series(series)?;
        let drift_per_ns = drift.slope * 1000.0 / config.time_per_frame_ps;
        let converged = block_average.is_converged(config.convergence_threshold);
        let stable = config
            .stability
            .accepts(summary.mean, summary.std_dev, drift_per_ns);

        tracing::debug!(
            series = name,
            mean = summary.mean,
            sem = block_average.standard_error,
            drift_per_ns = drift_per_ns,
            converged = converged,
            "Series analysed"
        );

        Ok(SeriesReport {
            run,
            name: name.to_string(),
            summary,
            equilibration: split_fraction(series, config.equilibration_fraction)?,
            tail: tail_window(series, config.tail_window)?,
            normality: normality_heuristic(series)?,
            entropy_bits: entropy(series, config.entropy_bins)?,
            block_average,
            drift,
            drift_per_ns,
            converged,
            stable,
        })
    })
}
