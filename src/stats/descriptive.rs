use crate::error::AnalysisError;
use crate::Result;
use serde::{Deserialize, Serialize};

fn require_samples(series: &[f64], minimum: usize, what: &str) -> Result<()> {
    if series.len() < minimum {
        return Err(AnalysisError::InsufficientData(format!(
            "{} needs at least {} samples, got {}",
            what,
            minimum,
            series.len()
        )));
    }
    Ok(())
}

pub fn mean(series: &[f64]) -> Result<f64> {
    require_samples(series, 1, "mean")?;
    Ok(series.iter().sum::<f64>() / series.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom (0 = population, 1 = sample)
pub fn variance(series: &[f64], ddof: usize) -> Result<f64> {
    require_samples(series, ddof + 1, "variance")?;
    let m = mean(series)?;
    let ss: f64 = series.iter().map(|x| (x - m).powi(2)).sum();
    Ok(ss / (series.len() - ddof) as f64)
}

pub fn std_dev(series: &[f64], ddof: usize) -> Result<f64> {
    variance(series, ddof).map(f64::sqrt)
}

/// True when every sample equals the first.
///
/// Use this rather than testing a variance for zero: the mean of a constant
/// like 0.1 carries a rounding residue, so its variance is tiny but not 0.
pub fn is_constant(series: &[f64]) -> bool {
    series.split_first().map_or(true, |(first, rest)| rest.iter().all(|v| v == first))
}

/// Count, mean, population standard deviation and range of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_series(series: &[f64]) -> Result<Self> {
        require_samples(series, 1, "summary")?;
        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        Ok(Self {
            count: series.len(),
            mean: mean(series)?,
            std_dev: std_dev(series, 0)?,
            min,
            max,
        })
    }
}

/// Statistics over the last `n` samples (or the whole series if shorter)
pub fn tail_window(series: &[f64], n: usize) -> Result<Summary> {
    require_samples(series, 1, "tail window")?;
    let start = series.len().saturating_sub(n.max(1));
    Summary::from_series(&series[start..])
}

/// Means before and after a split point, used as an equilibration check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarlyLate {
    pub split_index: usize,
    pub early_mean: f64,
    pub late_mean: f64,
}

/// Split the series after the first `fraction` of samples.
///
/// Both halves must be non-empty, so the series needs at least two samples
/// and a fraction strictly between 0 and 1.
pub fn split_fraction(series: &[f64], fraction: f64) -> Result<EarlyLate> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "split fraction must lie in (0, 1), got {}",
            fraction
        )));
    }
    require_samples(series, 2, "early/late split")?;
    let split_index = ((series.len() as f64 * fraction) as usize).clamp(1, series.len() - 1);
    Ok(EarlyLate {
        split_index,
        early_mean: mean(&series[..split_index])?,
        late_mean: mean(&series[split_index..])?,
    })
}

/// Samples lying more than `sigmas` population standard deviations above the mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spikes {
    pub threshold: f64,
    pub indices: Vec<usize>,
}

impl Spikes {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

pub fn spikes_above(series: &[f64], sigmas: f64) -> Result<Spikes> {
    if !(sigmas >= 0.0) {
        return Err(AnalysisError::InvalidParameter(format!(
            "spike threshold must be non-negative, got {} sigma",
            sigmas
        )));
    }
    let threshold = mean(series)? + sigmas * std_dev(series, 0)?;
    let indices = if is_constant(series) {
        Vec::new()
    } else {
        series
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > threshold)
            .map(|(i, _)| i)
            .collect()
    };
    Ok(Spikes { threshold, indices })
}
