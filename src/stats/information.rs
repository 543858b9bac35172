//! Histogram-based entropy and mutual information, in bits.

use crate::error::AnalysisError;
use crate::Result;

/// Bin index of every value on an equal-width grid spanning [min, max].
///
/// The last bin is closed on the right. A constant input is widened to
/// [v - 0.5, v + 0.5] so it still lands in a single bin.
fn bin_indices(values: &[f64], bins: usize) -> Result<Vec<usize>> {
    if bins == 0 {
        return Err(AnalysisError::InsufficientData(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if values.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "histogram of an empty series".to_string(),
        ));
    }
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    Ok(values
        .iter()
        .map(|v| (((v - lo) / width) as usize).min(bins - 1))
        .collect())
}

fn plogp(p: f64) -> f64 {
    if p > 0.0 {
        p * p.log2()
    } else {
        0.0
    }
}

/// Shannon entropy of the value distribution
pub fn entropy(values: &[f64], bins: usize) -> Result<f64> {
    let indices = bin_indices(values, bins)?;
    let mut counts = vec![0usize; bins];
    for i in indices {
        counts[i] += 1;
    }
    let total = values.len() as f64;
    Ok(-counts.iter().map(|&c| plogp(c as f64 / total)).sum::<f64>())
}

/// Mutual information between two paired series, clamped to be non-negative
pub fn mutual_information(x: &[f64], y: &[f64], bins: usize) -> Result<f64> {
    if x.len() != y.len() {
        return Err(AnalysisError::mismatch("mutual information samples", x.len(), y.len()));
    }
    let xi = bin_indices(x, bins)?;
    let yi = bin_indices(y, bins)?;

    let mut joint = vec![vec![0usize; bins]; bins];
    for (&a, &b) in xi.iter().zip(&yi) {
        joint[a][b] += 1;
    }
    let total = x.len() as f64;
    let px: Vec<f64> = joint
        .iter()
        .map(|row| row.iter().sum::<usize>() as f64 / total)
        .collect();
    let py: Vec<f64> = (0..bins)
        .map(|j| joint.iter().map(|row| row[j]).sum::<usize>() as f64 / total)
        .collect();

    let mut mi = 0.0;
    for (i, row) in joint.iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let pxy = count as f64 / total;
            mi += pxy * (pxy / (px[i] * py[j])).log2();
        }
    }
    Ok(mi.max(0.0))
}
