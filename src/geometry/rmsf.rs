//! Per-point root-mean-square fluctuation over a trajectory.
//!
//! Every frame is superimposed onto the reference first (unless alignment is
//! switched off), then each point's fluctuation is measured about its mean
//! position across the frames: `RMSF_i = sqrt(<|x_i(t) - <x_i>|²>)`.

use super::{kabsch, PointSet, RmsdOptions};
use crate::error::AnalysisError;
use crate::Result;
use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fluctuations {
    /// One value per point, in point order (Å)
    pub values: Vec<f64>,
    pub frames_used: usize,
    /// Frames left out because they could not be fitted to the reference
    pub skipped_frames: Vec<usize>,
}

/// RMSF of every point after superposition onto `reference`
pub fn rmsf(reference: &PointSet, frames: &[PointSet]) -> Result<Fluctuations> {
    rmsf_with(reference, frames, &RmsdOptions::default())
}

/// Frames that fail to fit are skipped; the call fails only when none fit.
pub fn rmsf_with(
    reference: &PointSet,
    frames: &[PointSet],
    options: &RmsdOptions,
) -> Result<Fluctuations> {
    let fit = |(index, frame): (usize, &PointSet)| -> Result<PointSet> {
        if frame.len() != reference.len() {
            return Err(AnalysisError::mismatch(
                format!("frame {} point count", index),
                reference.len(),
                frame.len(),
            ));
        }
        if options.align {
            Ok(kabsch::superpose(reference, frame)?.superimpose(frame))
        } else {
            Ok(frame.clone())
        }
    };

    let fitted: Vec<Result<PointSet>> = if options.parallel {
        frames.par_iter().enumerate().map(fit).collect()
    } else {
        frames.iter().enumerate().map(fit).collect()
    };

    let mut used = Vec::with_capacity(fitted.len());
    let mut skipped_frames = Vec::new();
    let mut first_error = None;
    for (index, result) in fitted.into_iter().enumerate() {
        match result {
            Ok(frame) => used.push(frame),
            Err(e) => {
                tracing::warn!(frame = index, error = %e, "Frame skipped in fluctuation analysis");
                skipped_frames.push(index);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    if used.is_empty() {
        return Err(first_error.unwrap_or_else(|| {
            AnalysisError::InsufficientData("trajectory has no frames".to_string())
        }));
    }

    let count = used.len() as f64;
    let mut mean: Vec<Vector3<f64>> = vec![Vector3::zeros(); reference.len()];
    for frame in &used {
        for (m, p) in mean.iter_mut().zip(frame.iter()) {
            *m += p;
        }
    }
    for m in mean.iter_mut() {
        *m /= count;
    }

    let mut squared = vec![0.0; reference.len()];
    for frame in &used {
        for ((sq, m), p) in squared.iter_mut().zip(&mean).zip(frame.iter()) {
            *sq += (p - m).norm_squared();
        }
    }
    let values = squared.into_iter().map(|sq| (sq / count).sqrt()).collect();

    tracing::debug!(
        points = reference.len(),
        frames_used = used.len(),
        skipped = skipped_frames.len(),
        "Fluctuations computed"
    );

    Ok(Fluctuations {
        values,
        frames_used: used.len(),
        skipped_frames,
    })
}
