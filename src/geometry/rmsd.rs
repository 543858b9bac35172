use super::{kabsch, PointSet};
use crate::error::AnalysisError;
use crate::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How a trajectory is reduced to per-frame RMSD values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RmsdOptions {
    /// Fan frames out over the rayon pool; output order is unaffected
    pub parallel: bool,
    /// Superimpose each frame first; when false the raw RMSD is reported
    pub align: bool,
}

impl Default for RmsdOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            align: true,
        }
    }
}

/// Per-frame RMSD values, with failing frames marked in place
#[derive(Debug)]
pub struct RmsdSeries {
    frames: Vec<Result<f64>>,
}

/// Serializable view of one frame of an [`RmsdSeries`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRmsd {
    pub frame: usize,
    pub rmsd: Option<f64>,
    pub error: Option<String>,
}

impl RmsdSeries {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, frame: usize) -> Option<&Result<f64>> {
        self.frames.get(frame)
    }

    /// One entry per frame, `None` where the frame failed
    pub fn values(&self) -> Vec<Option<f64>> {
        self.frames.iter().map(|r| r.as_ref().ok().copied()).collect()
    }

    /// Values of the frames that succeeded, in frame order
    pub fn successful(&self) -> Vec<f64> {
        self.frames.iter().filter_map(|r| r.as_ref().ok().copied()).collect()
    }

    pub fn failures(&self) -> Vec<(usize, &AnalysisError)> {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.frames.iter().all(|r| r.is_ok())
    }

    /// All values, or the error of the first failing frame
    pub fn into_result(self) -> Result<Vec<f64>> {
        self.frames.into_iter().collect()
    }

    pub fn records(&self) -> Vec<FrameRmsd> {
        self.frames
            .iter()
            .enumerate()
            .map(|(frame, r)| match r {
                Ok(value) => FrameRmsd {
                    frame,
                    rmsd: Some(*value),
                    error: None,
                },
                Err(e) => FrameRmsd {
                    frame,
                    rmsd: None,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }
}

/// Aligned RMSD of every frame against a fixed reference
pub fn rmsd_series(reference: &PointSet, frames: &[PointSet]) -> RmsdSeries {
    rmsd_series_with(reference, frames, &RmsdOptions::default())
}

pub fn rmsd_series_with(
    reference: &PointSet,
    frames: &[PointSet],
    options: &RmsdOptions,
) -> RmsdSeries {
    let per_frame = |(index, frame): (usize, &PointSet)| -> Result<f64> {
        if frame.len() != reference.len() {
            return Err(AnalysisError::mismatch(
                format!("frame {} point count", index),
                reference.len(),
                frame.len(),
            ));
        }
        if options.align {
            kabsch::aligned_rmsd(reference, frame)
        } else {
            kabsch::raw_rmsd(reference, frame)
        }
    };

    let frames: Vec<Result<f64>> = if options.parallel {
        frames.par_iter().enumerate().map(per_frame).collect()
    } else {
        frames.iter().enumerate().map(per_frame).collect()
    };

    let failed = frames.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::warn!(
            total_frames = frames.len(),
            failed_frames = failed,
            "Some frames could not be compared to the reference"
        );
    }

    RmsdSeries { frames }
}
