use super::series::{series_report, SeriesReport};
use super::RunInfo;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::geometry::{rmsd_series_with, FrameRmsd, PointSet, RmsdOptions};
use crate::logging::AnalysisSpan;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Per-frame RMSD against a reference plus diagnostics of the resulting series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmsdReport {
    pub frames: Vec<FrameRmsd>,
    pub failed_frames: usize,
    /// Computed over the successful frames only, taken as consecutive
    pub series: SeriesReport,
}

impl RmsdReport {
    pub fn run(&self) -> &RunInfo {
        &self.series.run
    }
}

pub fn analyze_rmsd(
    reference: &PointSet,
    frames: &[PointSet],
    config: &AnalysisConfig,
) -> Result<RmsdReport> {
    analyze_rmsd_with(reference, frames, config, &RmsdOptions::default())
}

/// Individual frame failures are reported, not raised; the call fails only
/// when no frame could be compared to the reference.
pub fn analyze_rmsd_with(
    reference: &PointSet,
    frames: &[PointSet],
    config: &AnalysisConfig,
    options: &RmsdOptions,
) -> Result<RmsdReport> {
    let run = RunInfo::new();
    let span = AnalysisSpan::new("rmsd", Some(run.run_id));
    let _entered = span.enter();
    span.record_input(reference.len());

    let rmsd = rmsd_series_with(reference, frames, options);
    let failed_frames = rmsd.failures().len();
    span.record_frames(rmsd.len(), failed_frames);

    let values = rmsd.successful();
    if values.is_empty() {
        let error = match rmsd.into_result() {
            Err(first) => first,
            Ok(_) => AnalysisError::InsufficientData("trajectory has no frames".to_string()),
        };
        span.record_result(false, &error.to_string());
        return Err(error);
    }

    let records = rmsd.records();
    let series = series_report(run, "rmsd", &values, config)?;
    span.record_result(true, "rmsd series analysed");

    Ok(RmsdReport {
        frames: records,
        failed_frames,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Vector3};

    fn reference() -> PointSet {
        PointSet::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [0.0, 1.5, 0.0],
            [0.0, 0.0, 1.5],
            [1.0, 1.0, 0.5],
        ])
    }

    #[test]
    fn test_rigid_frames_have_zero_rmsd() {
        let reference = reference();
        let frames: Vec<PointSet> = (0..10)
            .map(|i| {
                let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), 0.1 * i as f64);
                reference
                    .transformed(rotation.matrix())
                    .translated(&Vector3::new(i as f64, 0.0, -1.0))
            })
            .collect();

        let report = analyze_rmsd(&reference, &frames, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.frames.len(), 10);
        assert_eq!(report.failed_frames, 0);
        assert!(report.series.summary.max < 1e-8);
        assert_eq!(report.series.name, "rmsd");
    }

    #[test]
    fn test_failed_frames_are_listed() {
        let reference = reference();
        let mut frames = vec![reference.clone(); 6];
        frames.insert(2, PointSet::from_coords(&[[0.0, 0.0, 0.0]]));

        let report = analyze_rmsd(&reference, &frames, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.frames.len(), 7);
        assert_eq!(report.failed_frames, 1);
        assert!(report.frames[2].error.is_some());
        assert_eq!(report.series.summary.count, 6);
    }

    #[test]
    fn test_all_frames_failing_is_an_error() {
        let reference = reference();
        let frames = vec![PointSet::from_coords(&[[0.0, 0.0, 0.0]]); 3];
        let result = analyze_rmsd(&reference, &frames, &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_empty_trajectory_is_an_error() {
        let result = analyze_rmsd(&reference(), &[], &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InsufficientData(_))));
    }
}
