//! Analysis reports
//!
//! Each `analyze_*` entry point runs one family of checks inside an
//! [`AnalysisSpan`](crate::logging::AnalysisSpan) and returns a serializable
//! report stamped with a run id and a timestamp.

pub mod bonds;
pub mod energy;
pub mod flexibility;
pub mod pair;
pub mod series;
pub mod trajectory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use bonds::{analyze_bonds, BondReport, ParameterReport, SystemReport};
pub use energy::{analyze_energy, EnergyReport, FieldSpikes};
pub use flexibility::{
    analyze_rmsf, analyze_rmsf_table, analyze_trajectory_rmsf, HotspotRegion, RegionSummary,
    ResidueRmsf, RmsfReport,
};
pub use pair::{analyze_pair, PairReport};
pub use series::{analyze_series, SeriesReport};
pub use trajectory::{analyze_rmsd, analyze_rmsd_with, RmsdReport};

/// Identity of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
}

impl RunInfo {
    /// Reuses the thread's correlation id when one is set, so reports and
    /// log lines of the same run share an id
    pub fn new() -> Self {
        Self {
            run_id: crate::logging::get_correlation_id().unwrap_or_else(Uuid::new_v4),
            generated_at: Utc::now(),
        }
    }
}

impl Default for RunInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `body` inside a named stage span and log its outcome
fn in_stage<T>(
    stage: &str,
    samples: usize,
    body: impl FnOnce() -> crate::Result<T>,
) -> crate::Result<T> {
    let span = crate::logging::AnalysisSpan::new(stage, None);
    let _entered = span.enter();
    span.record_input(samples);

    let result = body();
    match &result {
        Ok(_) => span.record_result(true, "completed"),
        Err(e) => span.record_result(false, &e.to_string()),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_info_follows_correlation_id() {
        let id = crate::logging::new_correlation_id();
        assert_eq!(RunInfo::new().run_id, id);
        crate::logging::clear_correlation_id();
        assert_ne!(RunInfo::new().run_id, id);
    }
}
