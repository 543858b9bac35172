use super::{in_stage, RunInfo};
use crate::config::{AnalysisConfig, FlexibilityRegions};
use crate::data::DataTable;
use crate::error::AnalysisError;
use crate::geometry::{rmsf_with, PointSet, RmsdOptions};
use crate::stats::Summary;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidueRmsf {
    pub residue: i64,
    pub rmsf: f64,
}

/// RMSF statistics over an inclusive residue range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub start: i64,
    pub end: i64,
    pub count: usize,
    pub mean: f64,
    /// Most flexible residue in the range (first one on ties)
    pub peak: ResidueRmsf,
}

/// Run of hotspot residues separated by no more than the configured gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotspotRegion {
    pub start: i64,
    pub end: i64,
    pub residues: usize,
    pub max_rmsf: f64,
}

/// Per-residue flexibility profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmsfReport {
    #[serde(flatten)]
    pub run: RunInfo,
    pub profile: Vec<ResidueRmsf>,
    /// Mean and population std over all residues
    pub summary: Summary,
    /// `None` when no residue falls inside the lid range
    pub lid: Option<RegionSummary>,
    /// Configured active-site residues present in the profile
    pub active_site: Vec<ResidueRmsf>,
    pub hotspot_threshold: f64,
    pub hotspots: Vec<ResidueRmsf>,
    pub regions: Vec<HotspotRegion>,
    /// Frames averaged over, when computed from coordinates
    pub frames_used: Option<usize>,
    pub skipped_frames: Vec<usize>,
}

impl RmsfReport {
    pub fn residue(&self, residue: i64) -> Option<f64> {
        self.profile.iter().find(|r| r.residue == residue).map(|r| r.rmsf)
    }
}

fn region_summary(profile: &[ResidueRmsf], start: i64, end: i64) -> Option<RegionSummary> {
    let inside: Vec<ResidueRmsf> = profile
        .iter()
        .filter(|r| r.residue >= start && r.residue <= end)
        .copied()
        .collect();
    let first = *inside.first()?;
    let peak = inside
        .iter()
        .fold(first, |best, r| if r.rmsf > best.rmsf { *r } else { best });
    Some(RegionSummary {
        start,
        end,
        count: inside.len(),
        mean: inside.iter().map(|r| r.rmsf).sum::<f64>() / inside.len() as f64,
        peak,
    })
}

/// Group residue-sorted hotspots into runs with gaps of at most `gap`
fn group_hotspots(hotspots: &[ResidueRmsf], gap: i64) -> Vec<HotspotRegion> {
    let mut regions: Vec<HotspotRegion> = Vec::new();
    for hotspot in hotspots {
        match regions.last_mut() {
            Some(region) if hotspot.residue - region.end <= gap => {
                region.end = hotspot.residue;
                region.residues += 1;
                region.max_rmsf = region.max_rmsf.max(hotspot.rmsf);
            }
            _ => regions.push(HotspotRegion {
                start: hotspot.residue,
                end: hotspot.residue,
                residues: 1,
                max_rmsf: hotspot.rmsf,
            }),
        }
    }
    regions
}

fn build_report(
    run: RunInfo,
    profile: Vec<ResidueRmsf>,
    regions: &FlexibilityRegions,
) -> Result<RmsfReport> {
    let values: Vec<f64> = profile.iter().map(|r| r.rmsf).collect();
    let summary = Summary::from_series(&values)?;
    let lid = region_summary(&profile, regions.lid[0], regions.lid[1]);
    let active_site = regions
        .active_site
        .iter()
        .filter_map(|res| profile.iter().find(|r| r.residue == *res).copied())
        .collect();

    let mut hotspots: Vec<ResidueRmsf> = profile
        .iter()
        .filter(|r| r.rmsf > regions.hotspot_threshold)
        .copied()
        .collect();
    hotspots.sort_by_key(|r| r.residue);
    let grouped = group_hotspots(&hotspots, regions.hotspot_gap);

    tracing::debug!(
        residues = profile.len(),
        mean = summary.mean,
        hotspots = hotspots.len(),
        regions = grouped.len(),
        "Flexibility profile summarised"
    );

    Ok(RmsfReport {
        run,
        profile,
        summary,
        lid,
        active_site,
        hotspot_threshold: regions.hotspot_threshold,
        hotspots,
        regions: grouped,
        frames_used: None,
        skipped_frames: Vec::new(),
    })
}

/// Summarise a precomputed per-residue RMSF profile
pub fn analyze_rmsf(residues: &[i64], rmsf: &[f64], config: &AnalysisConfig) -> Result<RmsfReport> {
    if residues.len() != rmsf.len() {
        return Err(AnalysisError::mismatch("rmsf residues", residues.len(), rmsf.len()));
    }
    in_stage("rmsf", rmsf.len(), || {
        let profile = residues
            .iter()
            .zip(rmsf)
            .map(|(&residue, &rmsf)| ResidueRmsf { residue, rmsf })
            .collect();
        build_report(RunInfo::new(), profile, &config.flexibility)
    })
}

/// Residue numbers from column 0 and RMSF from column 1, as written by
/// cpptraj `atomicfluct byres`
pub fn analyze_rmsf_table(table: &DataTable, config: &AnalysisConfig) -> Result<RmsfReport> {
    let residues: Vec<i64> = table.column(0)?.iter().map(|r| r.round() as i64).collect();
    let rmsf = table.column(1)?;
    analyze_rmsf(&residues, &rmsf, config)
}

/// RMSF from coordinates; point `i` is reported as residue `i + 1`
pub fn analyze_trajectory_rmsf(
    reference: &PointSet,
    frames: &[PointSet],
    config: &AnalysisConfig,
    options: &RmsdOptions,
) -> Result<RmsfReport> {
    in_stage("rmsf", frames.len(), || {
        let fluctuations = rmsf_with(reference, frames, options)?;
        let profile = fluctuations
            .values
            .iter()
            .zip(1..)
            .map(|(&rmsf, residue)| ResidueRmsf { residue, rmsf })
            .collect();
        let mut report = build_report(RunInfo::new(), profile, &config.flexibility)?;
        report.frames_used = Some(fluctuations.frames_used);
        report.skipped_frames = fluctuations.skipped_frames;
        Ok(report)
    })
}
