use super::series::{series_report, SeriesReport};
use super::RunInfo;
use crate::config::AnalysisConfig;
use crate::data::EnergySeries;
use crate::error::AnalysisError;
use crate::stats::{spikes_above, tail_window, Spikes, Summary};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Fields analysed from an energy log, in report order
const FIELDS: [&str; 6] = ["temperature", "etot", "eptot", "density", "bond", "angle"];

/// Equilibration diagnostics for an MD energy log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    #[serde(flatten)]
    pub run: RunInfo,
    pub steps: usize,
    pub overflow: bool,
    /// One report per field with enough samples
    pub fields: Vec<SeriesReport>,
    /// |mean temperature - target| in K
    pub temperature_deviation: Option<f64>,
    pub density_tail: Option<Summary>,
    /// Spike scan for every field with samples, in field order
    pub spikes: Vec<FieldSpikes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpikes {
    pub field: String,
    #[serde(flatten)]
    pub spikes: Spikes,
}

impl EnergyReport {
    pub fn field(&self, name: &str) -> Option<&SeriesReport> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn spikes(&self, name: &str) -> Option<&Spikes> {
        self.spikes.iter().find(|s| s.field == name).map(|s| &s.spikes)
    }
}

/// Fields too short to block-average are skipped; the call fails only when
/// the log holds no energy blocks at all.
pub fn analyze_energy(energy: &EnergySeries, config: &AnalysisConfig) -> Result<EnergyReport> {
    if energy.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "energy log contains no energy blocks".to_string(),
        ));
    }
    if energy.overflow {
        tracing::warn!(steps = energy.len(), "Energy log contains overflowed fields");
    }

    let run = RunInfo::new();
    let mut fields = Vec::new();
    let mut spikes = Vec::new();
    for name in FIELDS {
        let values = match energy.field(name) {
            Some(values) if !values.is_empty() => values,
            _ => continue,
        };
        let scan = spikes_above(values, config.spike_sigmas)?;
        if !scan.is_empty() {
            tracing::warn!(
                field = name,
                count = scan.indices.len(),
                threshold = scan.threshold,
                "Energy spikes above threshold"
            );
        }
        spikes.push(FieldSpikes {
            field: name.to_string(),
            spikes: scan,
        });
        match series_report(run, name, values, config) {
            Ok(report) => fields.push(report),
            Err(AnalysisError::InsufficientData(reason)) => {
                tracing::debug!(field = name, reason = %reason, "Energy field skipped");
            }
            Err(e) => return Err(e),
        }
    }

    let temperature_deviation = fields
        .iter()
        .find(|f| f.name == "temperature")
        .map(|f| (f.summary.mean - config.temperature_k).abs());
    let density_tail = if energy.density.is_empty() {
        None
    } else {
        Some(tail_window(&energy.density, config.tail_window)?)
    };

    Ok(EnergyReport {
        run,
        steps: energy.len(),
        overflow: energy.overflow,
        fields,
        temperature_deviation,
        density_tail,
        spikes,
    })
}
