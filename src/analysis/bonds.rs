use super::{in_stage, RunInfo};
use crate::physics::{
    assess_bond, BondParameter, BondQuality, CoordinationGeometry, Donor, OxidationState,
    ParameterTable, StabilityScore, SystemParameters, VibrationalMode,
};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Derived physics and literature comparison for one bond
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondReport {
    pub ligand: String,
    pub donor: Donor,
    pub r0: f64,
    pub k: f64,
    pub reduced_mass_amu: f64,
    pub mode: VibrationalMode,
    /// RMS thermal fluctuation of the bond length (Å)
    pub fluctuation: f64,
    pub quality: BondQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemReport {
    pub name: String,
    pub oxidation_state: OxidationState,
    pub status: Option<String>,
    pub bonds: Vec<BondReport>,
    pub overall_quality: Option<f64>,
    pub mean_force_constant: Option<f64>,
    pub geometry: Option<CoordinationGeometry>,
    pub stability_score: Option<StabilityScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterReport {
    #[serde(flatten)]
    pub run: RunInfo,
    pub temperature_k: f64,
    pub systems: Vec<SystemReport>,
}

impl ParameterReport {
    /// Systems ordered from best to worst overall literature agreement
    pub fn ranked(&self) -> Vec<&SystemReport> {
        let mut ranked: Vec<&SystemReport> = self.systems.iter().collect();
        ranked.sort_by(|a, b| {
            let a = a.overall_quality.unwrap_or(f64::NEG_INFINITY);
            let b = b.overall_quality.unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
        ranked
    }
}

fn bond_report(
    bond: &BondParameter,
    oxidation_state: OxidationState,
    temperature_k: f64,
) -> Result<BondReport> {
    Ok(BondReport {
        ligand: bond.ligand.clone(),
        donor: bond.donor,
        r0: bond.r0,
        k: bond.k,
        reduced_mass_amu: bond.reduced_mass()?,
        mode: bond.vibrational_mode()?,
        fluctuation: bond.thermal_fluctuation(temperature_k)?,
        quality: assess_bond(bond, oxidation_state),
    })
}

fn system_report(system: &SystemParameters, temperature_k: f64) -> Result<SystemReport> {
    let bonds = system
        .bonds
        .iter()
        .map(|b| bond_report(b, system.oxidation_state, temperature_k))
        .collect::<Result<Vec<_>>>()?;

    Ok(SystemReport {
        name: system.name.clone(),
        oxidation_state: system.oxidation_state,
        status: system.status.clone(),
        bonds,
        overall_quality: system.overall_quality(),
        mean_force_constant: system.mean_force_constant(),
        geometry: system.coordination_geometry(),
        stability_score: system.stability_score(),
    })
}

pub fn analyze_bonds(table: &ParameterTable, temperature_k: f64) -> Result<ParameterReport> {
    in_stage("bonds", table.systems.len(), || {
        let systems = table
            .systems
            .iter()
            .map(|s| system_report(s, temperature_k))
            .collect::<Result<Vec<_>>>()?;

        Ok(ParameterReport {
            run: RunInfo::new(),
            temperature_k,
            systems,
        })
    })
}
