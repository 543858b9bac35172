//! Canonical metal-ligand bond parameter records.
//!
//! One record type covers every system; tables are loaded from TOML:
//!
//! ```toml
//! [[systems]]
//! name = "BiOx+2"
//! oxidation_state = "Mn(II)"
//! status = "STABLE"
//!
//! [[systems.bonds]]
//! ligand = "His95"
//! donor = "N"
//! r0 = 2.406
//! k = 14.0
//! ```

use super::harmonic::{self, VibrationalMode};
use crate::error::AnalysisError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MN_MASS_AMU: f64 = 55.0;

/// Donor atom of the coordinating ligand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Donor {
    N,
    O,
}

impl Donor {
    pub fn mass_amu(&self) -> f64 {
        match self {
            Donor::N => 14.0,
            Donor::O => 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OxidationState {
    #[serde(rename = "Mn(II)", alias = "MnII")]
    MnII,
    #[serde(rename = "Mn(III)", alias = "MnIII")]
    MnIII,
}

impl std::fmt::Display for OxidationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OxidationState::MnII => write!(f, "Mn(II)"),
            OxidationState::MnIII => write!(f, "Mn(III)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Residue {
    His,
    Glu,
    Other,
}

impl Residue {
    /// Residue type from a ligand label such as "His95" or "Glu101"
    pub fn from_ligand(ligand: &str) -> Self {
        if ligand.contains("Glu") {
            Residue::Glu
        } else if ligand.contains("His") {
            Residue::His
        } else {
            Residue::Other
        }
    }
}

/// Harmonic bond between the metal and one ligand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondParameter {
    pub ligand: String,
    pub donor: Donor,
    /// Equilibrium distance (Å)
    pub r0: f64,
    /// Force constant (kcal/mol/Å²)
    pub k: f64,
}

impl BondParameter {
    pub fn residue(&self) -> Residue {
        Residue::from_ligand(&self.ligand)
    }

    pub fn reduced_mass(&self) -> Result<f64> {
        harmonic::reduced_mass(MN_MASS_AMU, self.donor.mass_amu())
    }

    pub fn vibrational_mode(&self) -> Result<VibrationalMode> {
        harmonic::vibrational_mode(self.k, self.reduced_mass()?)
    }

    pub fn thermal_fluctuation(&self, temperature_k: f64) -> Result<f64> {
        harmonic::thermal_fluctuation(self.k, temperature_k)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemParameters {
    pub name: String,
    pub oxidation_state: OxidationState,
    /// Observed simulation outcome, e.g. "STABLE" or "CRASHED"
    #[serde(default)]
    pub status: Option<String>,
    pub bonds: Vec<BondParameter>,
}

impl SystemParameters {
    pub fn bond_quality(&self) -> Vec<BondQuality> {
        self.bonds
            .iter()
            .map(|b| assess_bond(b, self.oxidation_state))
            .collect()
    }

    /// Mean combined quality over all bonds; `None` without bonds
    pub fn overall_quality(&self) -> Option<f64> {
        if self.bonds.is_empty() {
            return None;
        }
        let scores = self.bond_quality();
        Some(scores.iter().map(|q| q.combined).sum::<f64>() / scores.len() as f64)
    }

    pub fn mean_force_constant(&self) -> Option<f64> {
        if self.bonds.is_empty() {
            return None;
        }
        Some(self.bonds.iter().map(|b| b.k).sum::<f64>() / self.bonds.len() as f64)
    }

    /// Spread of the equilibrium bond lengths around the metal
    pub fn coordination_geometry(&self) -> Option<CoordinationGeometry> {
        let r0: Vec<f64> = self.bonds.iter().map(|b| b.r0).collect();
        let (min, max) = min_max(&r0)?;
        let n = r0.len() as f64;
        let mean_r0 = r0.iter().sum::<f64>() / n;
        let std_r0 = (r0.iter().map(|r| (r - mean_r0).powi(2)).sum::<f64>() / n).sqrt();
        Some(CoordinationGeometry {
            coordination_number: r0.len(),
            mean_r0,
            std_r0,
            range_r0: max - min,
            cv_percent: std_r0 / mean_r0 * 100.0,
            asymmetry: r0.iter().map(|r| (r - mean_r0).abs()).sum::<f64>() / n,
        })
    }

    /// Heuristic instability score; lower is more stable
    pub fn stability_score(&self) -> Option<StabilityScore> {
        let k: Vec<f64> = self.bonds.iter().map(|b| b.k).collect();
        let (k_min, k_max) = min_max(&k)?;
        let geometry = self.coordination_geometry()?;
        let mean_k = k.iter().sum::<f64>() / k.len() as f64;

        let force_constant = mean_k / 30.0;
        let bond_length = (STABILITY_REFERENCE_R0 - geometry.mean_r0) * 5.0;
        let heterogeneity = (k_max - k_min) / 20.0;
        Some(StabilityScore {
            force_constant,
            bond_length,
            heterogeneity,
            total: force_constant + bond_length + heterogeneity,
        })
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Bond lengths shorter than this raise the stability score
const STABILITY_REFERENCE_R0: f64 = 2.2;

/// r0 statistics over the coordinating bonds (population std)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinationGeometry {
    pub coordination_number: usize,
    pub mean_r0: f64,
    pub std_r0: f64,
    pub range_r0: f64,
    /// std / mean, in percent
    pub cv_percent: f64,
    /// Mean absolute deviation of r0 from its mean
    pub asymmetry: f64,
}

/// Weighted score: stiff bonds, short bonds and uneven force constants all
/// push it up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityScore {
    /// mean k / 30
    pub force_constant: f64,
    /// (2.2 Å - mean r0) * 5
    pub bond_length: f64,
    /// (k max - k min) / 20
    pub heterogeneity: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    #[serde(default)]
    pub systems: Vec<SystemParameters>,
}

impl ParameterTable {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: ParameterTable = toml::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn system(&self, name: &str) -> Option<&SystemParameters> {
        self.systems.iter().find(|s| s.name == name)
    }

    fn validate(&self) -> Result<()> {
        for system in &self.systems {
            for bond in &system.bonds {
                if !(bond.r0 > 0.0 && bond.k > 0.0) {
                    return Err(AnalysisError::Config(format!(
                        "{} {}: r0 and k must be positive (r0 = {}, k = {})",
                        system.name, bond.ligand, bond.r0, bond.k
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Literature ranges for one oxidation state and residue type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteratureRange {
    pub oxidation_state: OxidationState,
    pub residue: Residue,
    pub r0: (f64, f64),
    pub k: (f64, f64),
}

pub const LITERATURE: [LiteratureRange; 4] = [
    LiteratureRange {
        oxidation_state: OxidationState::MnII,
        residue: Residue::His,
        r0: (2.15, 2.30),
        k: (25.0, 50.0),
    },
    LiteratureRange {
        oxidation_state: OxidationState::MnII,
        residue: Residue::Glu,
        r0: (2.00, 2.20),
        k: (25.0, 45.0),
    },
    LiteratureRange {
        oxidation_state: OxidationState::MnIII,
        residue: Residue::His,
        r0: (1.95, 2.10),
        k: (70.0, 100.0),
    },
    LiteratureRange {
        oxidation_state: OxidationState::MnIII,
        residue: Residue::Glu,
        r0: (1.80, 2.00),
        k: (90.0, 130.0),
    },
];

/// Reference range for a pair, falling back to Mn(II)-His
pub fn literature_range(oxidation_state: OxidationState, residue: Residue) -> LiteratureRange {
    LITERATURE
        .iter()
        .find(|r| r.oxidation_state == oxidation_state && r.residue == residue)
        .copied()
        .unwrap_or(LITERATURE[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondQuality {
    pub r0_score: f64,
    pub k_score: f64,
    pub combined: f64,
}

fn range_score(value: f64, (min, max): (f64, f64), penalty_per_unit: f64) -> f64 {
    if (min..=max).contains(&value) {
        100.0
    } else {
        let deviation = (value - min).abs().min((value - max).abs());
        (100.0 - deviation * penalty_per_unit).max(0.0)
    }
}

/// Score a bond against literature (0-100, higher is closer).
///
/// r0 loses 20 points per 0.1 Å outside the range, k loses 2 points per unit.
pub fn assess_bond(bond: &BondParameter, oxidation_state: OxidationState) -> BondQuality {
    let range = literature_range(oxidation_state, bond.residue());
    let r0_score = range_score(bond.r0, range.r0, 200.0);
    let k_score = range_score(bond.k, range.k, 2.0);
    BondQuality {
        r0_score,
        k_score,
        combined: (r0_score + k_score) / 2.0,
    }
}
