//! Harmonic bond model and metal-site parameter tables
pub mod harmonic;
pub mod params;

pub use harmonic::{reduced_mass, thermal_fluctuation, vibrational_mode, VibrationalMode};
pub use params::{
    assess_bond, literature_range, BondParameter, BondQuality, CoordinationGeometry, Donor,
    OxidationState, ParameterTable, Residue, StabilityScore, SystemParameters,
};
