use crate::error::AnalysisError;
use crate::Result;
use serde::{Deserialize, Serialize};

pub const KCAL_TO_J: f64 = 4184.0;
pub const ANGSTROM_TO_M: f64 = 1e-10;
pub const AMU_TO_KG: f64 = 1.66054e-27;
pub const AVOGADRO: f64 = 6.022e23;
pub const SPEED_OF_LIGHT_CM_S: f64 = 3e10;
/// Boltzmann constant in kcal/(mol·K)
pub const BOLTZMANN_KCAL: f64 = 1.987e-3;

/// Vibrational mode of a harmonic bond
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VibrationalMode {
    pub wavenumber_cm1: f64,
    pub period_fs: f64,
}

fn require_positive(value: f64, name: &str) -> Result<()> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(AnalysisError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

pub fn reduced_mass(m1_amu: f64, m2_amu: f64) -> Result<f64> {
    require_positive(m1_amu, "mass")?;
    require_positive(m2_amu, "mass")?;
    Ok(m1_amu * m2_amu / (m1_amu + m2_amu))
}

/// Frequency of a bond with force constant `k` (kcal/mol/Å²) and reduced mass in amu
pub fn vibrational_mode(k_kcal: f64, reduced_mass_amu: f64) -> Result<VibrationalMode> {
    require_positive(k_kcal, "force constant")?;
    require_positive(reduced_mass_amu, "reduced mass")?;

    let k_si = k_kcal * KCAL_TO_J / ANGSTROM_TO_M.powi(2) / AVOGADRO;
    let m_si = reduced_mass_amu * AMU_TO_KG;
    let omega = (k_si / m_si).sqrt();
    let freq_hz = omega / (2.0 * std::f64::consts::PI);

    Ok(VibrationalMode {
        wavenumber_cm1: freq_hz / SPEED_OF_LIGHT_CM_S,
        period_fs: 1e15 / freq_hz,
    })
}

/// RMS bond-length fluctuation (Å) from equipartition: sqrt(k_B T / k)
pub fn thermal_fluctuation(k_kcal: f64, temperature_k: f64) -> Result<f64> {
    require_positive(k_kcal, "force constant")?;
    require_positive(temperature_k, "temperature")?;
    Ok((BOLTZMANN_KCAL * temperature_k / k_kcal).sqrt())
}
