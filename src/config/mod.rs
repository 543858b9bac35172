use crate::error::AnalysisError;
use crate::geometry::RmsdOptions;
use crate::logging::LoggingConfig;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub rmsd: RmsdOptions,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Blocks used for block averaging
    pub block_count: usize,
    /// Simulation time between consecutive frames (ps)
    pub time_per_frame_ps: f64,
    /// Leading fraction of a series treated as equilibration
    pub equilibration_fraction: f64,
    /// Largest SEM / |mean| still considered converged
    pub convergence_threshold: f64,
    pub temperature_k: f64,
    pub entropy_bins: usize,
    pub mutual_information_bins: usize,
    /// Trailing samples used for density and other tail checks
    pub tail_window: usize,
    /// Energy samples above mean + this many standard deviations are spikes
    pub spike_sigmas: f64,
    pub flexibility: FlexibilityRegions,
    pub stability: StabilityCriteria,
}

/// Per-residue RMSF thresholds and the residues singled out in reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexibilityRegions {
    /// Residues above this RMSF (Å) are flexibility hotspots
    pub hotspot_threshold: f64,
    /// Hotspots at most this many residue numbers apart share a region
    pub hotspot_gap: i64,
    /// Inclusive residue range of the lid loop
    pub lid: [i64; 2],
    pub active_site: Vec<i64>,
}

impl Default for FlexibilityRegions {
    fn default() -> Self {
        Self {
            hotspot_threshold: 1.5,
            hotspot_gap: 2,
            lid: [160, 166],
            active_site: vec![95, 97, 101, 140],
        }
    }
}

/// Limits a structural series must respect to be called stable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityCriteria {
    pub max_mean: f64,
    pub max_std: f64,
    /// Largest |slope| in series units per ns
    pub max_drift_per_ns: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            block_count: 5,
            time_per_frame_ps: 10.0,
            equilibration_fraction: 0.1,
            convergence_threshold: 0.1,
            temperature_k: 300.0,
            entropy_bins: 10,
            mutual_information_bins: 5,
            tail_window: 20,
            spike_sigmas: 3.0,
            flexibility: FlexibilityRegions::default(),
            stability: StabilityCriteria::default(),
        }
    }
}

impl Default for StabilityCriteria {
    fn default() -> Self {
        Self {
            max_mean: 3.0,
            max_std: 0.5,
            max_drift_per_ns: 0.1,
        }
    }
}

impl StabilityCriteria {
    /// All three limits are strict upper bounds
    pub fn accepts(&self, mean: f64, std_dev: f64, drift_per_ns: f64) -> bool {
        mean < self.max_mean && std_dev < self.max_std && drift_per_ns.abs() < self.max_drift_per_ns
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ConfigFormat) -> Result<()> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| AnalysisError::Config(e.to_string()))?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let analysis = &self.analysis;

        if analysis.block_count < 2 {
            errors.push("block_count must be at least 2".to_string());
        }

        if !(analysis.time_per_frame_ps > 0.0) {
            errors.push("time_per_frame_ps must be positive".to_string());
        }

        if !(analysis.equilibration_fraction > 0.0 && analysis.equilibration_fraction < 1.0) {
            errors.push("equilibration_fraction must lie in (0, 1)".to_string());
        }

        if !(analysis.convergence_threshold > 0.0) {
            errors.push("convergence_threshold must be positive".to_string());
        }

        if !(analysis.temperature_k > 0.0) {
            errors.push("temperature_k must be positive".to_string());
        }

        if analysis.entropy_bins == 0 || analysis.mutual_information_bins == 0 {
            errors.push("histogram bin counts must be positive".to_string());
        }

        if analysis.tail_window == 0 {
            errors.push("tail_window must be positive".to_string());
        }

        if !(analysis.spike_sigmas >= 0.0) {
            errors.push("spike_sigmas must be non-negative".to_string());
        }

        let flexibility = &analysis.flexibility;
        if !(flexibility.hotspot_threshold > 0.0) {
            errors.push("flexibility.hotspot_threshold must be positive".to_string());
        }
        if flexibility.hotspot_gap < 1 {
            errors.push("flexibility.hotspot_gap must be at least 1".to_string());
        }
        if flexibility.lid[0] > flexibility.lid[1] {
            errors.push("flexibility.lid must be an ascending residue range".to_string());
        }

        let stability = &analysis.stability;
        for (name, limit) in [
            ("max_mean", stability.max_mean),
            ("max_std", stability.max_std),
            ("max_drift_per_ns", stability.max_drift_per_ns),
        ] {
            if !(limit > 0.0) {
                errors.push(format!("stability.{} must be positive", name));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

pub fn load_config_or_default(config_path: Option<&Path>) -> Config {
    match config_path {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => {
                if let Err(errors) = config.validate() {
                    eprintln!("Configuration validation errors:");
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    eprintln!("Using default configuration instead.");
                    Config::default()
                } else {
                    config
                }
            }
            Err(e) => {
                eprintln!("Failed to load config from '{}': {}", path.display(), e);
                eprintln!("Using default configuration.");
                Config::default()
            }
        },
        None => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
        assert_eq!(Config::default().analysis.block_count, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            "[analysis]\nblock_count = 8\n\n[analysis.stability]\nmax_mean = 2.5\n",
        )
        .unwrap();
        assert_eq!(config.analysis.block_count, 8);
        assert_eq!(config.analysis.stability.max_mean, 2.5);
        assert_eq!(config.analysis.stability.max_std, 0.5);
        assert_eq!(config.analysis.time_per_frame_ps, 10.0);
        assert!(config.rmsd.align);
    }

    #[test]
    fn test_validation_collects_errors() {
        let mut config = Config::default();
        config.analysis.block_count = 1;
        config.analysis.time_per_frame_ps = 0.0;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_nan_settings_rejected() {
        let mut config = Config::default();
        config.analysis.time_per_frame_ps = f64::NAN;
        config.analysis.temperature_k = f64::NAN;
        config.analysis.stability.max_std = f64::NAN;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("stability.max_std")));
    }

    #[test]
    fn test_flexibility_regions_from_toml() {
        let config: Config = toml::from_str(
            "[analysis]\nspike_sigmas = 2.5\n\n[analysis.flexibility]\nlid = [150, 155]\n",
        )
        .unwrap();
        assert_eq!(config.analysis.spike_sigmas, 2.5);
        assert_eq!(config.analysis.flexibility.lid, [150, 155]);
        assert_eq!(config.analysis.flexibility.hotspot_threshold, 1.5);
        assert_eq!(config.analysis.flexibility.active_site, vec![95, 97, 101, 140]);

        let mut reversed = Config::default();
        reversed.analysis.flexibility.lid = [170, 160];
        assert_eq!(reversed.validate().unwrap_err().len(), 1);
    }

    #[test]
    fn test_save_and_reload_both_formats() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.analysis.block_count = 4;
        config.rmsd.parallel = false;

        for (name, format) in [("c.toml", ConfigFormat::Toml), ("c.json", ConfigFormat::Json)] {
            let path = dir.path().join(name);
            config.save_to_file(&path, format).unwrap();
            let loaded = Config::load_from_file(&path).unwrap();
            assert_eq!(loaded, config);
        }
    }

    #[test]
    fn test_bad_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis]\nblock_count = \"five\"\n").unwrap();
        assert_eq!(load_config_or_default(Some(&path)), Config::default());
    }
}
