//! Logging configuration system
//!
//! Per-component log levels, output destinations and presets for
//! interactive and batch use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Event target of the command-line binary
const BINARY_TARGET: &str = "oxdc";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub global_level: String,

    /// Enable console output
    pub console_output: bool,

    /// Directory for JSON log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// Include file location in logs
    pub include_file_location: bool,

    /// Superposition and RMSD reduction
    pub geometry_level: String,

    /// Block averaging, regression and other statistics
    pub stats_level: String,

    /// File loaders
    pub data_level: String,

    /// Series and RMSD reports
    pub analysis_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: "info".to_string(),
            console_output: true,
            log_directory: None,
            include_file_location: false,
            geometry_level: "info".to_string(),
            stats_level: "info".to_string(),
            data_level: "info".to_string(),
            analysis_level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Verbose configuration for debugging an analysis
    pub fn development() -> Self {
        Self {
            global_level: "debug".to_string(),
            console_output: true,
            log_directory: Some(PathBuf::from("logs")),
            include_file_location: true,
            geometry_level: "trace".to_string(),
            stats_level: "debug".to_string(),
            data_level: "debug".to_string(),
            analysis_level: "debug".to_string(),
        }
    }

    /// Warnings only, console output, no files
    pub fn quiet() -> Self {
        Self {
            global_level: "warn".to_string(),
            geometry_level: "warn".to_string(),
            stats_level: "warn".to_string(),
            data_level: "warn".to_string(),
            analysis_level: "warn".to_string(),
            ..Self::default()
        }
    }

    /// Same configuration with every level set to `level`
    pub fn with_level(mut self, level: &str) -> Self {
        for slot in [
            &mut self.global_level,
            &mut self.geometry_level,
            &mut self.stats_level,
            &mut self.data_level,
            &mut self.analysis_level,
        ] {
            *slot = level.to_string();
        }
        self
    }

    /// Validate the configuration and provide helpful error messages
    pub fn validate(&self) -> Result<(), String> {
        for (name, level) in [
            ("global_level", &self.global_level),
            ("geometry_level", &self.geometry_level),
            ("stats_level", &self.stats_level),
            ("data_level", &self.data_level),
            ("analysis_level", &self.analysis_level),
        ] {
            if !VALID_LEVELS.contains(&level.as_str()) {
                return Err(format!(
                    "Invalid {}: {}. Must be one of: {:?}",
                    name, level, VALID_LEVELS
                ));
            }
        }

        if let Some(ref log_dir) = self.log_directory {
            if let Some(parent) = log_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(format!("Log directory parent does not exist: {:?}", parent));
                }
            }
        }

        Ok(())
    }

    /// Get the effective log level for a specific component
    pub fn get_component_level(&self, component: &str) -> &str {
        match component {
            "geometry" | "rmsd" | "kabsch" => &self.geometry_level,
            "stats" | "statistics" => &self.stats_level,
            "data" | "loader" => &self.data_level,
            "analysis" | "report" => &self.analysis_level,
            _ => &self.global_level,
        }
    }

    /// `EnvFilter` directives: the global level for the library and the
    /// `oxdc` binary, plus one per component module
    pub fn filter_directives(&self) -> String {
        let krate = env!("CARGO_PKG_NAME").replace('-', "_");
        let mut directives = vec![
            format!("{}={}", krate, self.global_level),
            format!("{}={}", BINARY_TARGET, self.global_level),
        ];
        for component in ["geometry", "stats", "data", "analysis"] {
            directives.push(format!(
                "{}::{}={}",
                krate,
                component,
                self.get_component_level(component)
            ));
        }
        directives.join(",")
    }
}
