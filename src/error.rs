//! Error types for trajectory alignment and statistics
//!
//! Every core operation reports input-shape problems synchronously through
//! [`AnalysisError`]. Nothing here is transient, so nothing is retried.

use thiserror::Error;

/// Errors produced by the analysis library
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Two inputs that must correspond have incompatible lengths
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being compared
        context: String,
        /// Length the operation required
        expected: usize,
        /// Length that was supplied
        found: usize,
    },

    /// Fewer samples, points or blocks than the operation needs
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Input has no well-defined answer (e.g. zero variance)
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A physical parameter is out of its valid domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Parse error with location information
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// Line number where the error occurred (1-based)
        line: usize,
        /// Error message
        message: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration or parameter file
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Create a dimension mismatch error
    pub fn mismatch(context: impl Into<String>, expected: usize, found: usize) -> Self {
        AnalysisError::DimensionMismatch {
            context: context.into(),
            expected,
            found,
        }
    }

    /// Create a parse error at a specific line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        AnalysisError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::DimensionMismatch { .. } => "dimension_mismatch",
            AnalysisError::InsufficientData(_) => "insufficient_data",
            AnalysisError::DegenerateInput(_) => "degenerate_input",
            AnalysisError::InvalidParameter(_) => "invalid_parameter",
            AnalysisError::Parse { .. } => "parse",
            AnalysisError::Io(_) => "io",
            AnalysisError::Config(_) => "config",
        }
    }
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message() {
        let err = AnalysisError::mismatch("frame 3", 10, 9);
        assert_eq!(
            err.to_string(),
            "Dimension mismatch in frame 3: expected 10, found 9"
        );
        assert_eq!(err.kind(), "dimension_mismatch");
    }

    #[test]
    fn test_parse_message() {
        let err = AnalysisError::parse(12, "expected 4 fields");
        assert_eq!(err.to_string(), "Parse error at line 12: expected 4 fields");
    }
}
