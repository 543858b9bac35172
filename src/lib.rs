pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod physics;
pub mod report;
pub mod stats;

pub use analysis::*;
pub use data::*;
pub use error::AnalysisError;
pub use geometry::*;

pub type Result<T> = std::result::Result<T, AnalysisError>;
