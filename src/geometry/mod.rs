//! Point sets, rigid-body superposition, RMSD reduction and per-point fluctuations
pub mod kabsch;
pub mod point_set;
pub mod rmsd;
pub mod rmsf;

pub use kabsch::*;
pub use point_set::*;
pub use rmsd::*;
pub use rmsf::*;
