//! Statistics over scalar time series
//!
//! Small pure functions with explicit edge-case contracts: block averaging,
//! least-squares drift fits, correlation, information measures and a
//! normality heuristic.

pub mod block;
pub mod correlation;
pub mod descriptive;
pub mod information;
pub mod normality;
pub mod regression;

pub use block::{block_average, BlockAverage};
pub use correlation::{pearson, Correlation};
pub use descriptive::{
    is_constant, mean, spikes_above, split_fraction, std_dev, tail_window, variance, EarlyLate,
    Spikes, Summary,
};
pub use information::{entropy, mutual_information};
pub use normality::{normality_heuristic, NormalityHeuristic};
pub use regression::{fit_series, linear_regression, LinearFit};
