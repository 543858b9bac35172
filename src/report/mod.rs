//! Plain-text rendering of analysis reports for the terminal
pub mod tables;

pub use tables::*;
