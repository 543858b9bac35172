pub mod loader;
pub mod mdout;

pub use loader::*;
pub use mdout::*;
