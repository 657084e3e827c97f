//! Data models

pub mod safety_check;
pub mod analysis;

pub use safety_check::*;
pub use analysis::*;
