//! Domain models for the rx-verify system.

mod analysis;
mod drug;
mod knowledge;

pub use analysis::*;
pub use drug::*;
pub use knowledge::*;
