//! Export functionality for analysis reports.

mod report;

pub use report::*;
