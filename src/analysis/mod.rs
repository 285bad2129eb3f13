//! Salary aggregation.
//!
//! Pure functions over salary records; no I/O happens here.

pub mod aggregator;

pub use aggregator::*;
