//! Analysis modules.
//!
//! Statistics over collected responses and the insights built on them.

pub mod aggregator;
pub mod insights;

pub use aggregator::*;
pub use insights::generate_insights;
