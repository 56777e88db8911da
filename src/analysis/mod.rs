//! Analysis modules.
//!
//! Price parsing and the single-pass sales aggregation.

pub mod aggregator;
pub mod price;

pub use aggregator::*;
pub use price::PriceFormat;
