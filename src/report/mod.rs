//! PDF report rendering.

pub mod fonts;
pub mod generator;

pub use generator::{render_pdf, write_pdf, ReportDocument};
