//! # Return Map Chart
//!
//! Assembles the render plan of the map: for every column its label, baseline
//! and color scale, and for every asset a positioned, formatted and colored
//! card, plus the legend for the chosen highlight mode.

pub mod format;
pub mod plan;

pub use format::{format_number, format_percent, format_value, MISSING};
pub use plan::{resolve_reference, Card, ChartColumn, ChartPlan, Legend, LegendChip};
