//! # Return Map Core Types
//!
//! The shared vocabulary of the workspace: assets, columns, datasets and the
//! render choices of a viewer. Every other crate depends on this one; it has
//! no knowledge of files, CSV or rendering.

pub mod enums;
pub mod error;
pub mod structs;
pub mod text;

// Re-export the core types to provide a clean public API.
pub use enums::{ColumnKind, DisplayMode, HighlightMode, MetricId, SortDirection};
pub use error::CoreError;
pub use structs::{Asset, Column, Dataset, RenderInput};
