//! # Return Map Analytics
//!
//! Turns a raw metrics table into typed columns and derived metrics.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** This crate has no knowledge of files or CSV. It receives
//!   header strings and already-parsed assets and depends only on `core-types`.
//! - **Soft failure:** Unrecognised headers are ignored and missing inputs
//!   become missing values. Nothing here returns an error.
//!
//! ## Public API
//!
//! - `ColumnExtractor`: classifies raw headers into return and metric columns.
//! - `MetricDeriver`: adds excess return and Sharpe ratio relative to the
//!   risk-free asset.

// Declare the modules that constitute this crate.
pub mod columns;
pub mod engine;

// Re-export the key components to create a clean, public-facing API.
pub use columns::{excess_label, ColumnExtractor, ExtractedColumns};
pub use engine::{MetricDeriver, ReferenceMetrics};
