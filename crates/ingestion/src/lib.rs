//! # Return Map Ingestion
//!
//! Reads the two semicolon separated tables of a geography and turns them
//! into a `Dataset`:
//!
//! - the **metrics table**, one row per asset with its yearly returns and
//!   risk metrics under raw, possibly Portuguese, headers;
//! - the **asset registry**, curated display names, classes and colors.
//!
//! This is the only crate that touches the filesystem. Everything downstream
//! works on the in-memory `Dataset`.

pub mod assemble;
pub mod error;
pub mod loader;
pub mod registry;
pub mod table;

pub use assemble::{subtitle, DatasetAssembler};
pub use error::IngestError;
pub use loader::{load_geography, read_table_file};
pub use registry::{Registry, RegistryEntry};
pub use table::{read_table, Record, Table, DELIMITER};
