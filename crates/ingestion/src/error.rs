use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid dataset: {0}")]
    Dataset(#[from] CoreError),
}
