use crate::assemble::DatasetAssembler;
use crate::error::IngestError;
use crate::registry::Registry;
use crate::table::{read_table, Table, DELIMITER};
use configuration::Geography;
use core_types::Dataset;
use std::path::Path;

/// Reads both tables of a geography from `<data_dir>/<folder>/` and assembles
/// its dataset.
pub fn load_geography(data_dir: &Path, geography: &Geography) -> Result<Dataset, IngestError> {
    let folder = data_dir.join(&geography.folder);

    let metrics = read_table_file(&folder.join(&geography.metrics_file))?;
    let registry = Registry::from_table(&read_table_file(&folder.join(&geography.registry_file))?);

    let dataset = DatasetAssembler::new().assemble(&metrics, &registry, geography)?;

    tracing::info!(
        geography = %geography.label,
        assets = dataset.assets.len(),
        columns = dataset.columns.len(),
        registry = registry.len(),
        reference = ?dataset.reference_asset_id,
        "Dataset loaded."
    );

    Ok(dataset)
}

/// Reads a semicolon separated file.
pub fn read_table_file(path: &Path) -> Result<Table, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read table file.");
    read_table(&bytes, DELIMITER)
}
