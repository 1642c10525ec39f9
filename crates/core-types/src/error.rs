use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Duplicate asset id '{0}' in dataset")]
    DuplicateAsset(String),

    #[error("Duplicate column id '{0}' in dataset")]
    DuplicateColumn(String),
}
