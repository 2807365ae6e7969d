use thiserror::Error;

/// All errors the dataset layer can produce.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The named dataset (or raw file) does not exist in the data directory.
    #[error("dataset not found: {0}")]
    NotFound(String),

    /// An upload was rejected before any disk write.
    #[error("only .csv files are allowed (got '{0}')")]
    InvalidExtension(String),

    /// The filename is not a single path component.
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// The filesystem refused a delete.
    #[error("permission denied deleting '{0}'")]
    PermissionDenied(String),

    /// The file exists but could not be parsed as CSV.
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
