use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Header problems detected while inferring a schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("dataset has no header fields")]
    EmptyHeader,
    #[error("duplicate column name '{0}' in header")]
    DuplicateColumn(String),
}

/// Failures talking to the configuration store.
///
/// A missing configuration is *not* a store error; `load` reports it as `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("at least two columns are needed to build a chart, found {found}")]
    InsufficientColumns { found: usize },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("unknown filter slot '{0}'")]
    UnknownFilter(String),

    #[error("could not parse dataset: {0}")]
    Ingestion(#[from] csv::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
