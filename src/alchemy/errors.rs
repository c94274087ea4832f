use thiserror::Error;

/// Errors that can arise while loading catalogs or talking to ledger storage.
#[derive(Debug, Error)]
pub enum AlchemyError {
    /// Recipe source missing, unreadable or malformed. Fatal to startup; retry by reloading.
    #[error("failed to load catalog from {source_name}: {reason}")]
    CatalogLoad { source_name: String, reason: String },

    /// Ledger storage could not be read or written. Recovered inside the ledger.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around JSON serialization and deserialization errors.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, lock files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Heat label that is not one of the known settings.
    #[error("unknown heat level: {0}")]
    UnknownHeatLevel(String),
}

impl AlchemyError {
    pub(crate) fn catalog_load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        AlchemyError::CatalogLoad {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
