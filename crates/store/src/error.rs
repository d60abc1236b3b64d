use thiserror::Error;

/// Error reported by a [`ParameterStore`](crate::ParameterStore) backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Raw store entry without a usable name
    #[error("Malformed entry: {0}")]
    MalformedEntry(String),

    #[error("Listing {path} failed: {source}")]
    RemoteListFailure {
        path: String,
        #[source]
        source: BackendError,
    },

    #[error("Writing {path} failed: {source}")]
    RemoteWriteFailure {
        path: String,
        #[source]
        source: BackendError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEntry(msg.into())
    }

    pub fn list_failure(path: impl Into<String>, source: BackendError) -> Self {
        Self::RemoteListFailure {
            path: path.into(),
            source,
        }
    }

    pub fn write_failure(path: impl Into<String>, source: BackendError) -> Self {
        Self::RemoteWriteFailure {
            path: path.into(),
            source,
        }
    }
}
