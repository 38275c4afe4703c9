use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to fetch {collection}: {message}")]
    Fetch {
        collection: &'static str,
        message: String,
    },
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),
    #[error("Maintenance task not found: {0}")]
    TaskNotFound(Uuid),
    #[error("Invalid period: month {month} of {year}")]
    InvalidPeriod { month: u32, year: i32 },
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn fetch(collection: &'static str, message: impl Into<String>) -> Self {
        CoreError::Fetch {
            collection,
            message: message.into(),
        }
    }

    /// Whether the error stems from reading ledger data rather than from the request.
    pub fn is_data_failure(&self) -> bool {
        matches!(
            self,
            CoreError::Fetch { .. }
                | CoreError::SnapshotNotFound(_)
                | CoreError::Storage(_)
                | CoreError::Serde(_)
                | CoreError::Io(_)
        )
    }
}
