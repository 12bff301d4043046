use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// Rejected input. Raised before the store is touched.
    #[error("{0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl RecordError {
    pub fn validation(message: impl Into<String>) -> Self {
        RecordError::Validation(message.into())
    }
}

pub type RecordResult<T> = Result<T, RecordError>;
