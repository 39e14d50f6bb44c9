use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Quota exceeded writing '{key}': {size} bytes over a {quota} byte limit")]
    QuotaExceeded { key: String, size: usize, quota: usize },

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}
