use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unable to find file or directory named {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[source] CodecError),

    #[error("Deserialization error: {0}")]
    Deserialize(#[source] CodecError),
}

/// Encoder/decoder failure from whichever record format the store uses.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ShelfError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShelfError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ShelfError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;
