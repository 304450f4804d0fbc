use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Model error: {0}")]
    Model(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Malformed identifier: {0}")]
    MalformedId(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
