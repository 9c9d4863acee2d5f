use thiserror::Error;

#[derive(Error, Debug)]
pub enum CantiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Upstream failure: {0}")]
    Upstream(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CantiError>;
