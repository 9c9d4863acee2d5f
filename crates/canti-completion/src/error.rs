use canti_core::CantiError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),
    #[error("Response contained no choices")]
    NoChoices,
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CompletionError::MalformedResponse(err.to_string())
        } else {
            CompletionError::Transport(err.to_string())
        }
    }
}

impl From<CompletionError> for CantiError {
    fn from(err: CompletionError) -> Self {
        CantiError::Upstream(err.to_string())
    }
}
