//! Upstream chat-completion providers.
//!
//! The relay talks to a [`CompletionProvider`]; [`OpenAiProvider`] is the
//! production implementation and [`MockProvider`] a scripted stand-in.

pub mod error;
pub mod mock;
pub mod openai;

pub use error::CompletionError;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use canti_session::ChatMessage;
use serde::{Deserialize, Serialize};

/// A single chat completion over a full transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// The first choice of a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub model: String,
    pub content: String,
    pub finish_reason: Option<String>,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError>;
}
