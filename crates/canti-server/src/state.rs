//! Application state shared across all handlers.

use crate::relay::ChatRelay;
use canti_completion::{CompletionProvider, OpenAiProvider};
use canti_core::CantiConfig;
use canti_session::SessionManager;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        let sessions = Arc::new(SessionManager::new());
        Self {
            relay: Arc::new(ChatRelay::new(sessions, provider, model)),
            start_time: std::time::Instant::now(),
        }
    }

    /// State backed by the OpenAI provider described in `cfg`.
    pub fn from_config(cfg: &CantiConfig) -> canti_core::Result<Self> {
        let provider = OpenAiProvider::from_config(&cfg.upstream)?;
        Ok(Self::new(Arc::new(provider), cfg.upstream.model.clone()))
    }

    pub fn sessions(&self) -> &SessionManager {
        self.relay.sessions()
    }
}
