//! Scripted provider for tests and benchmarks.

use crate::{Completion, CompletionError, CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(CompletionError),
}

/// Answers from a queue of scripted outcomes, then from a fallback.
pub struct MockProvider {
    queue: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    delay: Option<Duration>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Always reply with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_fallback(Scripted::Reply(text.into()))
    }

    /// Always fail with `err`.
    pub fn failing(err: CompletionError) -> Self {
        Self::with_fallback(Scripted::Fail(err))
    }

    fn with_fallback(fallback: Scripted) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.queue_mut().push_back(Scripted::Reply(text.into()));
    }

    pub fn push_failure(&self, err: CompletionError) {
        self.queue_mut().push_back(Scripted::Fail(err));
    }

    /// Requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn queue_mut(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, CompletionError> {
        let model = request.model.clone();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let outcome = self.queue_mut().pop_front().unwrap_or_else(|| self.fallback.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match outcome {
            Scripted::Reply(content) => Ok(Completion {
                model,
                content,
                finish_reason: Some("stop".into()),
            }),
            Scripted::Fail(err) => Err(err),
        }
    }
}
