//! Session-scoped chat relay: seed, append, complete, record.

use canti_completion::{CompletionProvider, CompletionRequest};
use canti_core::CantiError;
use canti_session::{render_context, ChatMessage, Session, SessionManager, UserContext, SYSTEM_PROMPT};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::Instrument;

/// A validated relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub session_id: i64,
    pub user_message: String,
    pub context: UserContext,
}

impl RelayRequest {
    /// Parse a JSON body of the form
    /// `{ sessionId: integer, userMessage: string, userLocation, userWeather }`.
    ///
    /// Only `sessionId` and `userMessage` are type-checked. Location and weather
    /// strings are taken verbatim; missing or null values become empty text and
    /// any other value is used as its JSON text.
    pub fn from_slice(body: &[u8]) -> Result<Self, CantiError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| CantiError::InvalidRequest(format!("body is not valid JSON: {e}")))?;
        let obj = value
            .as_object()
            .ok_or_else(|| CantiError::InvalidRequest("body must be a JSON object".into()))?;
        Self::from_map(obj)
    }

    fn from_map(obj: &Map<String, Value>) -> Result<Self, CantiError> {
        let session_id = obj
            .get("sessionId")
            .and_then(integral_id)
            .ok_or_else(|| CantiError::InvalidRequest("sessionId must be an integer".into()))?;
        let user_message = obj
            .get("userMessage")
            .and_then(Value::as_str)
            .ok_or_else(|| CantiError::InvalidRequest("userMessage must be a string".into()))?
            .to_string();

        Ok(Self {
            session_id,
            user_message,
            context: UserContext::new(
                context_text(obj.get("userLocation")),
                context_text(obj.get("userWeather")),
            ),
        })
    }
}

/// Any JSON number with no fractional part that fits in an i64, so `3`, `3.0`
/// and `3e0` name the same session. Larger integers are rejected.
fn integral_id(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn context_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Successful exchange: the reply and the full updated transcript.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayReply {
    pub assistant_message: String,
    pub messages: Vec<ChatMessage>,
}

pub struct ChatRelay {
    sessions: Arc<SessionManager>,
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl ChatRelay {
    pub fn new(sessions: Arc<SessionManager>, provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            sessions,
            provider,
            model: model.into(),
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run [`ChatRelay::exchange`] on its own task so it completes even if
    /// the caller stops waiting. The task inherits the current span.
    pub async fn spawn_exchange(self: Arc<Self>, request: RelayRequest) -> Result<RelayReply, CantiError> {
        let span = tracing::Span::current();
        tokio::spawn(async move { self.exchange(request).await }.instrument(span))
            .await
            .map_err(|e| CantiError::Other(anyhow::anyhow!("exchange task failed: {e}")))?
    }

    /// Run one chat turn for `request.session_id`.
    ///
    /// The session stays locked until the provider answers, so turns on the
    /// same session never interleave. On provider failure the user message is
    /// kept and its turn is marked failed; the same happens if this future is
    /// dropped before the provider answers.
    pub async fn exchange(&self, request: RelayRequest) -> Result<RelayReply, CantiError> {
        let context = render_context(&request.context);
        let handle = self.sessions.get_or_create(request.session_id);
        let mut session = handle.lock_owned().await;

        if session.seed(SYSTEM_PROMPT, &context) {
            tracing::debug!("seeded new session");
        }
        let turn = session.begin_turn(request.user_message);
        let messages = session.messages().to_vec();
        let mut open = OpenTurn { session, turn, settled: false };

        let completion = self
            .provider
            .complete(CompletionRequest {
                model: self.model.clone(),
                messages,
            })
            .await;
        open.settled = true;

        match completion {
            Ok(completion) => {
                open.session
                    .answer_turn(turn, completion.content.as_str())
                    .map_err(anyhow::Error::from)?;
                tracing::info!(
                    model = %completion.model,
                    messages = open.session.message_count(),
                    "exchange complete"
                );
                Ok(RelayReply {
                    assistant_message: completion.content,
                    messages: open.session.messages().to_vec(),
                })
            }
            Err(err) => {
                if let Err(e) = open.session.fail_turn(turn) {
                    tracing::warn!(error = %e, "could not mark turn failed");
                }
                Err(err.into())
            }
        }
    }
}

/// Locked session with a turn awaiting the provider. Marks the turn failed
/// on drop unless it was settled.
struct OpenTurn {
    session: OwnedMutexGuard<Session>,
    turn: usize,
    settled: bool,
}

impl Drop for OpenTurn {
    fn drop(&mut self) {
        if !self.settled && self.session.fail_turn(self.turn).is_ok() {
            tracing::warn!(turn = self.turn, "exchange abandoned before the provider answered");
        }
    }
}
