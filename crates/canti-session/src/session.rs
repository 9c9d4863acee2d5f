use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One conversation turn as sent upstream and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Whether the prompt/context seed pair has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedState {
    Uninitialized,
    Seeded,
}

/// Outcome of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnStatus {
    Pending,
    Answered,
    Failed,
}

/// A user message and what became of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Index of the user message in the transcript.
    pub message_index: usize,
    pub status: TurnStatus,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown turn {0}")]
    UnknownTurn(usize),
    #[error("Turn {turn} is already {status:?}")]
    TurnClosed { turn: usize, status: TurnStatus },
}

/// Conversation state for one session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: i64,
    seed: SeedState,
    messages: Vec<ChatMessage>,
    turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            seed: SeedState::Uninitialized,
            messages: Vec::new(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Full transcript in conversation order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Write the system prompt and rendered context, once per session.
    /// Returns false if the session was already seeded.
    pub fn seed(&mut self, prompt: &str, context: &str) -> bool {
        if self.seed == SeedState::Seeded {
            return false;
        }
        self.messages.push(ChatMessage::system(prompt));
        self.messages.push(ChatMessage::system(context));
        self.seed = SeedState::Seeded;
        self.touch();
        true
    }

    /// Append a user message and open a pending turn for it.
    pub fn begin_turn(&mut self, content: impl Into<String>) -> usize {
        self.messages.push(ChatMessage::user(content));
        self.turns.push(Turn {
            message_index: self.messages.len() - 1,
            status: TurnStatus::Pending,
        });
        self.touch();
        self.turns.len() - 1
    }

    /// Append the assistant reply for a pending turn.
    pub fn answer_turn(&mut self, turn: usize, reply: impl Into<String>) -> Result<&ChatMessage, SessionError> {
        self.close_turn(turn, TurnStatus::Answered)?;
        self.messages.push(ChatMessage::assistant(reply));
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Mark a pending turn as failed. The user message stays in the transcript.
    pub fn fail_turn(&mut self, turn: usize) -> Result<(), SessionError> {
        self.close_turn(turn, TurnStatus::Failed)
    }

    fn close_turn(&mut self, turn: usize, status: TurnStatus) -> Result<(), SessionError> {
        let record = self.turns.get_mut(turn).ok_or(SessionError::UnknownTurn(turn))?;
        if record.status != TurnStatus::Pending {
            return Err(SessionError::TurnClosed { turn, status: record.status });
        }
        record.status = status;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session(id={}, messages={}, seed={:?})", self.id, self.messages.len(), self.seed)
    }
}
