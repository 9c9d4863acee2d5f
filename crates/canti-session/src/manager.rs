use super::Session;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared, individually locked session. The lock is held for a whole exchange.
pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// Process-wide session registry. Sessions live until the process exits.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<i64, SessionHandle>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, creating an empty one on first reference.
    pub fn get_or_create(&self, id: i64) -> SessionHandle {
        let mut sessions = self.lock();
        sessions
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!(session_id = id, "creating session");
                Arc::new(tokio::sync::Mutex::new(Session::new(id)))
            })
            .clone()
    }

    pub fn get(&self, id: i64) -> Option<SessionHandle> {
        self.lock().get(&id).cloned()
    }

    /// Copy of the session's current state, waiting for any exchange in flight.
    pub async fn snapshot(&self, id: i64) -> Option<Session> {
        let handle = self.get(id)?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    pub fn contains(&self, id: i64) -> bool {
        self.lock().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
