use crate::storage::{KeyValueStore, SESSIONS_KEY};
use crate::types::{ChatSession, Message, SessionId, title_from};
use std::sync::Arc;

/// Receives the full session list after every successful mutation.
pub trait StoreObserver: Send + Sync {
    fn sessions_changed(&self, sessions: &[ChatSession]);
}

/// Writes the session list back to a key/value store as JSON.
pub struct SessionWriter {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionWriter {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }
}

impl StoreObserver for SessionWriter {
    fn sessions_changed(&self, sessions: &[ChatSession]) {
        let serialized = match serde_json::to_string(sessions) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize sessions");
                return;
            }
        };
        if let Err(err) = self.storage.set(SESSIONS_KEY, &serialized) {
            tracing::warn!(error = %err, "failed to persist sessions");
        }
    }
}

/// Reads the persisted session list. Missing or malformed data yields an empty list.
pub fn load_sessions(storage: &dyn KeyValueStore) -> Vec<ChatSession> {
    let Some(raw) = storage.get(SESSIONS_KEY) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<ChatSession>>(&raw) {
        Ok(sessions) => sessions,
        Err(err) => {
            tracing::warn!(error = %err, "discarding malformed session data");
            Vec::new()
        }
    }
}

/// Chat sessions plus the current selection. All mutation goes through here.
#[derive(Default)]
pub struct ConversationStore {
    sessions: Vec<ChatSession>,
    current: Option<SessionId>,
    observer: Option<Box<dyn StoreObserver>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded from `storage` that writes every change back to it.
    pub fn hydrate(storage: Arc<dyn KeyValueStore>) -> Self {
        let sessions = load_sessions(storage.as_ref());
        tracing::debug!(count = sessions.len(), "hydrated sessions");
        Self::from_sessions(sessions).with_observer(SessionWriter::new(storage))
    }

    pub fn from_sessions(sessions: Vec<ChatSession>) -> Self {
        Self {
            sessions,
            current: None,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl StoreObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The selected session, or `None` when nothing is selected or the id dangles.
    pub fn current_session(&self) -> Option<&ChatSession> {
        self.current.as_deref().and_then(|id| self.session(id))
    }

    pub fn create_session(&mut self) -> SessionId {
        let session = ChatSession::new();
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.current = Some(id.clone());
        tracing::debug!(session = %id, "created session");
        self.notify();
        id
    }

    pub fn delete_session(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        if self.sessions.len() != before {
            tracing::debug!(session = %id, "deleted session");
            self.notify();
        }
    }

    /// Appends to the session's history. Returns `false` if the session is gone.
    pub fn append_message(&mut self, session_id: &str, message: Message) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            tracing::debug!(session = %session_id, "append to missing session ignored");
            return false;
        };
        session.messages.push(message);
        if let [only] = session.messages.as_slice()
            && only.is_user()
        {
            session.title = title_from(&only.content);
        }
        self.notify();
        true
    }

    /// Explicit rename. Blank titles are rejected.
    pub fn rename_session(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        session.title = title_from(title);
        self.notify();
        true
    }

    pub fn select_session(&mut self, id: impl Into<SessionId>) {
        self.current = Some(id.into());
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer.sessions_changed(&self.sessions);
        }
    }
}
