use crate::ai::ModelBackend;
use crate::parser::parse_response;
use crate::store::ConversationStore;
use crate::types::{Message, Role, SessionId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Assistant text shown whenever the model call fails, whatever the cause.
pub const FALLBACK_REPLY: &str =
    "Network interruption in cognitive layer. Please retry your transmission.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or an unknown suggestion; nothing happened.
    Ignored,
    /// Another send is still awaiting the model; nothing happened.
    Busy,
    Replied { session_id: SessionId },
    Failed { session_id: SessionId },
}

/// Drives send cycles against a shared store. At most one send is in flight.
pub struct Orchestrator {
    store: Arc<Mutex<ConversationStore>>,
    backend: Arc<dyn ModelBackend>,
    in_flight: AtomicBool,
    draft: Mutex<String>,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Orchestrator {
    pub fn new(store: Arc<Mutex<ConversationStore>>, backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            store,
            backend,
            in_flight: AtomicBool::new(false),
            draft: Mutex::new(String::new()),
        }
    }

    pub fn store(&self) -> &Arc<Mutex<ConversationStore>> {
        &self.store
    }

    /// Runs `f` with the store locked. The lock is never held across an await.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut ConversationStore) -> R) -> R {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        *self.draft.lock().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    pub fn draft(&self) -> String {
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Sends `text` to `session`, creating a new session when `None` or unknown.
    pub async fn send_message(&self, session: Option<&str>, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("send rejected while another is in flight");
            return SendOutcome::Busy;
        }
        let _in_flight = InFlightGuard(&self.in_flight);

        let (session_id, history) = self.with_store(|store| {
            // A dangling id counts as no session.
            let existing = session
                .and_then(|id| store.session(id))
                .map(|s| s.id.clone());
            let id = match existing {
                Some(id) => id,
                None => store.create_session(),
            };
            store.append_message(&id, Message::user(text));
            let history = store
                .session(&id)
                .map(|s| s.messages.clone())
                .unwrap_or_default();
            (id, history)
        });
        self.set_draft(String::new());

        match self.backend.generate(&history, text).await {
            Ok(raw) => {
                let parsed = parse_response(&raw);
                let reply = Message::assistant(parsed.content, parsed.suggestions);
                self.with_store(|store| store.append_message(&session_id, reply));
                SendOutcome::Replied { session_id }
            }
            Err(err) => {
                tracing::error!(error = %err, session = %session_id, "model call failed");
                let reply = Message::assistant(FALLBACK_REPLY, None);
                self.with_store(|store| store.append_message(&session_id, reply));
                SendOutcome::Failed { session_id }
            }
        }
    }

    /// Sends the `index`th suggestion attached to an assistant message.
    pub async fn send_suggestion(
        &self,
        session_id: &str,
        message_id: &str,
        index: usize,
    ) -> SendOutcome {
        let suggestion = self.with_store(|store| {
            store
                .session(session_id)?
                .messages
                .iter()
                .find(|m| m.id == message_id && m.role == Role::Assistant)?
                .suggestions
                .as_ref()?
                .get(index)
                .cloned()
        });
        match suggestion {
            Some(text) => self.send_message(Some(session_id), &text).await,
            None => SendOutcome::Ignored,
        }
    }
}
