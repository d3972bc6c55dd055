use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Placeholder title for a session that has not received a user message yet.
pub const DEFAULT_SESSION_TITLE: &str = "New Conversation";

/// Titles longer than this many characters are cut and suffixed with `...`.
pub const TITLE_MAX_CHARS: usize = 35;

pub type SessionId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    pub timestamp: i64,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            role: Role::User,
            content: content.into(),
            suggestions: None,
            timestamp: now_millis(),
        }
    }

    /// Builds an assistant message. An empty suggestion list is stored as `None`.
    pub fn assistant(content: impl Into<String>, suggestions: Option<Vec<String>>) -> Self {
        Self {
            id: new_id(),
            role: Role::Assistant,
            content: content.into(),
            suggestions: suggestions.filter(|list| !list.is_empty()),
            timestamp: now_millis(),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self.role, Role::User)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: SessionId,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: i64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: new_id(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now_millis(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

/// Derives a session title from message text.
pub fn title_from(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_short_text_kept_verbatim() {
        assert_eq!(title_from("hello"), "hello");
        let exact = "a".repeat(TITLE_MAX_CHARS);
        assert_eq!(title_from(&exact), exact);
    }

    #[test]
    fn test_title_long_text_truncated() {
        let long = "b".repeat(TITLE_MAX_CHARS + 1);
        let title = title_from(&long);
        assert_eq!(title, format!("{}...", "b".repeat(TITLE_MAX_CHARS)));
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        let long = "é".repeat(40);
        let title = title_from(&long);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_assistant_drops_empty_suggestions() {
        let msg = Message::assistant("hi", Some(vec![]));
        assert_eq!(msg.suggestions, None);
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let session = ChatSession::new();
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains(DEFAULT_SESSION_TITLE));
    }

    #[test]
    fn test_message_omits_absent_suggestions() {
        let json = serde_json::to_string(&Message::user("hey")).unwrap();
        assert!(!json.contains("suggestions"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
