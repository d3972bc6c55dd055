//! Integration tests for TONY persistence
//!
//! Tests the file-backed key/value store and session round-trips through it

use std::path::PathBuf;
use std::sync::Arc;
use tony::storage::{FileStore, KeyValueStore, SESSIONS_KEY, USER_KEY};
use tony::store::{ConversationStore, load_sessions};
use tony::types::Message;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tony-{name}-{}", uuid::Uuid::new_v4().simple()))
}

mod file_store_tests {
    use super::*;

    #[test]
    fn test_storage_set_and_get() {
        let dir = scratch_dir("set-get");
        let store = FileStore::new(&dir);
        let value = r#"{"email": "a@b.c", "name": "A"}"#;

        store.set(USER_KEY, value).expect("Failed to set storage");
        assert_eq!(store.get(USER_KEY), Some(value.to_string()));

        std::fs::remove_dir_all(dir).expect("Failed to clean up");
    }

    #[test]
    fn test_storage_get_nonexistent() {
        let store = FileStore::new(scratch_dir("missing"));
        assert_eq!(store.get("nonexistent_key"), None);
    }

    #[test]
    fn test_storage_remove() {
        let dir = scratch_dir("remove");
        let store = FileStore::new(&dir);

        store.set(USER_KEY, "value").expect("Failed to set");
        assert!(store.get(USER_KEY).is_some());

        store.remove(USER_KEY).expect("Failed to delete");
        assert!(store.get(USER_KEY).is_none());
        store.remove(USER_KEY).expect("Removing twice is fine");

        std::fs::remove_dir_all(dir).expect("Failed to clean up");
    }

    #[test]
    fn test_storage_special_characters_in_key() {
        let dir = scratch_dir("special");
        let store = FileStore::new(&dir);

        store.set("user:preferences:theme", "dark").expect("Failed to set");
        assert_eq!(store.get("user:preferences:theme"), Some("dark".to_string()));
        assert!(dir.join("user_preferences_theme.json").exists());

        std::fs::remove_dir_all(dir).expect("Failed to clean up");
    }
}

mod session_persistence_tests {
    use super::*;

    #[test]
    fn test_sessions_round_trip_through_disk() {
        let dir = scratch_dir("sessions");
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&dir));

        let mut store = ConversationStore::hydrate(storage.clone());
        let older = store.create_session();
        store.append_message(&older, Message::user("first question"));
        store.append_message(
            &older,
            Message::assistant("an answer", Some(vec!["A?".into(), "B?".into()])),
        );
        let newer = store.create_session();
        store.append_message(&newer, Message::user(&"x".repeat(50)));
        let expected = store.sessions().to_vec();

        let reloaded = ConversationStore::hydrate(storage.clone());
        assert_eq!(reloaded.sessions(), expected.as_slice());
        assert_eq!(reloaded.sessions()[0].id, newer);
        assert_eq!(reloaded.sessions()[0].title, format!("{}...", "x".repeat(35)));
        assert_eq!(
            reloaded.sessions()[1].messages[1].suggestions,
            Some(vec!["A?".to_string(), "B?".to_string()])
        );
        assert!(reloaded.current_id().is_none());

        let raw = storage.get(SESSIONS_KEY).expect("sessions were written");
        let again = serde_json::to_string(&load_sessions(storage.as_ref())).unwrap();
        assert_eq!(raw, again);

        std::fs::remove_dir_all(dir).expect("Failed to clean up");
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = scratch_dir("corrupt");
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&dir));
        storage.set(SESSIONS_KEY, "[{\"id\": 1").expect("Failed to set");

        let store = ConversationStore::hydrate(storage);
        assert!(store.sessions().is_empty());

        std::fs::remove_dir_all(dir).expect("Failed to clean up");
    }
}
