use crate::storage::{KeyValueStore, USER_KEY};
use crate::types::User;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in was rejected: {0}")]
    Rejected(String),
}

/// Something that can produce a signed-in user.
pub trait AuthProvider: Send + Sync {
    fn sign_in(&self) -> Result<User, AuthError>;
}

/// Stand-in provider that always signs in the same account.
pub struct SimulatedAuth {
    user: User,
}

impl SimulatedAuth {
    pub fn new(user: User) -> Self {
        Self { user }
    }
}

impl Default for SimulatedAuth {
    fn default() -> Self {
        Self::new(User {
            email: "user@gmail.com".to_string(),
            name: "Google User".to_string(),
        })
    }
}

impl AuthProvider for SimulatedAuth {
    fn sign_in(&self) -> Result<User, AuthError> {
        Ok(self.user.clone())
    }
}

/// The signed-in user, mirrored to storage on every change.
pub struct Account {
    storage: Arc<dyn KeyValueStore>,
    user: Option<User>,
}

impl Account {
    /// Restores the persisted user. A malformed record counts as signed out.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let user = storage
            .get(USER_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding malformed user record");
                    None
                }
            });
        Self { storage, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Signs in through `provider`. Only a provider rejection is an error;
    /// a failed write is logged and the in-memory user stays authoritative.
    pub fn login(&mut self, provider: &dyn AuthProvider) -> Result<&User, AuthError> {
        let user = provider.sign_in()?;
        tracing::debug!(email = %user.email, "signed in");
        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(err) = self.storage.set(USER_KEY, &json) {
                    tracing::warn!(error = %err, "failed to persist user record");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize user record"),
        }
        Ok(self.user.insert(user))
    }

    pub fn logout(&mut self) {
        self.user = None;
        if let Err(err) = self.storage.remove(USER_KEY) {
            tracing::warn!(error = %err, "failed to remove user record");
        }
    }
}
