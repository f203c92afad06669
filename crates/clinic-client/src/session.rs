//! Authentication state and its persistence.

use std::sync::Arc;

use clinic_core::models::User;
use serde::Serialize;

use crate::error::Result;
use crate::storage::KeyValueStorage;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized [`User`]
pub const USER_KEY: &str = "user";

/// Current identity. `is_authenticated` always equals `token.is_some()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
    #[serde(rename = "isAuthenticated")]
    is_authenticated: bool,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
            is_authenticated: true,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }
}

/// Owns the [`Session`] and mirrors it into durable storage.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    session: Session,
}

impl SessionStore {
    /// Rebuild the session from storage. Both keys must be present and the user
    /// record must parse; anything else yields an empty session. The token is
    /// trusted as-is.
    pub fn restore(storage: Arc<dyn KeyValueStorage>) -> Self {
        let session = match load(storage.as_ref()) {
            Ok(Some(session)) => session,
            Ok(None) => Session::empty(),
            Err(e) => {
                tracing::error!(error = %e, "Error loading persisted session");
                Session::empty()
            }
        };
        tracing::debug!(
            authenticated = session.is_authenticated(),
            "Session restored"
        );
        Self { storage, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Persist and adopt new credentials. The in-memory session only changes
    /// once both keys are written.
    pub fn set_credentials(&mut self, user: User, token: String) -> Result<()> {
        let user_json = serde_json::to_string(&user)?;
        self.storage.set_item(TOKEN_KEY, &token)?;
        self.storage.set_item(USER_KEY, &user_json)?;
        tracing::info!(email = %user.email, role = %user.role, "Credentials stored");
        self.session = Session::authenticated(user, token);
        Ok(())
    }

    /// Forget the session. The in-memory state is cleared even when storage
    /// cannot be updated.
    pub fn logout(&mut self) {
        self.session = Session::empty();
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, error = %e, "Failed to clear persisted session key");
            }
        }
        tracing::info!("Logged out");
    }
}

fn load(storage: &dyn KeyValueStorage) -> Result<Option<Session>> {
    let token = storage.get_item(TOKEN_KEY)?;
    let user = storage.get_item(USER_KEY)?;
    match (token, user) {
        (Some(token), Some(user)) if !token.is_empty() => {
            let user: User = serde_json::from_str(&user)?;
            Ok(Some(Session::authenticated(user, token)))
        }
        _ => Ok(None),
    }
}
