use serde_json::Value;
use tracing::{info, warn};

use crate::constants::{CHECKOUT_KEY_PREFIX, TOKEN_KEY, USER_KEY};
use crate::errors::StorageError;
use crate::store::SessionStore;

/// Signed-in state for one browsing session.
///
/// Owns its store rather than reaching for a global. `init` hydrates from the
/// store, `teardown` wipes everything the session wrote.
#[derive(Debug)]
pub struct Session<S: SessionStore> {
    store: S,
    token: Option<String>,
    user: Option<Value>,
}

impl<S: SessionStore> Session<S> {
    pub fn init(store: S) -> Self {
        let token = match store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                warn!(error = %err, "session token unreadable");
                None
            }
        };
        let user = match store.get(USER_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw)
                .map_err(|err| warn!(error = %err, "stored user unreadable"))
                .ok(),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "stored user unreadable");
                None
            }
        };
        Self { store, token, user }
    }

    pub fn login(&mut self, user: Option<Value>, token: impl Into<String>) -> Result<(), StorageError> {
        let token = token.into();
        self.store.set(TOKEN_KEY, &token)?;
        match &user {
            Some(user) => self.store.set(USER_KEY, &serde_json::to_string(user)?)?,
            None => self.store.remove(USER_KEY)?,
        }
        self.token = Some(token);
        self.user = user;
        info!("signed in");
        Ok(())
    }

    /// Sign out and clear everything the session stored, saved checkouts included.
    ///
    /// Every session key is attempted even when one removal fails; the first
    /// failure is returned after the in-memory state is reset.
    pub fn teardown(&mut self) -> Result<(), StorageError> {
        let result = self.clear_stored();
        self.token = None;
        self.user = None;
        if result.is_ok() {
            info!("session cleared");
        }
        result
    }

    fn clear_stored(&mut self) -> Result<(), StorageError> {
        let mut first_err = None;
        for key in self.store.keys()? {
            if key != TOKEN_KEY && key != USER_KEY && !key.starts_with(CHECKOUT_KEY_PREFIX) {
                continue;
            }
            if let Err(err) = self.store.remove(&key) {
                warn!(key = %key, error = %err, "session key not cleared");
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.teardown()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    /// Value for the `Authorization` header on API requests.
    pub fn authorization_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
