//! Authentication state and its persistence.
//!
//! Admin access is a bearer token handed out by the login endpoint. The
//! session keeps it in the injected key-value store; a stored token at
//! startup means the session resumes as admin, matching the original
//! dashboard's behavior.

use std::sync::Arc;

use crate::models::Role;
use crate::store::{KeyValueStore, StoreError};

/// Store key for the persisted bearer token.
pub const TOKEN_KEY: &str = "admin_token";

/// Store key for the remembered comment author name.
pub const USERNAME_KEY: &str = "username";

/// Value object describing who the client currently is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl AuthState {
    /// Admin gating follows token presence; the role is informational.
    pub fn is_admin(&self) -> bool {
        self.token.is_some()
    }
}

/// Auth session bound to a persistence store.
pub struct AuthSession {
    store: Arc<dyn KeyValueStore>,
    state: AuthState,
}

impl AuthSession {
    /// Resume a session from the store. A persisted token restores admin
    /// status; the role is only known after a fresh login.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let token = store.get(TOKEN_KEY);
        Self {
            store,
            state: AuthState { token, role: None },
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.state.is_admin()
    }

    /// Persist a fresh token and flip to admin.
    pub fn login(&mut self, token: String, role: Role) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, &token)?;
        self.state = AuthState {
            token: Some(token),
            role: Some(role),
        };
        Ok(())
    }

    /// Drop the token from memory and the store.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.store.delete(TOKEN_KEY)?;
        self.state = AuthState::default();
        Ok(())
    }
}
