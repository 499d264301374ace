//! Login/logout session handling.

use std::sync::Arc;

use tracing::warn;

use crate::auth::AuthSession;
use crate::client::{ArenaApi, ClientError};
use crate::models::Role;
use crate::notify::{NoticeLevel, Notifier};
use crate::store::KeyValueStore;

/// Binds the auth session to the API client: a persisted token is installed
/// on startup, a fresh login stores and installs its token, and logout
/// clears both sides.
pub struct Session<A: ArenaApi> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    auth: AuthSession,
}

impl<A: ArenaApi> Session<A> {
    /// Resume from the store, installing any persisted token on the client.
    pub fn resume(
        api: Arc<A>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let auth = AuthSession::load(store);
        if let Some(token) = auth.token() {
            api.install_token(Some(token.to_string()));
        }
        Self {
            api,
            notifier,
            auth,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.auth.is_admin()
    }

    pub fn role(&self) -> Option<Role> {
        self.auth.state().role
    }

    /// Authenticate and persist the token. The token is installed on the
    /// client either way; persistence failure only costs the next session.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        match self.api.login(username, password).await {
            Ok(response) => {
                let role = response.role.unwrap_or(Role::Admin);
                self.api
                    .install_token(Some(response.access_token.clone()));
                if let Err(e) = self.auth.login(response.access_token, role) {
                    warn!("Failed to persist auth token: {}", e);
                }
                self.notifier.notify("Logged in", NoticeLevel::Success);
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    /// Drop the token on both the client and the store.
    pub fn logout(&mut self) {
        self.api.install_token(None);
        if let Err(e) = self.auth.logout() {
            warn!("Failed to clear persisted token: {}", e);
        }
        self.notifier.notify("Logged out", NoticeLevel::Info);
    }

    pub async fn reset_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        match self
            .api
            .reset_password(username, old_password, new_password)
            .await
        {
            Ok(()) => {
                self.notifier
                    .notify("Password updated", NoticeLevel::Success);
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TOKEN_KEY;
    use crate::controller::testing::ScriptedApi;
    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_login_installs_and_persists_token() {
        let api = Arc::new(ScriptedApi::default());
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::resume(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            store.clone(),
        );

        assert!(!session.is_admin());
        session.login("admin", "secret").await.unwrap();

        assert!(session.is_admin());
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(
            api.installed_token.lock().unwrap().as_deref(),
            Some("scripted-token")
        );
        assert_eq!(store.get(TOKEN_KEY), Some("scripted-token".to_string()));
    }

    #[tokio::test]
    async fn test_resume_installs_persisted_token() {
        let api = Arc::new(ScriptedApi::default());
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "old-token").unwrap();

        let session = Session::resume(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            store,
        );

        assert!(session.is_admin());
        assert_eq!(
            api.installed_token.lock().unwrap().as_deref(),
            Some("old-token")
        );
    }

    #[tokio::test]
    async fn test_logout_clears_both_sides() {
        let api = Arc::new(ScriptedApi::default());
        let store = Arc::new(MemoryStore::new());
        let mut session = Session::resume(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            store.clone(),
        );

        session.login("admin", "secret").await.unwrap();
        session.logout();

        assert!(!session.is_admin());
        assert_eq!(*api.installed_token.lock().unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY), None);
    }
}
