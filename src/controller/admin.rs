//! User administration.

use std::sync::Arc;

use crate::client::{ArenaApi, ClientError};
use crate::models::{AdminUser, NewUser, Role};
use crate::notify::{NoticeLevel, Notifier};

/// Account management for admins: list, create, change role, delete.
pub struct UserAdmin<A: ArenaApi> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
}

impl<A: ArenaApi> UserAdmin<A> {
    pub fn new(api: Arc<A>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    pub async fn users(&self) -> Result<Vec<AdminUser>, ClientError> {
        self.api.users().await
    }

    /// Create an account. Blank credentials are rejected before the request
    /// goes out; the server enforces uniqueness.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<AdminUser>, ClientError> {
        if username.trim().is_empty() || password.is_empty() {
            self.notifier
                .notify("Username and password are required", NoticeLevel::Error);
            return Ok(None);
        }

        let user = NewUser {
            username: username.trim().to_string(),
            password: password.to_string(),
            role,
        };

        match self.api.create_user(&user).await {
            Ok(created) => {
                self.notifier.notify(
                    &format!("User {} created", created.username),
                    NoticeLevel::Success,
                );
                Ok(Some(created))
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    pub async fn set_role(&self, id: u64, role: Role) -> Result<(), ClientError> {
        match self.api.update_user_role(id, role).await {
            Ok(()) => {
                self.notifier
                    .notify(&format!("Role updated to {}", role), NoticeLevel::Success);
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    /// Delete an account behind a confirmation.
    pub async fn delete(&self, id: u64) -> Result<bool, ClientError> {
        if !self
            .notifier
            .confirm("Delete user", "Remove this account?")
        {
            return Ok(false);
        }

        match self.api.delete_user(id).await {
            Ok(()) => {
                self.notifier.notify("User deleted", NoticeLevel::Success);
                Ok(true)
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }
}
