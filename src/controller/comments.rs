//! Comment panel for one summary pairing.

use std::sync::Arc;

use tracing::warn;

use crate::auth::USERNAME_KEY;
use crate::client::{ArenaApi, ClientError};
use crate::models::{Comment, CommentTarget, NewComment, DEFAULT_AUTHOR};
use crate::notify::{NoticeLevel, Notifier};
use crate::store::KeyValueStore;
use crate::threads::{build_thread, ThreadedView};

/// Loads, posts, and deletes comments for a single pairing, exposing the
/// threaded projection for display. The author name is remembered in the
/// injected store across sessions.
pub struct CommentsPanel<A: ArenaApi> {
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn KeyValueStore>,
    target: CommentTarget,
    comments: Vec<Comment>,
    username: String,
}

impl<A: ArenaApi> CommentsPanel<A> {
    pub fn new(
        api: Arc<A>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn KeyValueStore>,
        target: CommentTarget,
    ) -> Self {
        let username = store.get(USERNAME_KEY).unwrap_or_default();
        Self {
            api,
            notifier,
            store,
            target,
            comments: Vec::new(),
            username,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: &str) {
        self.username = username.to_string();
    }

    pub fn target(&self) -> &CommentTarget {
        &self.target
    }

    /// Fetch the flat comment list for the target.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.comments = self.api.comments(&self.target).await?;
        Ok(())
    }

    /// Threaded projection of the loaded comments.
    pub fn view(&self) -> ThreadedView {
        build_thread(&self.comments)
    }

    /// Post a root comment or a reply. Blank content is a silent no-op; a
    /// blank author name posts under the default. A non-blank name is
    /// remembered for next time.
    pub async fn post(
        &mut self,
        content: &str,
        parent_id: Option<u64>,
    ) -> Result<bool, ClientError> {
        if content.trim().is_empty() {
            return Ok(false);
        }

        let username = if self.username.trim().is_empty() {
            DEFAULT_AUTHOR.to_string()
        } else {
            self.username.clone()
        };

        let comment = NewComment {
            server: if self.target.server.is_empty() {
                "global".to_string()
            } else {
                self.target.server.clone()
            },
            atk_sig: self.target.atk_sig.clone(),
            def_sig: self.target.def_sig.clone(),
            username,
            content: content.to_string(),
            parent_id,
        };

        match self.api.add_comment(&comment).await {
            Ok(()) => {
                if !self.username.trim().is_empty() {
                    if let Err(e) = self.store.set(USERNAME_KEY, &self.username) {
                        warn!("Failed to remember username: {}", e);
                    }
                }
                self.notifier.notify("Comment posted", NoticeLevel::Success);
                self.load().await?;
                Ok(true)
            }
            Err(e) => {
                self.notifier.notify(&e.to_string(), NoticeLevel::Error);
                Err(e)
            }
        }
    }

    /// Delete a comment behind a confirmation. On success the comment and,
    /// when it was a root, its replies are pruned locally; the server's own
    /// cascade behavior (if any) shows up on the next load.
    pub async fn delete(&mut self, id: u64) -> Result<bool, ClientError> {
        if !self
            .notifier
            .confirm("Delete", "Delete this comment?")
        {
            return Ok(false);
        }

        match self.api.delete_comment(id).await {
            Ok(()) => {
                self.comments
                    .retain(|c| c.id != id && c.parent_id != Some(id));
                self.notifier.notify("Deleted", NoticeLevel::Success);
                Ok(true)
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
    use crate::controller::testing::ScriptedApi;
    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn comment(id: u64, parent_id: Option<u64>) -> Comment {
        Comment {
            id,
            server: "global".to_string(),
            atk_sig: "1,2".to_string(),
            def_sig: "3,4".to_string(),
            username: "Aru".to_string(),
            content: format!("comment {}", id),
            parent_id,
            created_at: 1_735_689_600,
        }
    }

    fn target() -> CommentTarget {
        CommentTarget {
            atk_sig: "1,2".to_string(),
            def_sig: "3,4".to_string(),
            server: "global".to_string(),
        }
    }

    fn panel_with(
        api: Arc<ScriptedApi>,
        notifier: Arc<RecordingNotifier>,
        store: Arc<MemoryStore>,
    ) -> CommentsPanel<ScriptedApi> {
        CommentsPanel::new(api, notifier, store, target())
    }

    #[tokio::test]
    async fn test_load_and_view_threads() {
        let api = Arc::new(ScriptedApi::default());
        *api.comments.lock().unwrap() = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(1)),
        ];
        let mut panel = panel_with(
            api,
            Arc::new(RecordingNotifier::new(true)),
            Arc::new(MemoryStore::new()),
        );

        panel.load().await.unwrap();
        let view = panel.view();
        assert_eq!(view.roots.len(), 2);
        assert_eq!(view.replies_of(1).len(), 2);
    }

    #[tokio::test]
    async fn test_post_blank_content_is_noop() {
        let api = Arc::new(ScriptedApi::default());
        let mut panel = panel_with(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            Arc::new(MemoryStore::new()),
        );

        assert!(!panel.post("   ", None).await.unwrap());
        assert!(api.added_comments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_post_defaults_blank_author() {
        let api = Arc::new(ScriptedApi::default());
        let store = Arc::new(MemoryStore::new());
        let mut panel = panel_with(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            store.clone(),
        );

        assert!(panel.post("nice comp", None).await.unwrap());

        let added = api.added_comments.lock().unwrap();
        assert_eq!(added[0].username, DEFAULT_AUTHOR);
        // A blank name is not remembered.
        assert_eq!(store.get(USERNAME_KEY), None);
    }

    #[tokio::test]
    async fn test_post_remembers_username() {
        let api = Arc::new(ScriptedApi::default());
        let store = Arc::new(MemoryStore::new());
        let mut panel = panel_with(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            store.clone(),
        );

        panel.set_username("Shiroko");
        assert!(panel.post("gg", Some(7)).await.unwrap());

        let added = api.added_comments.lock().unwrap();
        assert_eq!(added[0].username, "Shiroko");
        assert_eq!(added[0].parent_id, Some(7));
        assert_eq!(store.get(USERNAME_KEY), Some("Shiroko".to_string()));

        // A new panel over the same store starts with the remembered name.
        let panel = panel_with(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            store,
        );
        assert_eq!(panel.username(), "Shiroko");
    }

    #[tokio::test]
    async fn test_delete_prunes_root_and_replies() {
        let api = Arc::new(ScriptedApi::default());
        *api.comments.lock().unwrap() = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
        ];
        let mut panel = panel_with(
            api.clone(),
            Arc::new(RecordingNotifier::new(true)),
            Arc::new(MemoryStore::new()),
        );

        panel.load().await.unwrap();
        assert!(panel.delete(1).await.unwrap());

        assert_eq!(api.deleted_comments.lock().unwrap().as_slice(), &[1]);
        let view = panel.view();
        assert_eq!(view.roots.len(), 1);
        assert_eq!(view.roots[0].id, 3);
        assert!(view.replies_by_parent.is_empty());
    }

    #[tokio::test]
    async fn test_delete_declined_leaves_everything() {
        let api = Arc::new(ScriptedApi::default());
        *api.comments.lock().unwrap() = vec![comment(1, None)];
        let notifier = Arc::new(RecordingNotifier::new(false));
        let mut panel = panel_with(api.clone(), notifier, Arc::new(MemoryStore::new()));

        panel.load().await.unwrap();
        assert!(!panel.delete(1).await.unwrap());
        assert!(api.deleted_comments.lock().unwrap().is_empty());
        assert_eq!(panel.view().roots.len(), 1);
    }
}
