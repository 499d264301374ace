//! Threaded comments attached to a summary pairing.

use serde::{Deserialize, Serialize};

/// Author name used when the poster leaves the name field blank.
pub const DEFAULT_AUTHOR: &str = "Sensei";

/// A single comment record as served by the API.
///
/// `parent_id` of None marks a root comment; Some(id) marks a reply to that
/// root. The server orders replies one level deep only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,

    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub atk_sig: String,

    #[serde(default)]
    pub def_sig: String,

    #[serde(default)]
    pub username: String,

    pub content: String,

    #[serde(default)]
    pub parent_id: Option<u64>,

    /// Unix seconds.
    pub created_at: i64,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Author name with the blank-name fallback applied.
    pub fn author(&self) -> &str {
        if self.username.trim().is_empty() {
            DEFAULT_AUTHOR
        } else {
            &self.username
        }
    }
}

/// Payload for posting a new comment or reply.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub server: String,
    pub atk_sig: String,
    pub def_sig: String,
    pub username: String,
    pub content: String,
    pub parent_id: Option<u64>,
}

/// The pairing a comment thread hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTarget {
    pub atk_sig: String,
    pub def_sig: String,
    pub server: String,
}
