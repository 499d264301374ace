//! Comment thread reconstruction.
//!
//! The API serves comments as a flat list. Display wants a two-level tree:
//! root comments in arrival order, each with its replies in arrival order.
//! One pass over the list rebuilds that grouping; the result is a pure
//! projection that can be recomputed whenever the source list changes.

use std::collections::HashMap;

use crate::models::Comment;

/// Two-level grouping of a flat comment list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadedView {
    /// Root comments, preserving input order.
    pub roots: Vec<Comment>,

    /// Replies bucketed by the root id they reference, input order within
    /// each bucket. Buckets whose key matches no root are never rendered.
    pub replies_by_parent: HashMap<u64, Vec<Comment>>,
}

impl ThreadedView {
    /// Replies under one root, in input order.
    pub fn replies_of(&self, root_id: u64) -> &[Comment] {
        self.replies_by_parent
            .get(&root_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Count of comments that would actually render: roots plus replies
    /// whose bucket key matches a root.
    pub fn rendered_len(&self) -> usize {
        self.roots.len()
            + self
                .roots
                .iter()
                .map(|root| self.replies_of(root.id).len())
                .sum::<usize>()
    }
}

/// Group a flat comment list into roots and reply buckets.
///
/// Referential integrity is not validated: a reply naming an unknown parent
/// is bucketed under that id anyway and simply never renders. The input is
/// not mutated and repeated calls on the same list yield equal views.
pub fn build_thread(comments: &[Comment]) -> ThreadedView {
    let mut view = ThreadedView::default();

    for comment in comments {
        match comment.parent_id {
            Some(parent_id) => {
                view.replies_by_parent
                    .entry(parent_id)
                    .or_default()
                    .push(comment.clone());
            }
            None => view.roots.push(comment.clone()),
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn comment(id: u64, parent_id: Option<u64>) -> Comment {
        Comment {
            id,
            server: "global".to_string(),
            atk_sig: String::new(),
            def_sig: String::new(),
            username: format!("user{}", id),
            content: format!("comment {}", id),
            parent_id,
            created_at: 1_735_689_600 + id as i64,
        }
    }

    #[test]
    fn test_interleaved_roots_and_replies() {
        let flat = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(1)),
        ];

        let view = build_thread(&flat);

        let root_ids: Vec<u64> = view.roots.iter().map(|c| c.id).collect();
        assert_eq!(root_ids, vec![1, 3]);

        let reply_ids: Vec<u64> = view.replies_of(1).iter().map(|c| c.id).collect();
        assert_eq!(reply_ids, vec![2, 4]);
        assert!(view.replies_of(3).is_empty());
        assert_eq!(view.rendered_len(), 4);
    }

    #[test]
    fn test_empty_input() {
        let view = build_thread(&[]);
        assert!(view.is_empty());
        assert!(view.replies_by_parent.is_empty());
    }

    #[test]
    fn test_idempotent_rebuild() {
        let flat = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(3)),
            comment(5, Some(1)),
        ];
        assert_eq!(build_thread(&flat), build_thread(&flat));
    }

    #[test]
    fn test_orphan_reply_is_bucketed_not_rendered() {
        let flat = vec![comment(1, None), comment(5, Some(999))];

        let view = build_thread(&flat);

        assert_eq!(view.roots.len(), 1);
        assert_eq!(view.replies_of(999).len(), 1);
        assert_eq!(view.replies_of(999)[0].id, 5);
        // Orphan bucket exists but contributes nothing to the rendered view.
        assert_eq!(view.rendered_len(), 1);
    }

    #[test]
    fn test_input_not_mutated() {
        let flat = vec![comment(1, None), comment(2, Some(1))];
        let before = flat.clone();
        let _view = build_thread(&flat);
        assert_eq!(flat, before);
    }

    #[test]
    fn test_reply_order_preserved_across_buckets() {
        let flat = vec![
            comment(10, None),
            comment(20, None),
            comment(3, Some(20)),
            comment(1, Some(10)),
            comment(2, Some(20)),
        ];

        let view = build_thread(&flat);

        let first: Vec<u64> = view.replies_of(10).iter().map(|c| c.id).collect();
        let second: Vec<u64> = view.replies_of(20).iter().map(|c| c.id).collect();
        assert_eq!(first, vec![1]);
        assert_eq!(second, vec![3, 2]);
    }
}
