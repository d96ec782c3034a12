//! Comment domain types and thread assembly.
//!
//! Comments are append-only and support exactly one level of replies: a
//! comment either has no parent (top-level) or references a top-level
//! comment.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopreel_core::{CommentId, ProductId, UserId};

/// Denormalized author info stored on each comment.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSnapshot {
    /// Author's user ID.
    pub id: UserId,
    /// Display name at posting time.
    pub name: String,
    /// Avatar URL at posting time.
    pub avatar_url: String,
}

/// A single comment (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// Unique comment ID.
    pub id: CommentId,
    /// Product this comment belongs to.
    pub product_id: ProductId,
    /// Author snapshot.
    pub author: AuthorSnapshot,
    /// Comment text.
    pub body: String,
    /// Parent comment for replies; `None` for top-level comments.
    pub parent_id: Option<CommentId>,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
}

/// A top-level comment with its replies, for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: Comment,
    /// Replies in posting order.
    pub replies: Vec<Comment>,
}

/// Assemble a flat, created-at-ascending comment list into one-level threads.
///
/// Replies whose parent is missing (deleted product edge cases aside, this
/// should not happen for append-only data) are promoted to top level rather
/// than dropped.
#[must_use]
pub fn thread(comments: Vec<Comment>) -> Vec<CommentThread> {
    let mut threads: Vec<CommentThread> = Vec::new();

    let (top_level, replies): (Vec<_>, Vec<_>) =
        comments.into_iter().partition(|c| c.parent_id.is_none());

    for comment in top_level {
        threads.push(CommentThread {
            comment,
            replies: Vec::new(),
        });
    }

    for reply in replies {
        let parent = reply
            .parent_id
            .and_then(|pid| threads.iter_mut().find(|t| t.comment.id == pid));
        match parent {
            Some(t) => t.replies.push(reply),
            None => threads.push(CommentThread {
                comment: reply,
                replies: Vec::new(),
            }),
        }
    }

    threads
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: CommentId, product_id: ProductId, parent: Option<CommentId>) -> Comment {
        Comment {
            id,
            product_id,
            author: AuthorSnapshot {
                id: UserId::generate(),
                name: "Ben".to_string(),
                avatar_url: "https://example.com/b.png".to_string(),
            },
            body: "nice".to_string(),
            parent_id: parent,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_thread_nests_replies() {
        let product = ProductId::generate();
        let top1 = CommentId::generate();
        let top2 = CommentId::generate();
        let reply = CommentId::generate();

        let threads = thread(vec![
            comment(top1, product, None),
            comment(top2, product, None),
            comment(reply, product, Some(top1)),
        ]);

        assert_eq!(threads.len(), 2);
        assert_eq!(threads.first().map(|t| t.replies.len()), Some(1));
        assert_eq!(threads.get(1).map(|t| t.replies.len()), Some(0));
    }

    #[test]
    fn test_thread_orphan_reply_promoted() {
        let product = ProductId::generate();
        let orphan = comment(CommentId::generate(), product, Some(CommentId::generate()));

        let threads = thread(vec![orphan]);
        assert_eq!(threads.len(), 1);
    }

    #[test]
    fn test_thread_empty() {
        assert!(thread(Vec::new()).is_empty());
    }
}
