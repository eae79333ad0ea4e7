use serde::{Deserialize, Serialize};

/// Username shown for posts and comments without a (resolvable) author.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: i64,
    pub name: String,
    pub severity: i64,
    pub notes: Option<String>,
    pub date_added: String,
}

/// A community post joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: Option<i64>,
    pub username: String,
    pub content: String,
    pub created_at: String,
}

/// Row of the post listing; `comment_count` is computed at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub user_id: Option<i64>,
    pub username: String,
    pub content: String,
    pub created_at: String,
    pub comment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Option<i64>,
    pub username: String,
    pub content: String,
    pub created_at: String,
}
