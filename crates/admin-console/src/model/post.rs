use crate::model::UserId;
use console_framework::entity_id;
use serde::{Deserialize, Serialize};

entity_id!(Post);

/// A blog post written by a [`User`](crate::model::User).
///
/// The author is stored as a foreign key (`userId` on the wire). Queries join
/// the author as [`Author`]; a post whose author is gone simply has no `user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Author>,
}

/// The joined author of a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: Option<UserId>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload for creating a new post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostCreate {
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub author_id: Option<UserId>,
    pub title: String,
    pub body: String,
}

/// Partial update of a post. The author cannot be changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPatch {
    pub id: PostId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostPatch {
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            title: None,
            body: None,
        }
    }
}

impl Post {
    pub fn new(id: u32, author: u32, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: PostId(id),
            author_id: Some(UserId(author)),
            title: title.into(),
            body: body.into(),
            user: None,
        }
    }
}
