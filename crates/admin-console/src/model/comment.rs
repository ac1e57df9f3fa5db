use crate::model::PostId;
use console_framework::entity_id;
use serde::{Deserialize, Serialize};

entity_id!(Comment);

/// A comment on a [`Post`](crate::model::Post), joined as [`PostRef`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    #[serde(rename = "postId", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    pub name: String,
    pub email: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostRef>,
}

/// The joined post of a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRef {
    #[serde(default)]
    pub id: Option<PostId>,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentCreate {
    #[serde(rename = "postId", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentPatch {
    pub id: CommentId,
    #[serde(rename = "postId", skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl CommentPatch {
    pub fn new(id: CommentId) -> Self {
        Self {
            id,
            post_id: None,
            name: None,
            email: None,
            body: None,
        }
    }
}

impl Comment {
    pub fn new(
        id: u32,
        post: u32,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: CommentId(id),
            post_id: Some(PostId(post)),
            name: name.into(),
            email: email.into(),
            body: body.into(),
            post: None,
        }
    }
}
