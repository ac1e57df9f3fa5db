//! [`ConsoleEntity`] and [`GraphqlEntity`] implementations for [`Comment`].

use crate::model::{Comment, CommentCreate, CommentId, CommentPatch, Post, PostRef};
use async_trait::async_trait;
use console_framework::{ConsoleEntity, GraphqlEntity, ResourceClient};
use std::borrow::Cow;
use tracing::warn;

#[async_trait]
impl ConsoleEntity for Comment {
    type Id = CommentId;
    type Create = CommentCreate;
    type Patch = CommentPatch;
    type Context = ResourceClient<Post>;

    const NAME: &'static str = "Comment";

    fn id(&self) -> &CommentId {
        &self.id
    }

    fn required_fields(input: &CommentCreate) -> Vec<(&'static str, Cow<'_, str>)> {
        let post = input
            .post_id
            .map(|id| Cow::Owned(id.to_string()))
            .unwrap_or_default();
        vec![
            ("postId", post),
            ("name", Cow::from(&input.name)),
            ("email", Cow::from(&input.email)),
            ("body", Cow::from(&input.body)),
        ]
    }

    // A patch cannot unset postId, so only the text fields are checked.
    fn patch_required_fields(patch: &CommentPatch) -> Vec<(&'static str, Cow<'_, str>)> {
        [("name", &patch.name), ("email", &patch.email), ("body", &patch.body)]
            .into_iter()
            .filter_map(|(field, value)| Some((field, Cow::from(value.as_deref()?))))
            .collect()
    }

    fn patch_target(patch: &CommentPatch) -> &CommentId {
        &patch.id
    }

    fn to_patch(&self) -> CommentPatch {
        CommentPatch {
            id: self.id,
            post_id: self.post_id,
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            body: Some(self.body.clone()),
        }
    }

    fn from_create_params(id: CommentId, input: CommentCreate) -> Self {
        Self {
            id,
            post_id: input.post_id,
            name: input.name,
            email: input.email,
            body: input.body,
            post: None,
        }
    }

    fn apply_patch(&mut self, patch: CommentPatch) {
        if patch.post_id.is_some() {
            self.post_id = patch.post_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
    }

    async fn resolve_relations(&mut self, posts: &ResourceClient<Post>) {
        let Some(post_id) = self.post_id else {
            self.post = None;
            return;
        };
        self.post = match posts.fetch(post_id).await {
            Ok(found) => found.map(|post| PostRef {
                id: Some(post.id),
                title: post.title,
            }),
            Err(e) => {
                warn!(comment_id = %self.id, %post_id, error = %e, "Post join failed");
                None
            }
        };
    }
}

impl GraphqlEntity for Comment {
    const COLLECTION: &'static str = "Comments";
    const SELECTION: &'static str = "id postId name email body post { id title }";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostId;

    #[test]
    fn moving_a_comment_keeps_other_fields() {
        let mut comment = Comment::new(1, 1, "Bo", "bo@example.com", "Nice");
        let mut patch = CommentPatch::new(CommentId(1));
        patch.post_id = Some(PostId(2));
        comment.apply_patch(patch);
        assert_eq!(comment.post_id, Some(PostId(2)));
        assert_eq!(comment.body, "Nice");
    }

    #[test]
    fn edit_form_is_prefilled() {
        let comment = Comment::new(5, 2, "Cy", "cy@example.com", "Agreed");
        let patch = comment.to_patch();
        assert_eq!(patch.post_id, Some(PostId(2)));
        assert_eq!(patch.body.as_deref(), Some("Agreed"));
    }
}
