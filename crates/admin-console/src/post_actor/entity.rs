//! [`ConsoleEntity`] and [`GraphqlEntity`] implementations for [`Post`].
//!
//! Posts reference their author by id. The actor context is the user client,
//! used to join `user { id name email }` on every read.

use crate::model::{Author, Post, PostCreate, PostId, PostPatch, User};
use async_trait::async_trait;
use console_framework::{ConsoleEntity, GraphqlEntity, ResourceClient};
use std::borrow::Cow;
use tracing::warn;

#[async_trait]
impl ConsoleEntity for Post {
    type Id = PostId;
    type Create = PostCreate;
    type Patch = PostPatch;
    type Context = ResourceClient<User>;

    const NAME: &'static str = "Post";

    fn id(&self) -> &PostId {
        &self.id
    }

    fn required_fields(input: &PostCreate) -> Vec<(&'static str, Cow<'_, str>)> {
        let author = input
            .author_id
            .map(|id| Cow::Owned(id.to_string()))
            .unwrap_or_default();
        vec![
            ("userId", author),
            ("title", Cow::from(&input.title)),
            ("body", Cow::from(&input.body)),
        ]
    }

    fn patch_required_fields(patch: &PostPatch) -> Vec<(&'static str, Cow<'_, str>)> {
        let mut set = Vec::new();
        if let Some(title) = &patch.title {
            set.push(("title", Cow::from(title)));
        }
        if let Some(body) = &patch.body {
            set.push(("body", Cow::from(body)));
        }
        set
    }

    fn patch_target(patch: &PostPatch) -> &PostId {
        &patch.id
    }

    fn to_patch(&self) -> PostPatch {
        PostPatch {
            id: self.id,
            title: Some(self.title.clone()),
            body: Some(self.body.clone()),
        }
    }

    fn from_create_params(id: PostId, input: PostCreate) -> Self {
        Self {
            id,
            author_id: input.author_id,
            title: input.title,
            body: input.body,
            user: None,
        }
    }

    fn apply_patch(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
    }

    async fn resolve_relations(&mut self, users: &ResourceClient<User>) {
        let Some(author_id) = self.author_id else {
            self.user = None;
            return;
        };
        self.user = match users.fetch(author_id).await {
            Ok(found) => found.map(|user| Author {
                id: Some(user.id),
                name: user.name,
                email: Some(user.email),
            }),
            Err(e) => {
                warn!(post_id = %self.id, %author_id, error = %e, "Author join failed");
                None
            }
        };
    }
}

impl GraphqlEntity for Post {
    const COLLECTION: &'static str = "Posts";
    const SELECTION: &'static str = "id userId title body user { id name email }";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use console_framework::{validate_create, validate_patch, ResourceActor};

    #[test]
    fn missing_author_fails_validation_first() {
        let input = PostCreate {
            author_id: None,
            title: String::new(),
            body: "b".into(),
        };
        let err = validate_create::<Post>(&input).unwrap_err();
        assert_eq!(err.to_string(), "Post userId is required");
    }

    #[test]
    fn patch_checks_only_fields_it_sets() {
        let mut patch = PostPatch::new(PostId(1));
        patch.body = Some("kept".into());
        assert!(validate_patch::<Post>(&patch).is_ok());

        patch.title = Some(String::new());
        let err = validate_patch::<Post>(&patch).unwrap_err();
        assert_eq!(err.field, "title");
    }

    #[tokio::test]
    async fn joins_author_or_leaves_it_absent() {
        let (actor, users) =
            ResourceActor::seeded(4, vec![User::new(1, "Ana", "ana", "ana@example.com")]);
        tokio::spawn(actor.run(()));

        let mut post = Post::new(1, 1, "t", "b");
        post.resolve_relations(&users).await;
        let author = post.user.unwrap();
        assert_eq!(author.id, Some(UserId(1)));
        assert_eq!(author.name, "Ana");

        let mut orphan = Post::new(2, 9, "t", "b");
        orphan.resolve_relations(&users).await;
        assert_eq!(orphan.user, None);
    }
}
