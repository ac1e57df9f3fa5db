//! # Collection Service
//!
//! The external query/mutation interface the console consumes, one per entity type.
//! The engine never talks to a concrete backend; it holds an
//! `Arc<dyn CollectionService<T>>`. Two implementations ship with the crate:
//!
//! - [`ResourceClient`](crate::ResourceClient): the in-process [`ResourceActor`](crate::ResourceActor).
//! - [`GraphqlService`](crate::graphql::GraphqlService): a GraphQL endpoint over HTTP.

use crate::entity::ConsoleEntity;
use crate::error::ConsoleError;
use async_trait::async_trait;
use std::sync::Arc;

/// Query and mutation operations of one collection.
///
/// Every call resolves to a success payload or a [`ConsoleError::Transport`]
/// carrying a human-readable message. Relations are expected pre-joined.
#[async_trait]
pub trait CollectionService<T: ConsoleEntity>: Send + Sync {
    /// `getAll<Entity>s`: the full list, in server order.
    async fn get_all(&self) -> Result<Vec<T>, ConsoleError>;

    /// `get<Entity>`: `None` when the id is unknown.
    async fn get(&self, id: T::Id) -> Result<Option<T>, ConsoleError>;

    async fn create(&self, input: T::Create) -> Result<T, ConsoleError>;

    async fn update(&self, patch: T::Patch) -> Result<T, ConsoleError>;

    /// `delete<Entity>`: `true` when the service reports the entity removed.
    async fn delete(&self, id: T::Id) -> Result<bool, ConsoleError>;
}

/// Shared handle to a collection service.
pub type SharedService<T> = Arc<dyn CollectionService<T>>;
