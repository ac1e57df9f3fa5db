//! # Generic Client
//!
//! This module defines the channel client of a [`ResourceActor`](crate::ResourceActor)
//! and plugs it into the engine as a [`CollectionService`].

use crate::entity::ConsoleEntity;
use crate::error::{ConsoleError, FrameworkError};
use crate::message::ResourceRequest;
use crate::service::CollectionService;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type‑safe, async API for interacting with a
/// `ResourceActor<T>`. It forwards requests over a Tokio mpsc channel and returns
/// results via oneshot channels.
///
/// * **Cloneable**: holds only a sender, so cloning is inexpensive.
/// * **Service**: implements [`CollectionService`], mapping every
///   [`FrameworkError`] to a transport failure.
pub struct ResourceClient<T: ConsoleEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ConsoleEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ConsoleEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn fetch(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn insert(&self, input: T::Create) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { input, respond_to })
            .await
    }

    pub async fn patch(&self, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { patch, respond_to })
            .await
    }

    pub async fn remove(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }
}

#[async_trait]
impl<T: ConsoleEntity> CollectionService<T> for ResourceClient<T> {
    #[instrument(skip(self), fields(entity_type = T::NAME))]
    async fn get_all(&self) -> Result<Vec<T>, ConsoleError> {
        debug!("Sending request");
        Ok(self.list().await?)
    }

    #[instrument(skip(self), fields(entity_type = T::NAME))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, ConsoleError> {
        debug!("Sending request");
        Ok(self.fetch(id).await?)
    }

    #[instrument(skip(self), fields(entity_type = T::NAME))]
    async fn create(&self, input: T::Create) -> Result<T, ConsoleError> {
        debug!("Sending request");
        Ok(self.insert(input).await?)
    }

    #[instrument(skip(self), fields(entity_type = T::NAME))]
    async fn update(&self, patch: T::Patch) -> Result<T, ConsoleError> {
        debug!("Sending request");
        Ok(self.patch(patch).await?)
    }

    #[instrument(skip(self), fields(entity_type = T::NAME))]
    async fn delete(&self, id: T::Id) -> Result<bool, ConsoleError> {
        debug!("Sending request");
        Ok(self.remove(id).await?)
    }
}
