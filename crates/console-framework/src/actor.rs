//! # Reference Backend Actor
//!
//! This module defines the `ResourceActor`, an in-process implementation of the
//! query/mutation service for one collection. It is the "Server" side of the
//! Actor Model: it owns the store and processes requests sequentially, so the
//! store needs no `Mutex`.
//!
//! The console engine does not depend on it; it is what the demo shell and the
//! integration tests run against.

use crate::client::ResourceClient;
use crate::entity::{entity_type, ConsoleEntity};
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns one collection.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// # Implementation Details
///
/// * **Order**: the store is a `Vec`; `List` returns entities in insertion order,
///   which is the "server order" the console must preserve.
/// * **Ids**: the actor is authoritative. Ids come from a `u32` counter converted
///   through `T::Id: From<u32>`; client-supplied ids never reach it.
/// * **Joins**: every entity leaving the actor (List, Get, Create, Update) has
///   [`ConsoleEntity::resolve_relations`] applied with the injected context. The
///   stored copy keeps only its foreign keys.
/// * **Delete**: unknown ids resolve to `false`, not an error.
pub struct ResourceActor<T: ConsoleEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Vec<T>,
    next_id: u32,
}

impl<T: ConsoleEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the MPSC channel; when full, client calls
    /// wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Vec::new(),
            next_id: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Pre-populates the store before the actor starts, keeping the given order.
    ///
    /// The id counter continues after the largest seeded id.
    pub fn seeded(
        buffer_size: usize,
        entities: impl IntoIterator<Item = T>,
    ) -> (Self, ResourceClient<T>)
    where
        T::Id: Into<u32>,
    {
        let (mut actor, client) = Self::new(buffer_size);
        for entity in entities {
            let raw: u32 = entity.id().clone().into();
            actor.next_id = actor.next_id.max(raw.saturating_add(1));
            actor.store.push(entity);
        }
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// The `context` argument is handed to every relation join.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = entity_type::<T>();
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::List { respond_to } => {
                    let mut items = self.store.clone();
                    for item in items.iter_mut() {
                        item.resolve_relations(&context).await;
                    }
                    debug!(entity_type, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let mut item = self.store.iter().find(|e| e.id() == &id).cloned();
                    if let Some(item) = item.as_mut() {
                        item.resolve_relations(&context).await;
                    }
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Create { input, respond_to } => {
                    debug!(entity_type, ?input, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;
                    let item = T::from_create_params(id.clone(), input);
                    self.store.push(item.clone());
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let mut joined = item;
                    joined.resolve_relations(&context).await;
                    let _ = respond_to.send(Ok(joined));
                }
                ResourceRequest::Update { patch, respond_to } => {
                    debug!(entity_type, ?patch, "Update");
                    let id = T::patch_target(&patch).clone();
                    match self.store.iter_mut().find(|e| e.id() == &id) {
                        Some(item) => {
                            item.apply_patch(patch);
                            let mut joined = item.clone();
                            info!(entity_type, %id, "Updated");
                            joined.resolve_relations(&context).await;
                            let _ = respond_to.send(Ok(joined));
                        }
                        None => {
                            warn!(entity_type, %id, "Not found");
                            let _ =
                                respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        }
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let before = self.store.len();
                    self.store.retain(|e| e.id() != &id);
                    let removed = self.store.len() < before;
                    if removed {
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                    } else {
                        warn!(entity_type, %id, "Delete of unknown id");
                    }
                    let _ = respond_to.send(Ok(removed));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
