//! # Console Framework
//!
//! This crate provides the generic interaction engine behind the list pages of an
//! admin console. Every collection (posts, users, comments, ...) gets the same
//! create / edit / delete workflow, written **once** against the
//! [`ConsoleEntity`] trait and instantiated per entity.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Entity Layer** ([`ConsoleEntity`]) - schema of one collection: id, create
//!    payload, patch, required fields, relation joins
//! 2. **Service Layer** ([`CollectionService`]) - the query/mutation service:
//!    [`GraphqlService`] over HTTP, or an in-process [`ResourceActor`] reached
//!    through its [`ResourceClient`]
//! 3. **Interaction Layer** ([`EntityListController`]) - the per-page state
//!    machine, using a [`MutationGateway`] for writes and a
//!    [`ConsistencyRefresher`] to reload the list after each one
//!
//! ## The Interaction Model
//!
//! ```text
//!            mount                 list ok
//!   Idle ───────────► Loading ───────────────► Ready ◄──┐
//!                        │                       │      │ refetch ok
//!                        │ list failed           │ mutation ok
//!                        ▼                       ▼      │
//!                     Errored ◄───────────── Loading ───┘
//!                                refetch failed
//! ```
//!
//! Inside `Ready`, the [`CollectionState`] tracks an optional create panel, at
//! most one entity in edit mode, at most one pending delete and at most one
//! in-flight mutation. Competing commands are refused, not queued.
//!
//! ## Concurrency Model
//!
//! - Each controller and each resource actor runs in its own Tokio task
//! - Commands are processed **sequentially** within a controller (no locks)
//! - Service calls run in spawned tasks and are never aborted; a result that
//!   arrives after teardown is discarded
//!
//! ## Quick Start
//!
//! ```rust
//! use console_framework::{ConsoleEntity, EntityListController, ResourceActor};
//! use std::borrow::Cow;
//! use std::sync::Arc;
//!
//! console_framework::entity_id!(Tag);
//!
//! #[derive(Clone, Debug)]
//! struct Tag { id: TagId, label: String }
//! #[derive(Clone, Debug, Default)] struct TagCreate { label: String }
//! #[derive(Clone, Debug)] struct TagPatch { id: TagId, label: Option<String> }
//!
//! impl ConsoleEntity for Tag {
//!     type Id = TagId; type Create = TagCreate; type Patch = TagPatch; type Context = ();
//!     const NAME: &'static str = "Tag";
//!     fn id(&self) -> &TagId { &self.id }
//!     fn required_fields(input: &TagCreate) -> Vec<(&'static str, Cow<'_, str>)> { vec![("label", Cow::from(&input.label))] }
//!     fn patch_target(patch: &TagPatch) -> &TagId { &patch.id }
//!     fn to_patch(&self) -> TagPatch { TagPatch { id: self.id, label: Some(self.label.clone()) } }
//!     fn from_create_params(id: TagId, input: TagCreate) -> Self { Self { id, label: input.label } }
//!     fn apply_patch(&mut self, patch: TagPatch) { if let Some(l) = patch.label { self.label = l; } }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Start the reference backend
//!     let (actor, client) = ResourceActor::<Tag>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     // 2. Mount a controller on it
//!     let (controller, tags) = EntityListController::new(Arc::new(client), 10);
//!     tokio::spawn(controller.run());
//!     tags.settled().await.unwrap();
//!
//!     // 3. Create through the panel
//!     tags.start_create().await.unwrap();
//!     tags.submit_create(TagCreate { label: "rust".into() }).await.unwrap();
//!
//!     let state = tags.settled().await.unwrap();
//!     assert_eq!(state.items()[0].label, "rust");
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a scripted [`mock::MockClient`] that plugs into a
//! controller like any other service.

pub mod actor;
pub mod client;
pub mod controller;
pub mod detail;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod graphql;
pub mod id;
pub mod message;
pub mod mock;
pub mod refresher;
pub mod service;
pub mod state;
pub mod tracing;

#[cfg(test)]
mod fixtures;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use controller::{delete_prompt, ControllerHandle, EntityListController};
pub use detail::fetch_detail;
pub use entity::{validate_create, validate_patch, ConsoleEntity};
pub use error::{ConsoleError, FrameworkError, ValidationError};
pub use gateway::{MutationGateway, MutationKind, MutationOutcome};
pub use graphql::{CreateIdPolicy, GraphqlEntity, GraphqlService};
pub use message::{RequestKind, ResourceRequest, Response};
pub use refresher::ConsistencyRefresher;
pub use service::{CollectionService, SharedService};
pub use state::{Admission, CollectionState, CreatePanel, DeleteSlot, EditSlot, ListPhase, Refusal};

// Used by `entity_id!` expansions in downstream crates.
#[doc(hidden)]
pub use paste;
#[doc(hidden)]
pub use serde;
