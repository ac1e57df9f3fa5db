//! # ConsoleEntity Trait
//!
//! The `ConsoleEntity` trait is the schema of one collection (Post, User, Comment, …).
//! Everything generic in this crate (the resource actor, the gateway, the list
//! controller) is written *once* against this trait and instantiated per entity.
//!
//! # Architecture Note
//! We use "Associated Types" (type Id, type Create, type Patch) to enforce type safety.
//! A `Post` controller only accepts a `PostCreate` draft and a `PostPatch` patch; the
//! compiler rejects a `UserPatch` sent to the post collection.
//!
//! # Provided Methods (Hooks)
//! [`ConsoleEntity::resolve_relations`] has a default implementation that does nothing.
//! Entities with foreign keys override it to join the related record at read time.

use crate::error::ValidationError;
use async_trait::async_trait;
use std::borrow::Cow;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// Trait that any collection entity must implement to be driven by the console engine.
///
/// # Async & Context
/// The trait is `#[async_trait]` so that [`resolve_relations`](Self::resolve_relations)
/// can call other resource actors. The `Context` type carries those dependencies and is
/// injected into [`ResourceActor::run`](crate::ResourceActor::run) ("late binding").
#[async_trait]
pub trait ConsoleEntity: Clone + Debug + Send + Sync + 'static {
    /// Opaque identifier. Convertible to and from its string form; `From<u32>`
    /// lets the reference backend assign sequential ids.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + FromStr + From<u32>;

    /// Constructor payload. Lacks server-internal fields such as the id.
    type Create: Clone + Debug + Default + Send + Sync;

    /// Partial update. Carries the target id; unspecified fields stay untouched.
    type Patch: Clone + Debug + Send + Sync;

    /// Dependencies needed to resolve joined relations. Use `()` if none.
    type Context: Send + Sync;

    /// Singular display name, e.g. `"Post"`.
    const NAME: &'static str;

    fn id(&self) -> &Self::Id;

    /// The schema-mandated fields of a create payload, as `(field, value)` pairs
    /// in form order. Unset optional values are reported as empty strings.
    fn required_fields(input: &Self::Create) -> Vec<(&'static str, Cow<'_, str>)>;

    /// Required fields a patch sets, as `(field, value)` pairs. Fields the
    /// patch leaves untouched are not listed.
    fn patch_required_fields(_patch: &Self::Patch) -> Vec<(&'static str, Cow<'_, str>)> {
        Vec::new()
    }

    /// The entity a patch targets.
    fn patch_target(patch: &Self::Patch) -> &Self::Id;

    /// A patch pre-filled with this entity's current editable values.
    fn to_patch(&self) -> Self::Patch;

    /// Construct the full entity from a server-assigned id and the payload.
    fn from_create_params(id: Self::Id, input: Self::Create) -> Self;

    /// Apply patch semantics: only fields present in `patch` change.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Join related records. A relation that cannot be resolved is left absent.
    async fn resolve_relations(&mut self, _ctx: &Self::Context) {}
}

/// Checks every schema-mandated field of a create payload, in form order.
///
/// Returns the first empty field as a [`ValidationError`].
pub fn validate_create<T: ConsoleEntity>(input: &T::Create) -> Result<(), ValidationError> {
    first_empty::<T>(T::required_fields(input))
}

/// Checks the required fields a patch sets; an edit may not blank them.
pub fn validate_patch<T: ConsoleEntity>(patch: &T::Patch) -> Result<(), ValidationError> {
    first_empty::<T>(T::patch_required_fields(patch))
}

fn first_empty<T: ConsoleEntity>(
    fields: Vec<(&'static str, Cow<'_, str>)>,
) -> Result<(), ValidationError> {
    match fields.into_iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(ValidationError {
            entity: T::NAME,
            field,
        }),
        None => Ok(()),
    }
}

/// Short type name used as the `entity_type` tracing field.
pub(crate) fn entity_type<T: ConsoleEntity>() -> &'static str {
    T::NAME
}
