//! Command-line front end of the list pages.
//!
//! Every operation goes through a mounted [`ControllerHandle`], exactly like
//! a page would: open the panel, submit, wait for the refetch, read the
//! published state. Nothing here talks to a service directly except
//! [`show`], which is the detail page.

use crate::model::{Comment, FormError, FormFields, Post, User};
use console_framework::{
    fetch_detail, Admission, CollectionService, CollectionState, ConsoleEntity, ConsoleError,
    ControllerHandle, EditSlot, FrameworkError, ListPhase, Refusal,
};
use std::collections::HashSet;
use std::fmt::Write;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Framework(#[from] FrameworkError),
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("refused: {0}")]
    Refused(Refusal),
    #[error("could not load {entity} list: {message}")]
    ListFailed {
        entity: &'static str,
        message: String,
    },
}

/// Plain-text columns of an entity.
pub trait Row: ConsoleEntity {
    fn columns(&self) -> Vec<(&'static str, String)>;
}

impl Row for User {
    fn columns(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("username", self.username.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
            ("website", self.website.clone()),
        ]
    }
}

impl Row for Post {
    fn columns(&self) -> Vec<(&'static str, String)> {
        let author = match &self.user {
            Some(user) => user.name.clone(),
            None => "-".to_string(),
        };
        vec![
            ("id", self.id.to_string()),
            ("title", self.title.clone()),
            ("author", author),
            ("body", self.body.clone()),
        ]
    }
}

impl Row for Comment {
    fn columns(&self) -> Vec<(&'static str, String)> {
        let post = match &self.post {
            Some(post) => post.title.clone(),
            None => "-".to_string(),
        };
        vec![
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("post", post),
            ("body", self.body.clone()),
        ]
    }
}

/// One line per entity, in list order.
pub fn render_list<T: Row>(items: &[T]) -> String {
    if items.is_empty() {
        return format!("No {}s.\n", T::NAME.to_lowercase());
    }
    let mut out = String::new();
    for item in items {
        let line = item
            .columns()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{line}");
    }
    out
}

/// `field: value` lines of a single entity.
pub fn render_detail<T: Row>(item: &T) -> String {
    let mut out = String::new();
    for (name, value) in item.columns() {
        let _ = writeln!(out, "{name:>9}: {value}");
    }
    out
}

fn admitted(admission: Admission) -> Result<(), ShellError> {
    match admission {
        Admission::Accepted => Ok(()),
        Admission::Refused(refusal) => Err(ShellError::Refused(refusal)),
    }
}

/// Waits for the page to settle; fails if the list could not be loaded.
async fn loaded<T: ConsoleEntity>(
    handle: &ControllerHandle<T>,
) -> Result<CollectionState<T>, ShellError> {
    let state = handle.settled().await?;
    if let ListPhase::Errored(message) = &state.phase {
        return Err(ShellError::ListFailed {
            entity: T::NAME,
            message: message.clone(),
        });
    }
    Ok(state)
}

/// Like [`loaded`], but also fails with the error the last mutation surfaced.
async fn committed<T: ConsoleEntity>(
    handle: &ControllerHandle<T>,
) -> Result<CollectionState<T>, ShellError> {
    let mut state = loaded(handle).await?;
    match state.last_error.take() {
        Some(error) => Err(error.into()),
        None => Ok(state),
    }
}

pub async fn list<T: ConsoleEntity>(handle: &ControllerHandle<T>) -> Result<Vec<T>, ShellError> {
    let state = loaded(handle).await?;
    Ok(state.items().to_vec())
}

/// Detail page fetch by raw id.
pub async fn show<T: ConsoleEntity>(
    service: &dyn CollectionService<T>,
    raw_id: &str,
) -> Result<T, ShellError> {
    Ok(fetch_detail(service, raw_id).await?)
}

/// Opens the create panel, fills it from `fields` and submits.
///
/// Returns the entity that appeared in the refetched list.
pub async fn create<T>(handle: &ControllerHandle<T>, fields: &[String]) -> Result<T, ShellError>
where
    T: ConsoleEntity,
    T::Create: FormFields,
{
    let before = loaded(handle).await?;
    let known: HashSet<T::Id> = before.items().iter().map(|e| e.id().clone()).collect();

    let mut draft = T::Create::default();
    draft.assign_all(fields.iter().map(String::as_str))?;

    admitted(handle.start_create().await?)?;
    if let Err(e) = admitted(handle.submit_create(draft).await?) {
        handle.cancel_create().await?;
        return Err(e);
    }

    let after = committed(handle).await?;
    let created = after
        .items()
        .iter()
        .find(|e| !known.contains(e.id()))
        .cloned()
        .ok_or_else(|| ConsoleError::transport(format!("created {} is not listed", T::NAME)))?;
    info!(entity_type = T::NAME, id = %created.id(), "Created from shell");
    Ok(created)
}

/// Enters edit mode for `raw_id`, applies `fields` on top of the current
/// values and submits.
pub async fn update<T>(
    handle: &ControllerHandle<T>,
    raw_id: &str,
    fields: &[String],
) -> Result<T, ShellError>
where
    T: ConsoleEntity,
    T::Patch: FormFields,
{
    loaded(handle).await?;
    let id = parse_listed::<T>(raw_id)?;

    match handle.start_edit(id.clone()).await? {
        Admission::Refused(Refusal::UnknownId) => return Err(not_found::<T>(raw_id).into()),
        other => admitted(other)?,
    }
    let EditSlot::Active { mut patch, .. } = handle.snapshot().editing else {
        return Err(ShellError::Refused(Refusal::NotEditing));
    };
    if let Err(e) = patch.assign_all(fields.iter().map(String::as_str)) {
        handle.cancel_edit().await?;
        return Err(e.into());
    }
    debug!(entity_type = T::NAME, ?patch, "Submitting edit");
    if let Err(e) = admitted(handle.submit_edit(patch).await?) {
        handle.cancel_edit().await?;
        return Err(e);
    }

    let after = committed(handle).await?;
    after
        .items()
        .iter()
        .find(|e| e.id() == &id)
        .cloned()
        .ok_or_else(|| not_found::<T>(raw_id).into())
}

/// Requests a delete of `raw_id`, asking `confirm` first.
pub async fn delete<T: ConsoleEntity>(
    handle: &ControllerHandle<T>,
    raw_id: &str,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<(), ShellError> {
    let before = loaded(handle).await?;
    let id = parse_listed::<T>(raw_id)?;
    if !before.items().iter().any(|e| e.id() == &id) {
        return Err(not_found::<T>(raw_id).into());
    }
    admitted(handle.request_delete(id, confirm).await?)?;
    committed(handle).await?;
    Ok(())
}

fn parse_listed<T: ConsoleEntity>(raw_id: &str) -> Result<T::Id, ConsoleError> {
    raw_id.parse().map_err(|_| not_found::<T>(raw_id))
}

fn not_found<T: ConsoleEntity>(raw_id: &str) -> ConsoleError {
    ConsoleError::NotFound {
        entity: T::NAME,
        id: raw_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, UserId};

    #[test]
    fn list_lines_follow_item_order() {
        let mut first = Post::new(2, 1, "Second id first", "b");
        first.user = Some(Author {
            id: Some(UserId(1)),
            name: "Ana".into(),
            email: None,
        });
        let orphan = Post::new(1, 9, "Orphan", "b");

        let out = render_list(&[first, orphan]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id=2  title=Second id first  author=Ana  body=b");
        assert_eq!(lines[1], "id=1  title=Orphan  author=-  body=b");
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(render_list::<Comment>(&[]), "No comments.\n");
    }

    #[test]
    fn detail_aligns_field_names() {
        let user = User::new(1, "Ana", "ana", "ana@example.com");
        let out = render_detail(&user);
        assert!(out.starts_with("       id: 1\n     name: Ana\n"));
    }
}
