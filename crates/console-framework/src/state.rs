//! # Collection Interaction State
//!
//! One explicit structure replaces the loose flags of a list page ("is creating",
//! "editing id", "deleting id", "mutation loading"). The list itself moves through
//! [`ListPhase`]; inside `Ready` three orthogonal slots coexist:
//!
//! | slot | values |
//! |------|--------|
//! | [`CreatePanel`] | `Closed`, `Open { draft }` |
//! | [`EditSlot`] | `Inactive`, `Active { id, patch }` |
//! | [`DeleteSlot`] | `Inactive`, `Pending(id)` |
//!
//! plus `in_flight`, the single mutation currently awaiting the service.
//!
//! ## Admission control
//!
//! While the create panel is open, an edit is active, or a delete is pending, the
//! competing actions are refused. Any in-flight mutation refuses every new one.
//! This is what keeps two mutations from racing against the same refetch, so the
//! transitions enforce it themselves; the `can_*` queries expose the same checks
//! for rendering disabled controls.
//!
//! All transitions are synchronous and free of I/O. The
//! [`EntityListController`](crate::EntityListController) performs the calls and
//! feeds their outcomes back through the `finish_*` methods.

use crate::entity::{validate_create, validate_patch, ConsoleEntity};
use crate::error::{ConsoleError, ValidationError};
use crate::gateway::{MutationKind, MutationOutcome};
use std::fmt;

/// Lifecycle of the list query.
#[derive(Debug, Clone, PartialEq)]
pub enum ListPhase<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    /// Terminal until the controller is recreated.
    Errored(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreatePanel<C> {
    Closed,
    Open { draft: C },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditSlot<I, P> {
    Inactive,
    Active { id: I, patch: P },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteSlot<I> {
    Inactive,
    Pending(I),
}

/// Why a command was turned into a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    #[error("the list is not loaded")]
    NotReady,
    #[error("another change is still being saved")]
    MutationInFlight,
    #[error("the create panel is open")]
    CreatePanelOpen,
    #[error("the create panel is closed")]
    CreatePanelClosed,
    #[error("another entity is being edited")]
    EditInProgress,
    #[error("no entity is being edited")]
    NotEditing,
    #[error("the patch targets a different entity")]
    PatchMismatch,
    #[error("another delete is pending")]
    DeleteInProgress,
    #[error("no such entity in the list")]
    UnknownId,
    /// The user did not confirm a delete.
    #[error("delete was not confirmed")]
    Declined,
    #[error(transparent)]
    Invalid(ValidationError),
}

/// Answer to every controller command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Refused(Refusal),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

impl From<Result<(), Refusal>> for Admission {
    fn from(result: Result<(), Refusal>) -> Self {
        match result {
            Ok(()) => Admission::Accepted,
            Err(refusal) => Admission::Refused(refusal),
        }
    }
}

/// Interaction state of one collection.
pub struct CollectionState<T: ConsoleEntity> {
    pub phase: ListPhase<T>,
    pub create_panel: CreatePanel<T::Create>,
    pub editing: EditSlot<T::Id, T::Patch>,
    pub deleting: DeleteSlot<T::Id>,
    pub in_flight: Option<MutationKind>,
    /// The user-visible error channel. Cleared by the next accepted mutation.
    pub last_error: Option<ConsoleError>,
}

impl<T: ConsoleEntity> Clone for CollectionState<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase.clone(),
            create_panel: self.create_panel.clone(),
            editing: self.editing.clone(),
            deleting: self.deleting.clone(),
            in_flight: self.in_flight,
            last_error: self.last_error.clone(),
        }
    }
}

impl<T: ConsoleEntity> fmt::Debug for CollectionState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionState")
            .field("phase", &self.phase)
            .field("create_panel", &self.create_panel)
            .field("editing", &self.editing)
            .field("deleting", &self.deleting)
            .field("in_flight", &self.in_flight)
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl<T: ConsoleEntity> Default for CollectionState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConsoleEntity> CollectionState<T> {
    pub fn new() -> Self {
        Self {
            phase: ListPhase::Idle,
            create_panel: CreatePanel::Closed,
            editing: EditSlot::Inactive,
            deleting: DeleteSlot::Inactive,
            in_flight: None,
            last_error: None,
        }
    }

    /// The entities of the last successful list fetch; empty otherwise.
    pub fn items(&self) -> &[T] {
        match &self.phase {
            ListPhase::Ready(items) => items,
            _ => &[],
        }
    }

    /// Nothing is loading and no mutation is awaiting the service.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, ListPhase::Ready(_) | ListPhase::Errored(_)) && self.in_flight.is_none()
    }

    pub fn is_create_open(&self) -> bool {
        matches!(self.create_panel, CreatePanel::Open { .. })
    }

    pub fn editing_id(&self) -> Option<&T::Id> {
        match &self.editing {
            EditSlot::Active { id, .. } => Some(id),
            EditSlot::Inactive => None,
        }
    }

    pub fn deleting_id(&self) -> Option<&T::Id> {
        match &self.deleting {
            DeleteSlot::Pending(id) => Some(id),
            DeleteSlot::Inactive => None,
        }
    }

    pub fn draft(&self) -> Option<&T::Create> {
        match &self.create_panel {
            CreatePanel::Open { draft } => Some(draft),
            CreatePanel::Closed => None,
        }
    }

    // --- Admission queries ---

    pub fn can_start_create(&self) -> bool {
        self.check_start_create().is_ok()
    }

    pub fn can_start_edit(&self, id: &T::Id) -> bool {
        self.check_start_edit(id).is_ok()
    }

    pub fn can_request_delete(&self, id: &T::Id) -> bool {
        self.check_request_delete(id).is_ok()
    }

    /// Whether the active form's submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.check_idle().is_ok()
    }

    fn check_idle(&self) -> Result<(), Refusal> {
        if !matches!(self.phase, ListPhase::Ready(_)) {
            return Err(Refusal::NotReady);
        }
        if self.in_flight.is_some() {
            return Err(Refusal::MutationInFlight);
        }
        Ok(())
    }

    fn check_start_create(&self) -> Result<(), Refusal> {
        self.check_idle()?;
        if self.editing_id().is_some() {
            return Err(Refusal::EditInProgress);
        }
        if self.deleting_id().is_some() {
            return Err(Refusal::DeleteInProgress);
        }
        Ok(())
    }

    fn check_start_edit(&self, id: &T::Id) -> Result<(), Refusal> {
        self.check_idle()?;
        match self.editing_id() {
            Some(current) if current == id => return Ok(()),
            Some(_) => return Err(Refusal::EditInProgress),
            None => {}
        }
        if self.is_create_open() {
            return Err(Refusal::CreatePanelOpen);
        }
        if self.deleting_id().is_some() {
            return Err(Refusal::DeleteInProgress);
        }
        if !self.items().iter().any(|item| item.id() == id) {
            return Err(Refusal::UnknownId);
        }
        Ok(())
    }

    fn check_request_delete(&self, _id: &T::Id) -> Result<(), Refusal> {
        if self.deleting_id().is_some() {
            return Err(Refusal::DeleteInProgress);
        }
        self.check_idle()?;
        if self.is_create_open() {
            return Err(Refusal::CreatePanelOpen);
        }
        if self.editing_id().is_some() {
            return Err(Refusal::EditInProgress);
        }
        Ok(())
    }

    // --- List transitions ---

    pub fn begin_loading(&mut self) {
        self.phase = ListPhase::Loading;
    }

    pub fn apply_list(&mut self, result: Result<Vec<T>, ConsoleError>) {
        self.phase = match result {
            Ok(items) => ListPhase::Ready(items),
            Err(e) => ListPhase::Errored(e.to_string()),
        };
    }

    // --- Create ---

    /// Opens the panel with an empty draft. Re-opening keeps the current draft.
    pub fn start_create(&mut self) -> Admission {
        if let Err(refusal) = self.check_start_create() {
            return Admission::Refused(refusal);
        }
        if !self.is_create_open() {
            self.create_panel = CreatePanel::Open {
                draft: T::Create::default(),
            };
        }
        Admission::Accepted
    }

    pub fn edit_draft(&mut self, input: T::Create) -> Admission {
        if self.in_flight == Some(MutationKind::Create) {
            return Admission::Refused(Refusal::MutationInFlight);
        }
        match &mut self.create_panel {
            CreatePanel::Open { draft } => {
                *draft = input;
                Admission::Accepted
            }
            CreatePanel::Closed => Admission::Refused(Refusal::CreatePanelClosed),
        }
    }

    /// Stores `input` as the draft and validates it. On success the create is
    /// marked in flight and the payload to send is returned.
    pub fn submit_create(&mut self, input: T::Create) -> Result<T::Create, Refusal> {
        self.check_idle()?;
        let CreatePanel::Open { draft } = &mut self.create_panel else {
            return Err(Refusal::CreatePanelClosed);
        };
        *draft = input.clone();
        if let Err(invalid) = validate_create::<T>(&input) {
            self.last_error = Some(ConsoleError::Validation(invalid.clone()));
            return Err(Refusal::Invalid(invalid));
        }
        self.in_flight = Some(MutationKind::Create);
        self.last_error = None;
        Ok(input)
    }

    /// Returns `true` when the list must be refetched.
    pub fn finish_create(&mut self, outcome: MutationOutcome<T>) -> bool {
        self.in_flight = None;
        match outcome {
            MutationOutcome::Success(_) => {
                self.create_panel = CreatePanel::Closed;
                self.last_error = None;
                true
            }
            MutationOutcome::Failure(reason) => {
                self.last_error = Some(ConsoleError::Transport(reason));
                false
            }
        }
    }

    pub fn cancel_create(&mut self) {
        self.create_panel = CreatePanel::Closed;
    }

    // --- Edit ---

    /// Enters edit mode for `id`, pre-filling the patch from the listed entity.
    /// Starting an edit of the id already being edited keeps the pending patch.
    pub fn start_edit(&mut self, id: T::Id) -> Admission {
        if let Err(refusal) = self.check_start_edit(&id) {
            return Admission::Refused(refusal);
        }
        if self.editing_id() == Some(&id) {
            return Admission::Accepted;
        }
        if let Some(patch) = self
            .items()
            .iter()
            .find(|item| item.id() == &id)
            .map(T::to_patch)
        {
            self.editing = EditSlot::Active { id, patch };
        }
        Admission::Accepted
    }

    pub fn edit_patch(&mut self, next: T::Patch) -> Admission {
        if self.in_flight == Some(MutationKind::Update) {
            return Admission::Refused(Refusal::MutationInFlight);
        }
        match &mut self.editing {
            EditSlot::Active { id, patch } if T::patch_target(&next) == id => {
                *patch = next;
                Admission::Accepted
            }
            EditSlot::Active { .. } => Admission::Refused(Refusal::PatchMismatch),
            EditSlot::Inactive => Admission::Refused(Refusal::NotEditing),
        }
    }

    /// Stores `next` as the pending patch and validates the fields it sets.
    pub fn submit_edit(&mut self, next: T::Patch) -> Result<T::Patch, Refusal> {
        self.check_idle()?;
        match &mut self.editing {
            EditSlot::Active { id, patch } if T::patch_target(&next) == id => {
                *patch = next.clone();
            }
            EditSlot::Active { .. } => return Err(Refusal::PatchMismatch),
            EditSlot::Inactive => return Err(Refusal::NotEditing),
        }
        if let Err(invalid) = validate_patch::<T>(&next) {
            self.last_error = Some(ConsoleError::Validation(invalid.clone()));
            return Err(Refusal::Invalid(invalid));
        }
        self.in_flight = Some(MutationKind::Update);
        self.last_error = None;
        Ok(next)
    }

    pub fn finish_edit(&mut self, outcome: MutationOutcome<T>) -> bool {
        self.in_flight = None;
        match outcome {
            MutationOutcome::Success(_) => {
                self.editing = EditSlot::Inactive;
                self.last_error = None;
                true
            }
            MutationOutcome::Failure(reason) => {
                self.last_error = Some(ConsoleError::Transport(reason));
                false
            }
        }
    }

    /// Leaves edit mode and drops the pending patch. Idempotent.
    pub fn cancel_edit(&mut self) {
        self.editing = EditSlot::Inactive;
    }

    // --- Delete ---

    pub fn request_delete(&mut self, id: T::Id) -> Result<T::Id, Refusal> {
        self.check_request_delete(&id)?;
        self.deleting = DeleteSlot::Pending(id.clone());
        self.in_flight = Some(MutationKind::Delete);
        self.last_error = None;
        Ok(id)
    }

    /// The pending slot is cleared whatever the outcome.
    pub fn finish_delete(&mut self, outcome: MutationOutcome<bool>) -> bool {
        self.in_flight = None;
        self.deleting = DeleteSlot::Inactive;
        match outcome {
            MutationOutcome::Success(_) => {
                self.last_error = None;
                true
            }
            MutationOutcome::Failure(reason) => {
                self.last_error = Some(ConsoleError::Transport(reason));
                false
            }
        }
    }
}
