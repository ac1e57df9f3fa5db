//! Minimal entity used by the unit tests of this crate.

use crate::entity::ConsoleEntity;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

crate::entity_id!(Note);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
}

impl Note {
    pub fn new(id: u32, title: &str, body: &str) -> Self {
        Self {
            id: NoteId(id),
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteCreate {
    pub title: String,
    pub body: String,
}

impl NoteCreate {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotePatch {
    pub id: NoteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NotePatch {
    pub fn title(id: NoteId, title: &str) -> Self {
        Self {
            id,
            title: Some(title.into()),
            body: None,
        }
    }
}

impl ConsoleEntity for Note {
    type Id = NoteId;
    type Create = NoteCreate;
    type Patch = NotePatch;
    type Context = ();

    const NAME: &'static str = "Note";

    fn id(&self) -> &NoteId {
        &self.id
    }

    fn required_fields(input: &NoteCreate) -> Vec<(&'static str, Cow<'_, str>)> {
        vec![
            ("title", Cow::from(&input.title)),
            ("body", Cow::from(&input.body)),
        ]
    }

    fn patch_required_fields(patch: &NotePatch) -> Vec<(&'static str, Cow<'_, str>)> {
        [("title", &patch.title), ("body", &patch.body)]
            .into_iter()
            .filter_map(|(field, value)| value.as_deref().map(|v| (field, Cow::from(v))))
            .collect()
    }

    fn patch_target(patch: &NotePatch) -> &NoteId {
        &patch.id
    }

    fn to_patch(&self) -> NotePatch {
        NotePatch {
            id: self.id,
            title: Some(self.title.clone()),
            body: Some(self.body.clone()),
        }
    }

    fn from_create_params(id: NoteId, input: NoteCreate) -> Self {
        Self {
            id,
            title: input.title,
            body: input.body,
        }
    }

    fn apply_patch(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
    }
}
