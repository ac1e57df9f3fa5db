use console_framework::ConsoleEntity;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

console_framework::entity_id!(Task);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub owner: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TaskCreate {
    pub title: String,
    pub owner: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskPatch {
    pub id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl ConsoleEntity for Task {
    type Id = TaskId;
    type Create = TaskCreate;
    type Patch = TaskPatch;
    type Context = ();

    const NAME: &'static str = "Task";

    fn id(&self) -> &TaskId {
        &self.id
    }

    fn required_fields(input: &TaskCreate) -> Vec<(&'static str, Cow<'_, str>)> {
        vec![
            ("title", Cow::from(&input.title)),
            ("owner", Cow::from(&input.owner)),
        ]
    }

    fn patch_required_fields(patch: &TaskPatch) -> Vec<(&'static str, Cow<'_, str>)> {
        let mut set = Vec::new();
        if let Some(title) = &patch.title {
            set.push(("title", Cow::from(title)));
        }
        if let Some(owner) = &patch.owner {
            set.push(("owner", Cow::from(owner)));
        }
        set
    }

    fn patch_target(patch: &TaskPatch) -> &TaskId {
        &patch.id
    }

    fn to_patch(&self) -> TaskPatch {
        TaskPatch {
            id: self.id,
            title: Some(self.title.clone()),
            owner: Some(self.owner.clone()),
        }
    }

    fn from_create_params(id: TaskId, input: TaskCreate) -> Self {
        Self {
            id,
            title: input.title,
            owner: input.owner,
        }
    }

    fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
    }
}

#[allow(dead_code)]
pub fn task(id: u32, title: &str, owner: &str) -> Task {
    Task {
        id: TaskId(id),
        title: title.into(),
        owner: owner.into(),
    }
}

#[allow(dead_code)]
pub fn new_task(title: &str, owner: &str) -> TaskCreate {
    TaskCreate {
        title: title.into(),
        owner: owner.into(),
    }
}
