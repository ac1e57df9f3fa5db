//! [`ConsoleEntity`] and [`GraphqlEntity`] implementations for [`User`].

use crate::model::{User, UserCreate, UserId, UserPatch};
use console_framework::{ConsoleEntity, GraphqlEntity};
use std::borrow::Cow;

impl ConsoleEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Patch = UserPatch;
    type Context = ();

    const NAME: &'static str = "User";

    fn id(&self) -> &UserId {
        &self.id
    }

    fn required_fields(input: &UserCreate) -> Vec<(&'static str, Cow<'_, str>)> {
        vec![
            ("name", Cow::from(&input.name)),
            ("username", Cow::from(&input.username)),
            ("email", Cow::from(&input.email)),
            ("phone", Cow::from(&input.phone)),
            ("website", Cow::from(&input.website)),
        ]
    }

    fn patch_required_fields(patch: &UserPatch) -> Vec<(&'static str, Cow<'_, str>)> {
        [
            ("name", &patch.name),
            ("username", &patch.username),
            ("email", &patch.email),
            ("phone", &patch.phone),
            ("website", &patch.website),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, Cow::from(v))))
        .collect()
    }

    fn patch_target(patch: &UserPatch) -> &UserId {
        &patch.id
    }

    fn to_patch(&self) -> UserPatch {
        UserPatch {
            id: self.id,
            name: Some(self.name.clone()),
            username: Some(self.username.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            website: Some(self.website.clone()),
        }
    }

    fn from_create_params(id: UserId, input: UserCreate) -> Self {
        Self {
            id,
            name: input.name,
            username: input.username,
            email: input.email,
            phone: input.phone,
            website: input.website,
        }
    }

    fn apply_patch(&mut self, patch: UserPatch) {
        let fields = [
            (&mut self.name, patch.name),
            (&mut self.username, patch.username),
            (&mut self.email, patch.email),
            (&mut self.phone, patch.phone),
            (&mut self.website, patch.website),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

impl GraphqlEntity for User {
    const COLLECTION: &'static str = "Users";
    const SELECTION: &'static str = "id name username email phone website";
}
