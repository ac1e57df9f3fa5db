use console_framework::entity_id;
use serde::{Deserialize, Serialize};

entity_id!(User);

/// A registered account.
///
/// # Console Engine
/// This struct implements [`ConsoleEntity`](console_framework::ConsoleEntity)
/// (see `user_actor::entity`), so it gets a list page with create, edit and
/// delete through an [`EntityListController`](console_framework::EntityListController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

/// Payload for creating a new user. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserCreate {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
}

/// Partial update of a user; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPatch {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl UserPatch {
    /// An empty patch for `id`.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            username: None,
            email: None,
            phone: None,
            website: None,
        }
    }
}

impl User {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
            username: username.into(),
            email: email.into(),
            phone: String::new(),
            website: String::new(),
        }
    }

    pub fn with_contact(mut self, phone: impl Into<String>, website: impl Into<String>) -> Self {
        self.phone = phone.into();
        self.website = website.into();
        self
    }
}
