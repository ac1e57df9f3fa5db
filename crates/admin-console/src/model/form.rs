//! Text form input for create payloads and patches.
//!
//! The shell collects `field=value` pairs and assigns them one by one. Field
//! names are the wire names (`userId`, `postId`); ids are parsed on assignment,
//! while emptiness is left to create validation.

use crate::model::{
    CommentCreate, CommentPatch, PostCreate, PostPatch, UserCreate, UserPatch,
};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field {field:?} for {entity}")]
    UnknownField { entity: &'static str, field: String },
    #[error("invalid id {value:?} for {field}")]
    InvalidId { field: &'static str, value: String },
    #[error("expected field=value, got {0:?}")]
    Malformed(String),
}

/// A record that can be filled from text fields.
pub trait FormFields {
    const ENTITY: &'static str;

    fn assign(&mut self, field: &str, value: &str) -> Result<(), FormError>;

    /// Assigns every `field=value` pair in order.
    fn assign_all<'a>(&mut self, pairs: impl IntoIterator<Item = &'a str>) -> Result<(), FormError> {
        for pair in pairs {
            let (field, value) = pair
                .split_once('=')
                .ok_or_else(|| FormError::Malformed(pair.to_string()))?;
            self.assign(field.trim(), value)?;
        }
        Ok(())
    }
}

fn unknown(entity: &'static str, field: &str) -> FormError {
    FormError::UnknownField {
        entity,
        field: field.to_string(),
    }
}

/// An empty value clears an optional id.
fn parse_id<I: FromStr>(field: &'static str, value: &str) -> Result<Option<I>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| FormError::InvalidId {
        field,
        value: value.to_string(),
    })
}

impl FormFields for UserCreate {
    const ENTITY: &'static str = "User";

    fn assign(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        let slot = match field {
            "name" => &mut self.name,
            "username" => &mut self.username,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "website" => &mut self.website,
            other => return Err(unknown(Self::ENTITY, other)),
        };
        *slot = value.to_string();
        Ok(())
    }
}

impl FormFields for UserPatch {
    const ENTITY: &'static str = "User";

    fn assign(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        let slot = match field {
            "name" => &mut self.name,
            "username" => &mut self.username,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "website" => &mut self.website,
            other => return Err(unknown(Self::ENTITY, other)),
        };
        *slot = Some(value.to_string());
        Ok(())
    }
}

impl FormFields for PostCreate {
    const ENTITY: &'static str = "Post";

    fn assign(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "userId" => self.author_id = parse_id("userId", value)?,
            "title" => self.title = value.to_string(),
            "body" => self.body = value.to_string(),
            other => return Err(unknown(Self::ENTITY, other)),
        }
        Ok(())
    }
}

impl FormFields for PostPatch {
    const ENTITY: &'static str = "Post";

    fn assign(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "title" => self.title = Some(value.to_string()),
            "body" => self.body = Some(value.to_string()),
            other => return Err(unknown(Self::ENTITY, other)),
        }
        Ok(())
    }
}

impl FormFields for CommentCreate {
    const ENTITY: &'static str = "Comment";

    fn assign(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "postId" => self.post_id = parse_id("postId", value)?,
            "name" => self.name = value.to_string(),
            "email" => self.email = value.to_string(),
            "body" => self.body = value.to_string(),
            other => return Err(unknown(Self::ENTITY, other)),
        }
        Ok(())
    }
}

impl FormFields for CommentPatch {
    const ENTITY: &'static str = "Comment";

    fn assign(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "postId" => self.post_id = parse_id("postId", value)?,
            "name" => self.name = Some(value.to_string()),
            "email" => self.email = Some(value.to_string()),
            "body" => self.body = Some(value.to_string()),
            other => return Err(unknown(Self::ENTITY, other)),
        }
        Ok(())
    }
}
