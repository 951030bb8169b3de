use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;
use crate::timestamp::{self, Timestamp};
use crate::{require, Id, Identified, Validate};

/// Message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Id,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    /// Stored as 0/1 by the backend.
    #[serde(default, deserialize_with = "flag")]
    pub is_read: bool,
    #[serde(with = "timestamp")]
    pub created_at: Timestamp,
}

impl Identified for ContactMessage {
    fn id(&self) -> Id { self.id }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(0) => Ok(false),
        Raw::Int(1) => Ok(true),
        Raw::Int(n) => Err(serde::de::Error::custom(format!("is_read must be 0 or 1, got {n}"))),
    }
}

/// Body of `PUT /api/admin/contacts/{id}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReadFlag {
    pub is_read: u8,
}

impl From<bool> for ReadFlag {
    fn from(read: bool) -> Self { Self { is_read: u8::from(read) } }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

impl Validate for ContactDraft {
    fn validate(&self) -> Result<(), ModelError> {
        require("name", &self.name)?;
        require("phone", &self.phone)?;
        require("email", &self.email)?;
        require("message", &self.message)?;
        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ModelError::Validation("email is not valid".into())),
        }
    }
}
