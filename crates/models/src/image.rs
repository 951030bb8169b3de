use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::timestamp::{self, Timestamp};
use crate::{require, Id, Identified, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: Id,
    #[serde(rename = "image_name")]
    pub name: String,
    /// Storage key of the uploaded file.
    pub object_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub album_id: Id,
    #[serde(with = "timestamp")]
    pub created_at: Timestamp,
    #[serde(with = "timestamp")]
    pub updated_at: Timestamp,
}

impl Identified for Image {
    fn id(&self) -> Id { self.id }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImagePatch {
    #[serde(rename = "image_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<Id>,
}

impl Validate for ImagePatch {
    fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            require("image name", name)?;
        }
        Ok(())
    }
}
