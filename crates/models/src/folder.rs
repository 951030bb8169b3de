use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::timestamp::{self, Timestamp};
use crate::{require, Id, Identified, Validate};

/// Optional admin-side grouping above albums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: Id,
    #[serde(rename = "folder_name")]
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: Timestamp,
    #[serde(with = "timestamp")]
    pub updated_at: Timestamp,
}

impl Identified for Folder {
    fn id(&self) -> Id { self.id }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FolderDraft {
    #[serde(rename = "folder_name")]
    pub name: String,
}

impl FolderDraft {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }
}

impl Validate for FolderDraft {
    fn validate(&self) -> Result<(), ModelError> {
        require("folder name", &self.name)
    }
}
