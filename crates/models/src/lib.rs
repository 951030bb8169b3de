//! Typed entities exchanged with the portal backend.
//!
//! Wire shapes are validated at deserialisation time: an unknown album label,
//! a malformed timestamp or a missing field fails decoding instead of leaking
//! a half-filled value into the screens.

pub mod errors;
pub mod timestamp;
pub mod album;
pub mod image;
pub mod folder;
pub mod service;
pub mod contact;
pub mod auth;
pub mod statistics;

pub use album::{Album, AlbumDraft, AlbumPatch, AlbumWithImages, Label};
pub use auth::{AdminUser, Credentials, Token};
pub use contact::{ContactDraft, ContactMessage};
pub use errors::ModelError;
pub use folder::{Folder, FolderDraft};
pub use image::{Image, ImagePatch};
pub use service::{OrderAssignment, Service, ServiceDraft};
pub use statistics::Statistics;

/// Backend primary key.
pub type Id = i64;

/// Anything listed on an admin screen.
pub trait Identified {
    fn id(&self) -> Id;
}

/// Client-side checks run before a payload is sent.
pub trait Validate {
    fn validate(&self) -> Result<(), ModelError>;
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::required(field));
    }
    Ok(())
}
