use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::image::Image;
use crate::timestamp::{self, Timestamp};
use crate::{require, Id, Identified, Validate};

/// Album category; the backend accepts exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Business,
    House,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Business => "business",
            Label::House => "house",
        }
    }
}

impl std::str::FromStr for Label {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => Ok(Label::Business),
            "house" => Ok(Label::House),
            other => Err(ModelError::Validation(format!("unknown label: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: Id,
    #[serde(rename = "album_name")]
    pub name: String,
    pub label: Label,
    #[serde(default)]
    pub description: Option<String>,
    /// Image id stored as a string by the backend.
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: Timestamp,
    #[serde(with = "timestamp")]
    pub updated_at: Timestamp,
}

impl Album {
    pub fn cover_image_id(&self) -> Option<Id> {
        self.cover_image.as_deref().and_then(|c| c.trim().parse().ok())
    }

    pub fn is_cover(&self, image: &Image) -> bool {
        self.cover_image_id() == Some(image.id)
    }
}

impl Identified for Album {
    fn id(&self) -> Id { self.id }
}

/// `GET /api/albums/{id}` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumWithImages {
    #[serde(flatten)]
    pub album: Album,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Create form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlbumDraft {
    #[serde(rename = "album_name")]
    pub name: String,
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Id>,
}

impl AlbumDraft {
    pub fn new(name: impl Into<String>, label: Label) -> Self {
        Self { name: name.into(), label: Some(label), ..Default::default() }
    }
}

impl Validate for AlbumDraft {
    fn validate(&self) -> Result<(), ModelError> {
        require("album name", &self.name)?;
        if self.label.is_none() {
            return Err(ModelError::required("label"));
        }
        Ok(())
    }
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlbumPatch {
    #[serde(rename = "album_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl AlbumPatch {
    pub fn cover(image_id: Id) -> Self {
        Self { cover_image: Some(image_id.to_string()), ..Default::default() }
    }
}

impl From<&AlbumDraft> for AlbumPatch {
    fn from(d: &AlbumDraft) -> Self {
        Self {
            name: Some(d.name.trim().to_string()),
            label: d.label,
            description: d.description.clone(),
            cover_image: None,
        }
    }
}

impl Validate for AlbumPatch {
    fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            require("album name", name)?;
        }
        Ok(())
    }
}

/// The cover must be one of the album's own images.
pub fn ensure_cover_belongs(album_id: Id, image_id: Id, images: &[Image]) -> Result<(), ModelError> {
    match images.iter().find(|i| i.id == image_id) {
        Some(image) if image.album_id == album_id => Ok(()),
        Some(image) => Err(ModelError::Invariant(format!(
            "image {image_id} belongs to album {}, not {album_id}",
            image.album_id
        ))),
        None => Err(ModelError::Invariant(format!("image {image_id} is not in album {album_id}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image(id: Id, album_id: Id) -> Image {
        serde_json::from_value(json!({
            "id": id, "image_name": "a.jpg", "object_name": "uploads/a.jpg",
            "album_id": album_id, "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        }))
        .unwrap()
    }

    #[test]
    fn decodes_backend_album() {
        let a: Album = serde_json::from_value(json!({
            "id": 3, "album_name": "Loft", "label": "house", "description": null,
            "cover_image": "12", "created_at": "2024-05-01T08:00:00.000123",
            "updated_at": "2024-05-02T08:00:00"
        }))
        .unwrap();
        assert_eq!(a.name, "Loft");
        assert_eq!(a.label, Label::House);
        assert_eq!(a.cover_image_id(), Some(12));
    }

    #[test]
    fn unknown_label_fails_decoding() {
        let r = serde_json::from_value::<Album>(json!({
            "id": 3, "album_name": "Loft", "label": "office",
            "created_at": "2024-05-01T08:00:00", "updated_at": "2024-05-01T08:00:00"
        }));
        assert!(r.is_err());
    }

    #[test]
    fn album_with_images_flattens() {
        let a: AlbumWithImages = serde_json::from_value(json!({
            "id": 1, "album_name": "Shop", "label": "business",
            "created_at": "2024-05-01T08:00:00", "updated_at": "2024-05-01T08:00:00",
            "images": [{
                "id": 7, "image_name": "x.jpg", "object_name": "o/x.jpg", "album_id": 1,
                "created_at": "2024-05-01T08:00:00", "updated_at": "2024-05-01T08:00:00"
            }]
        }))
        .unwrap();
        assert_eq!(a.album.id, 1);
        assert_eq!(a.images.len(), 1);
    }

    #[test]
    fn draft_requires_name_and_label() {
        let mut d = AlbumDraft { name: "  ".into(), ..Default::default() };
        assert_eq!(d.validate(), Err(ModelError::required("album name")));
        d.name = "Villa".into();
        assert_eq!(d.validate(), Err(ModelError::required("label")));
        d.label = Some(Label::House);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn draft_serializes_wire_names() {
        let v = serde_json::to_value(AlbumDraft::new("Villa", Label::Business)).unwrap();
        assert_eq!(v, json!({"album_name": "Villa", "label": "business"}));
    }

    #[test]
    fn cover_patch_only_carries_cover() {
        let v = serde_json::to_value(AlbumPatch::cover(9)).unwrap();
        assert_eq!(v, json!({"cover_image": "9"}));
    }

    #[test]
    fn cover_must_belong_to_album() {
        let images = vec![image(1, 10), image(2, 11)];
        assert!(ensure_cover_belongs(10, 1, &images).is_ok());
        assert!(matches!(ensure_cover_belongs(10, 2, &images), Err(ModelError::Invariant(_))));
        assert!(matches!(ensure_cover_belongs(10, 3, &images), Err(ModelError::Invariant(_))));
    }

    #[test]
    fn label_from_str() {
        assert_eq!("House".parse::<Label>().unwrap(), Label::House);
        assert!("garden".parse::<Label>().is_err());
    }
}
