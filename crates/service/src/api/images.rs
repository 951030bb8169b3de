use std::path::Path;

use models::{Id, Image, ImagePatch, Validate};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::session::Session;

/// A file picked for upload, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = guess_mime(&file_name).map(str::to_string);
        Self { file_name, bytes, mime }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::Io(format!("not a file: {}", path.display())))?;
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl ApiClient {
    /// Public URL of the stored file behind an image.
    pub fn image_file_url(&self, image_id: Id) -> String {
        self.url(&format!("/api/images/{image_id}/file"))
    }

    /// `POST /api/admin/upload` as multipart form data (one file per request).
    #[instrument(skip(self, session, file), fields(file = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_image(&self, session: &Session, album_id: Id, file: &UploadFile) -> Result<Image, ApiError> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime).map_err(|e| ApiError::Config(e.to_string()))?;
        }
        let form = Form::new()
            .text("album_id", album_id.to_string())
            .text("description", "")
            .part("file", part);
        let image: Image = self
            .execute(self.authed(Method::POST, "/api/admin/upload", session).multipart(form))
            .await?;
        if image.album_id != album_id {
            return Err(ApiError::Decode(format!(
                "uploaded image {} reports album {} instead of {album_id}",
                image.id, image.album_id
            )));
        }
        info!(image_id = image.id, "image_uploaded");
        Ok(image)
    }

    #[instrument(skip(self, session, patch))]
    pub async fn update_image(&self, session: &Session, image_id: Id, patch: &ImagePatch) -> Result<Image, ApiError> {
        patch.validate()?;
        let path = format!("/api/images/{image_id}");
        self.execute(self.authed(Method::PUT, &path, session).json(patch)).await
    }

    #[instrument(skip(self, session))]
    pub async fn delete_image(&self, session: &Session, image_id: Id) -> Result<(), ApiError> {
        let path = format!("/api/admin/images/{image_id}");
        self.execute_unit(self.authed(Method::DELETE, &path, session)).await
    }
}
