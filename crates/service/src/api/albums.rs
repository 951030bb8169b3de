use models::{Album, AlbumDraft, AlbumPatch, AlbumWithImages, Id, Image, Label, Validate};
use reqwest::Method;
use tracing::{info, instrument};

use crate::client::{or_empty, or_missing, ApiClient};
use crate::errors::ApiError;
use crate::session::Session;

impl ApiClient {
    /// Public album index, optionally filtered by label.
    pub async fn list_albums(&self, label: Option<Label>) -> Vec<Album> {
        let mut req = self.public(Method::GET, "/api/albums");
        if let Some(label) = label {
            req = req.query(&[("label", label.as_str())]);
        }
        or_empty(self.execute(req).await, "albums")
    }

    pub async fn list_folder_albums(&self, folder_id: Id) -> Vec<Album> {
        let path = format!("/api/folders/{folder_id}/albums");
        or_empty(self.execute(self.public(Method::GET, &path)).await, "folder albums")
    }

    /// Album plus its images; `None` when the album does not exist.
    pub async fn album_with_images(&self, album_id: Id) -> Result<Option<AlbumWithImages>, ApiError> {
        let path = format!("/api/albums/{album_id}");
        or_missing(self.execute(self.public(Method::GET, &path)).await)
    }

    /// Ordered images of one album.
    pub async fn list_album_images(&self, album_id: Id) -> Vec<Image> {
        or_empty(self.try_album_images(album_id).await, "album images")
    }

    pub(crate) async fn try_album_images(&self, album_id: Id) -> Result<Vec<Image>, ApiError> {
        let path = format!("/api/albums/{album_id}/images");
        self.execute(self.public(Method::GET, &path)).await
    }

    /// Every album (optionally by label) with its images, fetched concurrently.
    /// An album whose images cannot be fetched is kept with an empty list.
    pub async fn albums_with_images(&self, label: Option<Label>) -> Vec<AlbumWithImages> {
        let albums = self.list_albums(label).await;
        let fetches = albums.into_iter().map(|album| async move {
            let images = self.list_album_images(album.id).await;
            AlbumWithImages { album, images }
        });
        futures::future::join_all(fetches).await
    }

    pub async fn admin_list_albums(&self, session: &Session) -> Vec<Album> {
        or_empty(self.try_admin_albums(session).await, "admin albums")
    }

    pub(crate) async fn try_admin_albums(&self, session: &Session) -> Result<Vec<Album>, ApiError> {
        self.execute(self.authed(Method::GET, "/api/admin/albums", session)).await
    }

    #[instrument(skip(self, session, draft), fields(name = %draft.name))]
    pub async fn create_album(&self, session: &Session, draft: &AlbumDraft) -> Result<Album, ApiError> {
        draft.validate()?;
        let mut body = draft.clone();
        body.name = body.name.trim().to_string();
        let album: Album = self
            .execute(self.authed(Method::POST, "/api/admin/albums", session).json(&body))
            .await?;
        info!(album_id = album.id, "album_created");
        Ok(album)
    }

    #[instrument(skip(self, session, patch))]
    pub async fn update_album(&self, session: &Session, album_id: Id, patch: &AlbumPatch) -> Result<Album, ApiError> {
        patch.validate()?;
        let path = format!("/api/albums/{album_id}");
        self.execute(self.authed(Method::PUT, &path, session).json(patch)).await
    }

    #[instrument(skip(self, session))]
    pub async fn delete_album(&self, session: &Session, album_id: Id) -> Result<(), ApiError> {
        let path = format!("/api/admin/albums/{album_id}");
        self.execute_unit(self.authed(Method::DELETE, &path, session)).await?;
        info!("album_deleted");
        Ok(())
    }
}
