//! One album in the admin: its images, uploads, cover selection and a
//! preview lightbox over the same image sequence.

use models::album::ensure_cover_belongs;
use models::{Album, AlbumPatch, Id, Image};
use service::api::images::UploadFile;
use service::repository::{AlbumEditor, AlbumSource, ImageRepository};
use service::upload::{upload_batch, UploadPolicy, UploadProgress, UploadReport};
use service::{ApiError, Session, SessionStore};
use tracing::info;

use crate::guard::{require_session, MountOutcome};
use crate::lightbox::Lightbox;
use crate::notice::Notice;
use crate::scroll::ScrollControl;

pub struct AlbumDetailScreen<R, S>
where
    R: AlbumSource + AlbumEditor + ImageRepository,
    S: ScrollControl,
{
    repo: R,
    album_id: Id,
    session: Option<Session>,
    album: Option<Album>,
    images: Vec<Image>,
    policy: UploadPolicy,
    progress: Option<UploadProgress>,
    pending_delete: Option<Id>,
    notice: Option<Notice>,
    pub preview: Lightbox<S>,
}

impl<R, S> AlbumDetailScreen<R, S>
where
    R: AlbumSource + AlbumEditor + ImageRepository,
    S: ScrollControl,
{
    pub fn new(repo: R, album_id: Id, policy: UploadPolicy, scroll: S) -> Self {
        Self {
            repo,
            album_id,
            session: None,
            album: None,
            images: Vec::new(),
            policy,
            progress: None,
            pending_delete: None,
            notice: None,
            preview: Lightbox::new(0, scroll),
        }
    }

    pub async fn mount<St: SessionStore + ?Sized>(&mut self, store: &St) -> MountOutcome {
        let Some(session) = require_session(store).await else {
            return MountOutcome::RedirectToLogin;
        };
        self.session = Some(session);
        self.reload().await;
        MountOutcome::Ready
    }

    /// Refetch album and images; the preview follows the new length.
    pub async fn reload(&mut self) {
        match self.repo.album_with_images(self.album_id).await {
            Ok(Some(found)) => {
                self.album = Some(found.album);
                self.images = found.images;
            }
            Ok(None) => {
                self.album = None;
                self.images.clear();
                self.notice = Some(Notice::error("Album not found"));
            }
            Err(e) => {
                self.images.clear();
                self.notice = Some(Notice::from_error(&e));
            }
        }
        self.preview.refresh(self.images.len());
    }

    pub fn album(&self) -> Option<&Album> { self.album.as_ref() }

    pub fn images(&self) -> &[Image] { &self.images }

    pub fn progress(&self) -> Option<UploadProgress> { self.progress }

    pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

    pub fn preview_image(&self) -> Option<&Image> { self.preview.index().and_then(|i| self.images.get(i)) }

    fn require(&self) -> Result<Session, ApiError> { self.session.clone().ok_or(ApiError::Unauthenticated) }

    /// Upload files one by one; each image shows up as soon as it is stored.
    pub async fn upload(&mut self, files: &[UploadFile]) -> Result<UploadReport, ApiError> {
        let session = self.require()?;
        let Self { repo, images, progress, album_id, policy, .. } = self;
        let report = upload_batch(&*repo, &session, *album_id, files, *policy, |p, image| {
            *progress = Some(*p);
            if let Some(image) = image {
                images.push(image.clone());
            }
        })
        .await;

        // rolled-back images must not stay on screen
        let persisted: Vec<Id> = report.persisted().iter().map(|i| i.id).collect();
        let rolled_back: Vec<Id> = report
            .files
            .iter()
            .filter_map(|(_, o)| match o {
                service::upload::FileOutcome::RolledBack(img) => Some(img.id),
                _ => None,
            })
            .collect();
        self.images.retain(|i| !rolled_back.contains(&i.id));
        self.preview.refresh(self.images.len());

        self.notice = Some(match report.first_error() {
            Some(e) => Notice::from_error(e),
            None => Notice::success(format!("Uploaded {} image(s)", persisted.len())),
        });
        info!(album_id = self.album_id, uploaded = persisted.len(), "album_upload_done");
        Ok(report)
    }

    pub fn request_delete_image(&mut self, image_id: Id) -> bool {
        if !self.images.iter().any(|i| i.id == image_id) {
            return false;
        }
        self.pending_delete = Some(image_id);
        true
    }

    pub fn cancel_delete_image(&mut self) { self.pending_delete = None; }

    pub async fn confirm_delete_image(&mut self) -> Result<Option<Id>, ApiError> {
        let Some(id) = self.pending_delete.take() else { return Ok(None) };
        let session = self.require()?;
        match self.repo.delete_image(&session, id).await {
            Ok(()) => {
                self.images.retain(|i| i.id != id);
                self.preview.refresh(self.images.len());
                self.notice = Some(Notice::success("Image deleted"));
                Ok(Some(id))
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// Make `image_id` the cover. It must be one of this album's images.
    pub async fn set_cover(&mut self, image_id: Id) -> Result<(), ApiError> {
        if let Err(e) = ensure_cover_belongs(self.album_id, image_id, &self.images) {
            let err = ApiError::from(e);
            self.notice = Some(Notice::from_error(&err));
            return Err(err);
        }
        let session = self.require()?;
        match self.repo.update_album(&session, self.album_id, &AlbumPatch::cover(image_id)).await {
            Ok(album) => {
                self.album = Some(album);
                self.notice = Some(Notice::success("Cover updated"));
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    pub fn is_cover(&self, image: &Image) -> bool { self.album.as_ref().is_some_and(|a| a.is_cover(image)) }
}
