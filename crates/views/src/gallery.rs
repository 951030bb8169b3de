//! Public gallery: the album index and the single-album viewer.

use models::{Album, AlbumWithImages, Id, Image, Label};
use service::repository::{AlbumSource, PublicCatalog};
use tracing::warn;

use crate::lightbox::{CloseTrigger, Key, Lightbox, LightboxState};
use crate::scroll::ScrollControl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    NotFound,
    Failed(String),
}

/// Thumbnails of one album plus the lightbox over them.
///
/// Thumbnails and lightbox always index the same `images` vector.
pub struct AlbumViewer<R: AlbumSource, S: ScrollControl> {
    source: R,
    album_id: Id,
    album: Option<Album>,
    images: Vec<Image>,
    state: LoadState,
    lightbox: Lightbox<S>,
}

impl<R: AlbumSource, S: ScrollControl> AlbumViewer<R, S> {
    pub fn new(source: R, album_id: Id, scroll: S) -> Self {
        Self { source, album_id, album: None, images: Vec::new(), state: LoadState::Loading, lightbox: Lightbox::new(0, scroll) }
    }

    pub async fn load(&mut self) -> &LoadState {
        self.state = LoadState::Loading;
        match self.source.album_with_images(self.album_id).await {
            Ok(Some(AlbumWithImages { album, images })) => {
                self.album = Some(album);
                self.images = images;
                self.state = LoadState::Ready;
            }
            Ok(None) => {
                self.album = None;
                self.images.clear();
                self.state = LoadState::NotFound;
            }
            Err(e) => {
                warn!(album_id = self.album_id, error = %e, "album fetch failed");
                self.album = None;
                self.images.clear();
                self.state = LoadState::Failed(e.user_message());
            }
        }
        self.lightbox.refresh(self.images.len());
        &self.state
    }

    pub fn state(&self) -> &LoadState { &self.state }

    pub fn album(&self) -> Option<&Album> { self.album.as_ref() }

    pub fn thumbnails(&self) -> &[Image] { &self.images }

    pub fn lightbox(&self) -> LightboxState { self.lightbox.state() }

    pub fn current(&self) -> Option<&Image> { self.lightbox.index().and_then(|i| self.images.get(i)) }

    /// "3 / 12" style counter for the open lightbox.
    pub fn position(&self) -> Option<(usize, usize)> { self.lightbox.index().map(|i| (i + 1, self.images.len())) }

    pub fn click_thumbnail(&mut self, index: usize) -> LightboxState { self.lightbox.open(index) }

    pub fn next(&mut self) -> LightboxState { self.lightbox.next() }

    pub fn previous(&mut self) -> LightboxState { self.lightbox.previous() }

    pub fn close(&mut self, trigger: CloseTrigger) -> LightboxState { self.lightbox.close(trigger) }

    pub fn key(&mut self, name: &str) -> LightboxState {
        match Key::from_name(name) {
            Some(key) => self.lightbox.handle_key(key),
            None => self.lightbox.state(),
        }
    }

    pub fn scroll(&self) -> &S { self.lightbox.scroll() }
}

/// Album grid of the public gallery page, optionally narrowed to one label.
pub struct GalleryIndex<C: PublicCatalog> {
    catalog: C,
    label: Option<Label>,
    albums: Vec<AlbumWithImages>,
    loading: bool,
}

impl<C: PublicCatalog> GalleryIndex<C> {
    pub fn new(catalog: C) -> Self { Self { catalog, label: None, albums: Vec::new(), loading: false } }

    pub async fn load(&mut self) {
        self.loading = true;
        self.albums = self.catalog.gallery(self.label).await;
        self.loading = false;
    }

    pub async fn select_label(&mut self, label: Option<Label>) {
        if self.label != label {
            self.label = label;
            self.load().await;
        }
    }

    pub fn label(&self) -> Option<Label> { self.label }

    pub fn is_loading(&self) -> bool { self.loading }

    pub fn albums(&self) -> &[AlbumWithImages] { &self.albums }

    /// Thumbnail for an album card: the cover if it is among the images, else the first image.
    pub fn card_image(entry: &AlbumWithImages) -> Option<&Image> {
        entry
            .images
            .iter()
            .find(|i| entry.album.is_cover(i))
            .or_else(|| entry.images.first())
    }
}
