use models::{Album, AlbumDraft, Id, Label};
use service::repository::EditableRepository;
use service::{ApiError, SessionStore};

use crate::guard::MountOutcome;
use crate::list_screen::{FormMode, ListScreen};

/// Admin album list with a label filter and the create/edit form.
pub struct AlbumsScreen<R>
where
    R: EditableRepository<Item = Album, Draft = AlbumDraft>,
{
    pub list: ListScreen<R>,
    filter: Option<Label>,
}

impl<R> AlbumsScreen<R>
where
    R: EditableRepository<Item = Album, Draft = AlbumDraft>,
{
    pub fn new(repo: R) -> Self { Self { list: ListScreen::new(repo), filter: None } }

    pub async fn mount<S: SessionStore + ?Sized>(&mut self, store: &S) -> MountOutcome {
        self.list.mount(store).await
    }

    pub fn set_filter(&mut self, label: Option<Label>) { self.filter = label; }

    pub fn filter(&self) -> Option<Label> { self.filter }

    /// Albums as displayed: filtered, same order as fetched.
    pub fn visible(&self) -> Vec<&Album> {
        self.list
            .items()
            .iter()
            .filter(|a| self.filter.map_or(true, |l| a.label == l))
            .collect()
    }

    pub async fn create(&mut self, draft: &AlbumDraft) -> Result<Album, ApiError> {
        self.list.submit(FormMode::Create, draft).await
    }

    pub async fn edit(&mut self, id: Id, draft: &AlbumDraft) -> Result<Album, ApiError> {
        self.list.submit(FormMode::Edit(id), draft).await
    }

    /// Prefill for the edit form.
    pub fn draft_for(&self, id: Id) -> Option<AlbumDraft> {
        self.list.item(id).map(|a| AlbumDraft {
            name: a.name.clone(),
            label: Some(a.label),
            description: a.description.clone(),
            folder_id: None,
        })
    }
}
