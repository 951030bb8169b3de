//! The shape every admin collection screen shares.
//!
//! Mount checks the session before any data call, delete goes through a
//! confirmation step, and local state only changes after the backend
//! accepted the change.

use models::{Id, Identified, Validate};
use service::repository::{AdminRepository, EditableRepository};
use service::{ApiError, Session, SessionStore};
use tracing::{info, instrument};

use crate::guard::{require_session, MountOutcome};
use crate::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Id),
}

pub struct ListScreen<R: AdminRepository> {
    repo: R,
    session: Option<Session>,
    items: Vec<R::Item>,
    loading: bool,
    pending_delete: Option<Id>,
    notice: Option<Notice>,
}

impl<R: AdminRepository> ListScreen<R> {
    pub fn new(repo: R) -> Self {
        Self { repo, session: None, items: Vec::new(), loading: false, pending_delete: None, notice: None }
    }

    pub fn repo(&self) -> &R { &self.repo }

    pub fn session(&self) -> Option<&Session> { self.session.as_ref() }

    pub fn items(&self) -> &[R::Item] { &self.items }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<R::Item> { &mut self.items }

    pub fn item(&self, id: Id) -> Option<&R::Item> { self.items.iter().find(|i| i.id() == id) }

    pub fn is_loading(&self) -> bool { self.loading }

    pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

    pub fn take_notice(&mut self) -> Option<Notice> { self.notice.take() }

    pub(crate) fn set_notice(&mut self, notice: Notice) { self.notice = Some(notice); }

    /// Load the session, then the collection. Without a token nothing is fetched.
    pub async fn mount<S>(&mut self, store: &S) -> MountOutcome
    where
        S: SessionStore + ?Sized,
    {
        let Some(session) = require_session(store).await else {
            return MountOutcome::RedirectToLogin;
        };
        self.session = Some(session);
        self.reload().await;
        MountOutcome::Ready
    }

    pub async fn reload(&mut self) {
        let Some(session) = self.session.as_ref() else { return };
        self.loading = true;
        self.items = self.repo.fetch_all(session).await;
        self.loading = false;
    }

    pub(crate) fn require(&self) -> Result<Session, ApiError> {
        self.session.clone().ok_or(ApiError::Unauthenticated)
    }

    /// First step of a delete: remember what to delete. Unknown ids are ignored.
    pub fn request_delete(&mut self, id: Id) -> bool {
        if self.item(id).is_none() {
            return false;
        }
        self.pending_delete = Some(id);
        true
    }

    pub fn pending_delete(&self) -> Option<Id> { self.pending_delete }

    pub fn cancel_delete(&mut self) { self.pending_delete = None; }

    /// Second step. The item leaves the list only if the backend deleted it.
    /// Returns the deleted id, or `None` when nothing was pending.
    #[instrument(skip(self))]
    pub async fn confirm_delete(&mut self) -> Result<Option<Id>, ApiError> {
        let Some(id) = self.pending_delete.take() else { return Ok(None) };
        let session = self.require()?;
        match self.repo.remove(&session, id).await {
            Ok(()) => {
                self.items.retain(|i| i.id() != id);
                self.notice = Some(Notice::success("Deleted"));
                info!(id, "item_deleted");
                Ok(Some(id))
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e));
                Err(e)
            }
        }
    }
}

impl<R: EditableRepository> ListScreen<R> {
    /// Create or edit through the form. Invalid drafts never reach the repository.
    pub async fn submit(&mut self, mode: FormMode, draft: &R::Draft) -> Result<R::Item, ApiError> {
        if let Err(e) = draft.validate() {
            let err = ApiError::from(e);
            self.notice = Some(Notice::from_error(&err));
            return Err(err);
        }
        let session = self.require()?;
        let result = match mode {
            FormMode::Create => self.repo.create(&session, draft).await,
            FormMode::Edit(id) => self.repo.update(&session, id, draft).await,
        };
        match result {
            Ok(item) => {
                match mode {
                    FormMode::Create => self.items.push(item.clone()),
                    FormMode::Edit(id) => {
                        if let Some(slot) = self.items.iter_mut().find(|i| i.id() == id) {
                            *slot = item.clone();
                        }
                    }
                }
                self.notice = Some(Notice::success("Saved"));
                Ok(item)
            }
            Err(e) => {
                self.notice = Some(Notice::from_error(&e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Folder, FolderDraft};
    use service::repository::mock::{self, Failure, MockCollection};
    use service::MemorySessionStore;

    fn signed_in() -> MemorySessionStore { MemorySessionStore::with_session(Session::new("t", None)) }

    #[tokio::test]
    async fn mount_without_token_redirects_before_fetching() {
        let repo = MockCollection::new(vec![mock::folder(1, "a")]);
        let mut screen = ListScreen::new(repo.clone());
        assert_eq!(screen.mount(&MemorySessionStore::default()).await, MountOutcome::RedirectToLogin);
        assert_eq!(repo.calls(), 0);
        assert!(screen.items().is_empty());
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let repo = MockCollection::new(vec![mock::folder(1, "a"), mock::folder(2, "b")]);
        let mut screen = ListScreen::new(repo.clone());
        screen.mount(&signed_in()).await;

        assert!(screen.request_delete(1));
        screen.cancel_delete();
        assert_eq!(screen.confirm_delete().await.unwrap(), None);
        assert_eq!(screen.items().len(), 2);

        assert!(!screen.request_delete(99));
        assert!(screen.request_delete(2));
        assert_eq!(screen.confirm_delete().await.unwrap(), Some(2));
        assert_eq!(screen.items().iter().map(|f| f.id).collect::<Vec<_>>(), vec![1]);
        // one list fetch, one delete; no refetch after delete
        assert_eq!(repo.calls(), 2);
    }

    #[tokio::test]
    async fn failed_delete_keeps_item_and_shows_error() {
        let repo = MockCollection::new(vec![mock::folder(1, "a")]);
        repo.fail(Failure::Delete(1));
        let mut screen = ListScreen::new(repo);
        screen.mount(&signed_in()).await;
        screen.request_delete(1);
        assert!(screen.confirm_delete().await.is_err());
        assert_eq!(screen.items().len(), 1);
        assert!(screen.notice().is_some_and(|n| n.is_error()));
    }

    #[tokio::test]
    async fn blank_name_never_hits_the_repository() {
        let repo = MockCollection::<Folder>::new(vec![]);
        let mut screen = ListScreen::new(repo.clone());
        screen.mount(&signed_in()).await;
        let calls = repo.calls();

        let err = screen.submit(FormMode::Create, &FolderDraft::new("   ")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(repo.calls(), calls);
        assert_eq!(screen.notice().map(|n| n.message.as_str()), Some("folder name is required"));
    }

    #[tokio::test]
    async fn create_and_edit_update_local_list() {
        let repo = MockCollection::new(vec![mock::folder(1, "Old")]);
        let mut screen = ListScreen::new(repo);
        screen.mount(&signed_in()).await;

        let created = screen.submit(FormMode::Create, &FolderDraft::new("New")).await.unwrap();
        assert_eq!(screen.items().len(), 2);
        screen.submit(FormMode::Edit(1), &FolderDraft::new("Renamed")).await.unwrap();
        assert_eq!(screen.item(1).map(|f| f.name.as_str()), Some("Renamed"));
        assert_eq!(screen.item(created.id).map(|f| f.name.as_str()), Some("New"));
    }

    #[tokio::test]
    async fn failed_update_leaves_item_untouched() {
        let repo = MockCollection::new(vec![mock::folder(1, "Old")]);
        repo.fail(Failure::Update(1));
        let mut screen = ListScreen::new(repo);
        screen.mount(&signed_in()).await;
        assert!(screen.submit(FormMode::Edit(1), &FolderDraft::new("Renamed")).await.is_err());
        assert_eq!(screen.item(1).map(|f| f.name.as_str()), Some("Old"));
    }
}
