use models::{Folder, FolderDraft, Id};
use service::repository::EditableRepository;
use service::{ApiError, SessionStore};

use crate::guard::MountOutcome;
use crate::list_screen::{FormMode, ListScreen};

/// Folder management: list, create, rename, two-step delete.
pub struct FoldersScreen<R>
where
    R: EditableRepository<Item = Folder, Draft = FolderDraft>,
{
    pub list: ListScreen<R>,
}

impl<R> FoldersScreen<R>
where
    R: EditableRepository<Item = Folder, Draft = FolderDraft>,
{
    pub fn new(repo: R) -> Self { Self { list: ListScreen::new(repo) } }

    pub async fn mount<S: SessionStore + ?Sized>(&mut self, store: &S) -> MountOutcome {
        self.list.mount(store).await
    }

    pub fn folders(&self) -> &[Folder] { self.list.items() }

    pub async fn create(&mut self, name: &str) -> Result<Folder, ApiError> {
        self.list.submit(FormMode::Create, &FolderDraft::new(name)).await
    }

    pub async fn rename(&mut self, id: Id, name: &str) -> Result<Folder, ApiError> {
        self.list.submit(FormMode::Edit(id), &FolderDraft::new(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::repository::mock::{self, MockCollection};
    use service::{MemorySessionStore, Session};

    #[tokio::test]
    async fn rename_and_delete() {
        let repo = MockCollection::new(vec![mock::folder(1, "Homes"), mock::folder(2, "Shops")]);
        let mut screen = FoldersScreen::new(repo.clone());
        screen.mount(&MemorySessionStore::with_session(Session::new("t", None))).await;

        screen.rename(2, "Retail").await.unwrap();
        screen.list.request_delete(1);
        screen.list.confirm_delete().await.unwrap();

        let names: Vec<_> = screen.folders().iter().map(|f| f.name.clone()).collect();
        assert_eq!(names, vec!["Retail"]);
        assert_eq!(repo.items().iter().map(|f| f.name.clone()).collect::<Vec<_>>(), names);
    }

    #[tokio::test]
    async fn blank_rename_is_rejected_locally() {
        let repo = MockCollection::new(vec![mock::folder(1, "Homes")]);
        let mut screen = FoldersScreen::new(repo.clone());
        screen.mount(&MemorySessionStore::with_session(Session::new("t", None))).await;
        assert!(screen.rename(1, "").await.is_err());
        assert_eq!(repo.calls(), 1);
    }
}
