use models::{Folder, FolderDraft, Id, Validate};
use reqwest::Method;
use tracing::{info, instrument};

use crate::client::{or_empty, ApiClient};
use crate::errors::ApiError;
use crate::session::Session;

impl ApiClient {
    pub async fn list_folders(&self, session: &Session) -> Vec<Folder> {
        or_empty(self.try_folders(session).await, "folders")
    }

    pub(crate) async fn try_folders(&self, session: &Session) -> Result<Vec<Folder>, ApiError> {
        self.execute(self.authed(Method::GET, "/api/admin/folders", session)).await
    }

    #[instrument(skip(self, session, draft), fields(name = %draft.name))]
    pub async fn create_folder(&self, session: &Session, draft: &FolderDraft) -> Result<Folder, ApiError> {
        draft.validate()?;
        let body = FolderDraft::new(draft.name.trim());
        let folder: Folder = self
            .execute(self.authed(Method::POST, "/api/admin/folders", session).json(&body))
            .await?;
        info!(folder_id = folder.id, "folder_created");
        Ok(folder)
    }

    #[instrument(skip(self, session, draft))]
    pub async fn rename_folder(&self, session: &Session, folder_id: Id, draft: &FolderDraft) -> Result<Folder, ApiError> {
        draft.validate()?;
        let path = format!("/api/folders/{folder_id}");
        let body = FolderDraft::new(draft.name.trim());
        self.execute(self.authed(Method::PUT, &path, session).json(&body)).await
    }

    #[instrument(skip(self, session))]
    pub async fn delete_folder(&self, session: &Session, folder_id: Id) -> Result<(), ApiError> {
        let path = format!("/api/admin/folders/{folder_id}");
        self.execute_unit(self.authed(Method::DELETE, &path, session)).await
    }
}
