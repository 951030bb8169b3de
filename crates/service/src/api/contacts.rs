use models::contact::ReadFlag;
use models::{ContactDraft, ContactMessage, Id, Validate};
use reqwest::Method;
use tracing::{info, instrument};

use crate::client::{or_empty, or_missing, ApiClient};
use crate::errors::ApiError;
use crate::session::Session;

impl ApiClient {
    /// Public contact form submission.
    #[instrument(skip(self, draft))]
    pub async fn submit_contact(&self, draft: &ContactDraft) -> Result<ContactMessage, ApiError> {
        draft.validate()?;
        let msg: ContactMessage = self
            .execute(self.public(Method::POST, "/api/contact").json(draft))
            .await?;
        info!(contact_id = msg.id, "contact_submitted");
        Ok(msg)
    }

    pub async fn list_contacts(&self, session: &Session) -> Vec<ContactMessage> {
        or_empty(self.try_contacts(session).await, "contacts")
    }

    pub(crate) async fn try_contacts(&self, session: &Session) -> Result<Vec<ContactMessage>, ApiError> {
        self.execute(self.authed(Method::GET, "/api/admin/contacts", session)).await
    }

    pub async fn contact(&self, session: &Session, contact_id: Id) -> Result<Option<ContactMessage>, ApiError> {
        let path = format!("/api/admin/contacts/{contact_id}");
        or_missing(self.execute(self.authed(Method::GET, &path, session)).await)
    }

    #[instrument(skip(self, session))]
    pub async fn set_contact_read(&self, session: &Session, contact_id: Id, read: bool) -> Result<ContactMessage, ApiError> {
        let path = format!("/api/admin/contacts/{contact_id}");
        self.execute(self.authed(Method::PUT, &path, session).json(&ReadFlag::from(read))).await
    }

    #[instrument(skip(self, session))]
    pub async fn delete_contact(&self, session: &Session, contact_id: Id) -> Result<(), ApiError> {
        let path = format!("/api/admin/contacts/{contact_id}");
        self.execute_unit(self.authed(Method::DELETE, &path, session)).await
    }
}
