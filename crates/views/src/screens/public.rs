use models::{ContactDraft, ContactMessage, Service, Validate};
use service::repository::PublicCatalog;
use service::ApiError;
use tracing::info;

use crate::notice::Notice;

/// Public services page, in display order.
pub struct ServicesPage<C: PublicCatalog> {
    catalog: C,
    services: Vec<Service>,
}

impl<C: PublicCatalog> ServicesPage<C> {
    pub fn new(catalog: C) -> Self { Self { catalog, services: Vec::new() } }

    pub async fn load(&mut self) -> &[Service] {
        self.services = self.catalog.services().await;
        &self.services
    }

    pub fn services(&self) -> &[Service] { &self.services }

    /// Shown when the list is empty, whether nothing exists or the fetch failed.
    pub fn is_empty(&self) -> bool { self.services.is_empty() }
}

/// Public contact form.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub draft: ContactDraft,
    notice: Option<Notice>,
    sent: bool,
}

impl ContactForm {
    pub fn new() -> Self { Self::default() }

    pub fn notice(&self) -> Option<&Notice> { self.notice.as_ref() }

    pub fn is_sent(&self) -> bool { self.sent }

    /// Validate and send; the form is cleared only after the backend stored the message.
    pub async fn submit<C: PublicCatalog + ?Sized>(&mut self, catalog: &C) -> Result<ContactMessage, ApiError> {
        if let Err(e) = self.draft.validate() {
            let err = ApiError::from(e);
            self.notice = Some(Notice::from_error(&err));
            return Err(err);
        }
        match catalog.submit_contact(&self.draft).await {
            Ok(msg) => {
                info!(contact_id = msg.id, "contact_form_sent");
                self.draft = ContactDraft::default();
                self.sent = true;
                self.notice = Some(Notice::success("Thank you, we will be in touch soon."));
                Ok(msg)
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
    use service::repository::mock::{self, Failure, MockCatalog};

    fn filled() -> ContactDraft {
        ContactDraft {
            name: "Mei".into(),
            phone: "0912-000-111".into(),
            email: "mei@example.com".into(),
            message: "Kitchen remodel".into(),
        }
    }

    #[tokio::test]
    async fn services_page_is_sorted() {
        let catalog = MockCatalog::new(vec![], vec![mock::service(1, "b", 5), mock::service(2, "a", 1)]);
        let mut page = ServicesPage::new(catalog);
        let ids: Vec<_> = page.load().await.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn invalid_email_is_not_sent() {
        let catalog = MockCatalog::new(vec![], vec![]);
        let mut form = ContactForm { draft: ContactDraft { email: "mei@".into(), ..filled() }, ..Default::default() };
        assert!(form.submit(&catalog).await.is_err());
        assert_eq!(catalog.inbox.calls(), 0);
        assert!(form.notice().is_some_and(|n| n.is_error()));
    }

    #[tokio::test]
    async fn sent_form_is_cleared_failed_form_is_kept() {
        let catalog = MockCatalog::new(vec![], vec![]);
        let mut form = ContactForm { draft: filled(), ..Default::default() };
        catalog.inbox.fail(Failure::Create);
        assert!(form.submit(&catalog).await.is_err());
        assert_eq!(form.draft, filled());

        catalog.inbox.heal(&Failure::Create);
        form.submit(&catalog).await.unwrap();
        assert!(form.is_sent());
        assert_eq!(form.draft, ContactDraft::default());
        assert_eq!(catalog.inbox.items().len(), 1);
    }
}
