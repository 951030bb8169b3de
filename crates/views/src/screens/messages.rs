use futures::future::join_all;
use models::{ContactMessage, Id};
use service::repository::{AdminRepository, ReadMarker};
use service::{ApiError, SessionStore};
use tracing::info;

use crate::guard::MountOutcome;
use crate::list_screen::ListScreen;
use crate::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl MessageFilter {
    pub fn matches(&self, msg: &ContactMessage) -> bool {
        match self {
            MessageFilter::All => true,
            MessageFilter::Unread => !msg.is_read,
            MessageFilter::Read => msg.is_read,
        }
    }
}

/// Contact inbox.
pub struct MessagesScreen<R>
where
    R: AdminRepository<Item = ContactMessage> + ReadMarker,
{
    pub list: ListScreen<R>,
    filter: MessageFilter,
    selected: Option<Id>,
}

impl<R> MessagesScreen<R>
where
    R: AdminRepository<Item = ContactMessage> + ReadMarker,
{
    pub fn new(repo: R) -> Self {
        Self { list: ListScreen::new(repo), filter: MessageFilter::All, selected: None }
    }

    pub async fn mount<S: SessionStore + ?Sized>(&mut self, store: &S) -> MountOutcome {
        let outcome = self.list.mount(store).await;
        // newest first
        self.list.items_mut().sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        outcome
    }

    pub fn set_filter(&mut self, filter: MessageFilter) { self.filter = filter; }

    pub fn visible(&self) -> Vec<&ContactMessage> {
        self.list.items().iter().filter(|m| self.filter.matches(m)).collect()
    }

    pub fn unread_count(&self) -> usize { self.list.items().iter().filter(|m| !m.is_read).count() }

    pub fn selected(&self) -> Option<&ContactMessage> { self.selected.and_then(|id| self.list.item(id)) }

    /// Show a message; an unread one is marked read once the backend agrees.
    pub async fn open(&mut self, id: Id) -> Result<(), ApiError> {
        let Some(msg) = self.list.item(id) else { return Ok(()) };
        let unread = !msg.is_read;
        self.selected = Some(id);
        if !unread {
            return Ok(());
        }
        let session = self.list.require()?;
        match self.list.repo().set_read(&session, id, true).await {
            Ok(_) => {
                self.flag_read(id);
                Ok(())
            }
            Err(e) => {
                self.list.set_notice(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    pub fn close(&mut self) { self.selected = None; }

    /// Mark every unread message read, concurrently. Only the ones the
    /// backend accepted flip locally; returns how many did.
    pub async fn mark_all_read(&mut self) -> Result<usize, ApiError> {
        let session = self.list.require()?;
        let unread: Vec<Id> = self.list.items().iter().filter(|m| !m.is_read).map(|m| m.id).collect();
        if unread.is_empty() {
            return Ok(0);
        }
        let repo = self.list.repo();
        let results = join_all(unread.iter().map(|id| {
            let session = &session;
            async move { (*id, repo.set_read(session, *id, true).await) }
        }))
        .await;

        let mut done = 0;
        let mut first_error = None;
        for (id, result) in results {
            match result {
                Ok(_) => {
                    self.flag_read(id);
                    done += 1;
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        info!(done, total = unread.len(), "messages_marked_read");
        match first_error {
            Some(e) => self.list.set_notice(Notice::from_error(&e)),
            None => self.list.set_notice(Notice::success("All messages marked as read")),
        }
        Ok(done)
    }

    fn flag_read(&mut self, id: Id) {
        if let Some(m) = self.list.items_mut().iter_mut().find(|m| m.id == id) {
            m.is_read = true;
        }
    }
}
