use models::service::sort_by_order;
use models::{Id, Service, ServiceDraft};
use service::reorder::{move_service, Direction, ReorderOutcome, ReorderStrategy};
use service::repository::{EditableRepository, ServiceOrdering};
use service::{ApiError, SessionStore};
use tracing::warn;

use crate::guard::MountOutcome;
use crate::list_screen::{FormMode, ListScreen};
use crate::notice::Notice;

/// Services admin: form, delete and the reorder mode.
pub struct ServicesScreen<R>
where
    R: EditableRepository<Item = Service, Draft = ServiceDraft> + ServiceOrdering,
{
    pub list: ListScreen<R>,
    strategy: ReorderStrategy,
    reordering: bool,
}

impl<R> ServicesScreen<R>
where
    R: EditableRepository<Item = Service, Draft = ServiceDraft> + ServiceOrdering,
{
    pub fn new(repo: R, strategy: ReorderStrategy) -> Self {
        Self { list: ListScreen::new(repo), strategy, reordering: false }
    }

    pub async fn mount<S: SessionStore + ?Sized>(&mut self, store: &S) -> MountOutcome {
        let outcome = self.list.mount(store).await;
        sort_by_order(self.list.items_mut());
        outcome
    }

    pub fn services(&self) -> &[Service] { self.list.items() }

    /// New services go to the end of the ranking.
    pub async fn create(&mut self, draft: &ServiceDraft) -> Result<Service, ApiError> {
        let mut draft = draft.clone();
        draft.order = self.list.items().len() as i32;
        self.list.submit(FormMode::Create, &draft).await
    }

    pub async fn edit(&mut self, id: Id, draft: &ServiceDraft) -> Result<Service, ApiError> {
        let saved = self.list.submit(FormMode::Edit(id), draft).await?;
        sort_by_order(self.list.items_mut());
        Ok(saved)
    }

    pub fn is_reordering(&self) -> bool { self.reordering }

    pub fn toggle_reorder(&mut self) -> bool {
        self.reordering = !self.reordering;
        self.reordering
    }

    /// Up is disabled on the first row, down on the last.
    pub fn can_move(&self, index: usize, direction: Direction) -> bool {
        let len = self.list.items().len();
        match direction {
            Direction::Up => index > 0 && index < len,
            Direction::Down => index + 1 < len,
        }
    }

    pub async fn move_service(&mut self, index: usize, direction: Direction) -> Result<ReorderOutcome, ApiError> {
        if !self.reordering || !self.can_move(index, direction) {
            return Ok(ReorderOutcome::Unchanged);
        }
        let session = self.list.require()?;
        let mut services = self.list.items().to_vec();
        let outcome = move_service(self.list.repo(), &session, &mut services, index, direction, self.strategy).await;
        *self.list.items_mut() = services;

        match &outcome {
            ReorderOutcome::Persisted | ReorderOutcome::Unchanged => {}
            ReorderOutcome::Inconsistent { failed } => {
                let ids: Vec<Id> = failed.iter().map(|(id, _)| *id).collect();
                warn!(?ids, "displayed order differs from stored order");
                self.list.set_notice(Notice::error(format!(
                    "Order only partly saved; services {ids:?} kept their previous position on the server"
                )));
            }
            ReorderOutcome::Reverted(e) => self.list.set_notice(Notice::from_error(e)),
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::repository::mock::{self, Failure, MockCollection};
    use service::{MemorySessionStore, Session};

    fn store() -> MemorySessionStore { MemorySessionStore::with_session(Session::new("t", None)) }

    #[tokio::test]
    async fn mount_sorts_and_create_appends() {
        let repo = MockCollection::new(vec![mock::service(1, "b", 1), mock::service(2, "a", 0)]);
        let mut screen = ServicesScreen::new(repo, ReorderStrategy::Paired);
        screen.mount(&store()).await;
        assert_eq!(screen.services().iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1]);

        let draft = ServiceDraft { name: "Tiles".into(), description: "Floors".into(), icon: None, order: 0 };
        let created = screen.create(&draft).await.unwrap();
        assert_eq!(created.order, 2);
    }

    #[tokio::test]
    async fn moves_need_reorder_mode_and_respect_edges() {
        let repo = MockCollection::new(vec![mock::service(1, "a", 0), mock::service(2, "b", 1)]);
        let mut screen = ServicesScreen::new(repo.clone(), ReorderStrategy::Paired);
        screen.mount(&store()).await;

        assert!(matches!(screen.move_service(0, Direction::Down).await.unwrap(), ReorderOutcome::Unchanged));
        screen.toggle_reorder();
        assert!(!screen.can_move(0, Direction::Up));
        assert!(!screen.can_move(1, Direction::Down));
        assert!(matches!(screen.move_service(0, Direction::Up).await.unwrap(), ReorderOutcome::Unchanged));
        assert_eq!(repo.calls(), 1);

        assert!(screen.move_service(0, Direction::Down).await.unwrap().is_persisted());
        assert_eq!(screen.services().iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn partial_reorder_is_reported() {
        let repo = MockCollection::new(vec![mock::service(10, "A", 2), mock::service(11, "B", 3)]);
        repo.fail(Failure::Order(11));
        let mut screen = ServicesScreen::new(repo.clone(), ReorderStrategy::Paired);
        screen.mount(&store()).await;
        screen.toggle_reorder();

        let outcome = screen.move_service(0, Direction::Down).await.unwrap();
        assert!(matches!(outcome, ReorderOutcome::Inconsistent { .. }));
        let a = screen.services().iter().find(|s| s.id == 10).unwrap();
        assert_eq!(a.order, 3);
        assert_eq!(repo.items().iter().find(|s| s.id == 11).unwrap().order, 3);
        assert!(screen.list.notice().is_some_and(|n| n.is_error()));
    }
}
