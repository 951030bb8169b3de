use models::{Album, Folder, Statistics};
use service::repository::{AdminRepository, StatisticsSource};
use service::SessionStore;
use tracing::warn;

use crate::guard::{require_session, MountOutcome};

/// Landing page of the admin area.
pub struct DashboardScreen<A, F, St>
where
    A: AdminRepository<Item = Album>,
    F: AdminRepository<Item = Folder>,
    St: StatisticsSource,
{
    albums_repo: A,
    folders_repo: F,
    stats_source: St,
    pub username: Option<String>,
    pub albums: Vec<Album>,
    pub folders: Vec<Folder>,
    pub statistics: Option<Statistics>,
}

impl<A, F, St> DashboardScreen<A, F, St>
where
    A: AdminRepository<Item = Album>,
    F: AdminRepository<Item = Folder>,
    St: StatisticsSource,
{
    pub fn new(albums_repo: A, folders_repo: F, stats_source: St) -> Self {
        Self {
            albums_repo,
            folders_repo,
            stats_source,
            username: None,
            albums: Vec::new(),
            folders: Vec::new(),
            statistics: None,
        }
    }

    /// Albums, folders and counters are requested together; each lands on
    /// its own and a failure in one leaves the others intact.
    pub async fn mount<S: SessionStore + ?Sized>(&mut self, store: &S) -> MountOutcome {
        let Some(session) = require_session(store).await else {
            return MountOutcome::RedirectToLogin;
        };
        self.username = session.username().map(str::to_string);

        let (albums, folders, stats) = tokio::join!(
            self.albums_repo.fetch_all(&session),
            self.folders_repo.fetch_all(&session),
            self.stats_source.statistics(&session),
        );
        self.albums = albums;
        self.folders = folders;
        self.statistics = match stats {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "statistics unavailable");
                None
            }
        };
        MountOutcome::Ready
    }

    pub fn greeting(&self) -> String {
        format!("Welcome back, {}", self.username.as_deref().unwrap_or("admin"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use models::Label;
    use service::repository::mock::{self, Failure, MockCollection, MockStatistics};
    use service::{MemorySessionStore, Session};

    fn store() -> MemorySessionStore { MemorySessionStore::with_session(Session::new("t", Some("lin".into()))) }

    #[tokio::test]
    async fn slow_albums_and_fast_folders_both_land() {
        let albums = MockCollection::new(vec![mock::album(1, "Loft", Label::House)]).with_delay(Duration::from_millis(80));
        let folders = MockCollection::new(vec![mock::folder(1, "Homes")]);
        let stats = MockStatistics { value: Statistics { album_count: 1, ..Default::default() }, failing: false };
        let mut screen = DashboardScreen::new(albums, folders, stats);

        assert_eq!(screen.mount(&store()).await, MountOutcome::Ready);
        assert_eq!(screen.albums.len(), 1);
        assert_eq!(screen.folders.len(), 1);
        assert_eq!(screen.statistics.map(|s| s.album_count), Some(1));
        assert_eq!(screen.greeting(), "Welcome back, lin");
    }

    #[tokio::test]
    async fn one_failing_source_does_not_blank_the_rest() {
        let albums = MockCollection::new(vec![mock::album(1, "Loft", Label::House)]);
        albums.fail(Failure::List);
        let folders = MockCollection::new(vec![mock::folder(1, "Homes")]).with_delay(Duration::from_millis(30));
        let stats = MockStatistics { failing: true, ..Default::default() };
        let mut screen = DashboardScreen::new(albums, folders, stats);
        screen.mount(&store()).await;
        assert!(screen.albums.is_empty());
        assert_eq!(screen.folders.len(), 1);
        assert!(screen.statistics.is_none());
    }

    #[tokio::test]
    async fn signed_out_dashboard_fetches_nothing() {
        let albums = MockCollection::<Album>::new(vec![]);
        let folders = MockCollection::<Folder>::new(vec![]);
        let mut screen = DashboardScreen::new(albums.clone(), folders.clone(), MockStatistics::default());
        assert_eq!(screen.mount(&MemorySessionStore::default()).await, MountOutcome::RedirectToLogin);
        assert_eq!(albums.calls() + folders.calls(), 0);
    }
}
