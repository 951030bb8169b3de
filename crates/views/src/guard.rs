use service::{Session, SessionStore};
use tracing::warn;

/// Result of mounting a protected screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Ready,
    RedirectToLogin,
}

/// Session from the store, if any. A store that cannot be read counts as signed out.
pub async fn require_session<S>(store: &S) -> Option<Session>
where
    S: SessionStore + ?Sized,
{
    match store.load().await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "session store unreadable; treating as signed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::MemorySessionStore;

    #[tokio::test]
    async fn empty_store_means_no_session() {
        assert!(require_session(&MemorySessionStore::default()).await.is_none());
        let store = MemorySessionStore::with_session(Session::new("t", None));
        assert!(require_session(&store).await.is_some());
    }
}
