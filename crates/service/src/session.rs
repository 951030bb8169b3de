//! Admin session: the bearer token and cached display name.
//!
//! A [`Session`] is an explicit value handed to every authenticated call.
//! [`SessionManager`] owns its lifecycle: `login` creates and persists it,
//! `logout` clears it. Persistence goes through a [`SessionStore`] keyed by
//! `admin_token` / `admin_username`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use models::{AdminUser, Credentials, Validate};
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::errors::ApiError;
use crate::storage::json_file_map::JsonFileMap;

pub const TOKEN_KEY: &str = "admin_token";
pub const USERNAME_KEY: &str = "admin_username";

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    username: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, username: Option<String>) -> Self {
        Self { token: token.into(), username }
    }

    pub fn token(&self) -> &str { &self.token }

    pub fn username(&self) -> Option<&str> { self.username.as_deref() }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("username", &self.username)
            .finish()
    }
}

/// Where the session survives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, ApiError>;
    async fn save(&self, session: &Session) -> Result<(), ApiError>;
    async fn clear(&self) -> Result<(), ApiError>;
}

/// Process-local store for tests and embedded use.
#[derive(Default, Clone)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self { inner: Arc::new(Mutex::new(Some(session))) }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.inner.lock().map_err(|e| ApiError::Io(e.to_string()))?.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), ApiError> {
        *self.inner.lock().map_err(|e| ApiError::Io(e.to_string()))? = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        *self.inner.lock().map_err(|e| ApiError::Io(e.to_string()))? = None;
        Ok(())
    }
}

/// JSON file with the two local-storage keys.
#[derive(Clone)]
pub struct JsonFileSessionStore {
    map: JsonFileMap<String, String>,
}

impl JsonFileSessionStore {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ApiError> {
        Ok(Self { map: JsonFileMap::open(path).await? })
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self) -> Result<Option<Session>, ApiError> {
        let token = self.map.get(&TOKEN_KEY.to_string()).await;
        let username = self.map.get(&USERNAME_KEY.to_string()).await;
        Ok(token
            .filter(|t| !t.trim().is_empty())
            .map(|t| Session::new(t, username)))
    }

    async fn save(&self, session: &Session) -> Result<(), ApiError> {
        let token = session.token().to_string();
        let username = session.username().map(str::to_string);
        self.map
            .update(move |m| {
                m.insert(TOKEN_KEY.to_string(), token);
                match username {
                    Some(u) => { m.insert(USERNAME_KEY.to_string(), u); }
                    None => { m.remove(USERNAME_KEY); }
                }
            })
            .await
    }

    async fn clear(&self) -> Result<(), ApiError> {
        self.map
            .update(|m| {
                m.remove(TOKEN_KEY);
                m.remove(USERNAME_KEY);
            })
            .await
    }
}

/// Turns credentials into a stored session.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>;
}

/// Login/logout lifecycle on top of a store.
pub struct SessionManager<S: SessionStore> {
    client: ApiClient,
    store: Arc<S>,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(client: ApiClient, store: Arc<S>) -> Self { Self { client, store } }

    pub fn store(&self) -> &Arc<S> { &self.store }

    /// Exchange credentials for a token and persist it with the username.
    ///
    /// Blank fields are rejected before any request is made.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        credentials.validate()?;
        let token = self.client.request_token(credentials).await?;
        let session = Session::new(token.access_token, Some(credentials.username.trim().to_string()));
        self.store.save(&session).await?;
        info!("admin_logged_in");
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.store.clear().await?;
        info!("admin_logged_out");
        Ok(())
    }

    pub async fn current(&self) -> Result<Option<Session>, ApiError> {
        self.store.load().await
    }

    pub async fn whoami(&self, session: &Session) -> Result<AdminUser, ApiError> {
        self.client.current_admin(session).await
    }
}

#[async_trait]
impl<S: SessionStore> Authenticator for SessionManager<S> {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        SessionManager::login(self, credentials).await
    }
}
