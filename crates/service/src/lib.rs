//! Client side of the studio backend.
//! - `ApiClient` and the `api` modules speak the REST endpoints.
//! - `session` owns the admin bearer token.
//! - `repository` puts traits over the collections the admin screens edit, with in-memory mocks.
//! - `upload` and `reorder` hold the two multi-request flows.

pub mod api;
pub mod client;
pub mod errors;
pub mod metrics;
pub mod reorder;
pub mod repository;
pub mod session;
pub mod storage;
pub mod upload;

pub use client::ApiClient;
pub use errors::ApiError;
pub use session::{Authenticator, JsonFileSessionStore, MemorySessionStore, Session, SessionManager, SessionStore};
