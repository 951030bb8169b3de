//! UI-agnostic state for the portal's pages.
//!
//! Each screen owns the state a renderer draws and exposes one method per
//! user action. Screens talk to the backend only through the repository
//! traits in `service::repository`, so any of them runs against the
//! in-memory mocks in tests.

pub mod gallery;
pub mod guard;
pub mod lightbox;
pub mod list_screen;
pub mod notice;
pub mod screens;
pub mod scroll;

pub use guard::{require_session, MountOutcome};
pub use lightbox::{CloseTrigger, Key, Lightbox, LightboxEvent, LightboxState};
pub use list_screen::{FormMode, ListScreen};
pub use notice::{Notice, NoticeKind};
pub use scroll::{CountingScroll, NoScroll, ScrollControl};
